//! Static catalog of knowledge sources.
//!
//! The registry is built once at startup (from the built-in PyHC catalog or
//! from `[[sources]]` config entries) and is read-only afterwards. It is the
//! single authority for which [`SourceId`]s exist, which one is the
//! community source, and which tokens mean "no source is relevant".

use crate::core::error::DomainError;
use crate::source::id::SourceId;
use serde::{Deserialize, Serialize};

/// Canonical spelling of the "no source is relevant" sentinel.
pub const NO_SOURCE_SENTINEL: &str = "N/A";

/// Lowercase tokens recognized as the sentinel in model output.
const SENTINEL_TOKENS: &[&str] = &["n/a", "none"];

/// One knowledge source and the corpus it is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: SourceId,
    /// Human-readable name ("SunPy", "pySPEDAS", ...)
    pub display_name: String,
    /// Corpus origin (a git repository)
    pub repo_url: String,
    /// File suffixes included when the corpus is indexed
    pub suffixes: Vec<String>,
    /// One-line description shown to the model
    pub description: String,
    /// Whether this is the organizing community's own corpus
    pub community: bool,
}

impl SourceDescriptor {
    pub fn package(
        id: SourceId,
        display_name: impl Into<String>,
        repo_url: impl Into<String>,
        suffixes: &[&str],
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            repo_url: repo_url.into(),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            description: description.into(),
            community: false,
        }
    }

    pub fn as_community(mut self) -> Self {
        self.community = true;
        self
    }
}

/// Ordered, read-only catalog of sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
    community: SourceId,
    other_packages: Vec<String>,
}

impl SourceRegistry {
    /// Build a registry from explicit descriptors.
    ///
    /// Exactly one descriptor must be marked as the community source, ids
    /// must be unique, and no id may spell the sentinel.
    pub fn from_descriptors(
        sources: Vec<SourceDescriptor>,
        other_packages: Vec<String>,
    ) -> Result<Self, DomainError> {
        if sources.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }

        let mut community: Option<SourceId> = None;
        for (i, source) in sources.iter().enumerate() {
            if Self::is_sentinel(source.id.as_str()) {
                return Err(DomainError::ReservedSourceId(source.id.to_string()));
            }
            if sources[..i].iter().any(|s| s.id == source.id) {
                return Err(DomainError::DuplicateSource(source.id.to_string()));
            }
            if source.community {
                if let Some(existing) = &community {
                    return Err(DomainError::MultipleCommunitySources(
                        existing.to_string(),
                        source.id.to_string(),
                    ));
                }
                community = Some(source.id.clone());
            }
        }

        let community = community.ok_or(DomainError::MissingCommunitySource)?;

        Ok(Self {
            sources,
            community,
            other_packages,
        })
    }

    /// The built-in PyHC catalog: seven core packages plus the community site.
    pub fn builtin() -> Self {
        let id = SourceId::from_static;

        let sources = vec![
            SourceDescriptor::package(
                id("hapiclient"),
                "HAPI Client",
                "https://github.com/hapi-server/client-python.git",
                &[".py", ".md"],
                "Python client for servers implementing the Heliophysics Application Programmer's Interface (HAPI)",
            ),
            SourceDescriptor::package(
                id("kamodo"),
                "Kamodo",
                "https://github.com/nasa/Kamodo.git",
                &[".py", ".md"],
                "Functional API for space weather models and data",
            ),
            SourceDescriptor::package(
                id("plasmapy"),
                "PlasmaPy",
                "https://github.com/PlasmaPy/PlasmaPy.git",
                &[".py", ".md"],
                "Core package for plasma physics",
            ),
            SourceDescriptor::package(
                id("pysat"),
                "pysat",
                "https://github.com/pysat/pysat.git",
                &[".py", ".rst"],
                "Python Satellite Data Analysis Toolkit",
            ),
            SourceDescriptor::package(
                id("pyspedas"),
                "pySPEDAS",
                "https://github.com/spedas/pyspedas.git",
                &[".py", ".md"],
                "Python Space Physics Environment Data Analysis Software",
            ),
            SourceDescriptor::package(
                id("spacepy"),
                "SpacePy",
                "https://github.com/spacepy/spacepy.git",
                &[".py", ".md"],
                "Tools for space science: coordinates, time, data models and analysis",
            ),
            SourceDescriptor::package(
                id("sunpy"),
                "SunPy",
                "https://github.com/sunpy/sunpy.git",
                &[".py", ".rst"],
                "Solar data analysis environment",
            ),
            SourceDescriptor::package(
                id("pyhc"),
                "PyHC",
                "https://github.com/heliophysicsPy/heliophysicsPy.github.io.git",
                &[".md", ".yml"],
                "The Python in Heliophysics Community website: meetings, events, standards and activities",
            )
            .as_community(),
        ];

        Self {
            sources,
            community: id("pyhc"),
            other_packages: builtin_other_packages(),
        }
    }

    /// All descriptors in catalog order.
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// Ids of every source (packages and community) in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &SourceId> {
        self.sources.iter().map(|s| &s.id)
    }

    /// Ids of package sources only (community excluded).
    pub fn package_ids(&self) -> impl Iterator<Item = &SourceId> {
        self.sources.iter().filter(|s| !s.community).map(|s| &s.id)
    }

    /// Descriptors of package sources only.
    pub fn packages(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter().filter(|s| !s.community)
    }

    pub fn community_id(&self) -> &SourceId {
        &self.community
    }

    /// Names of community packages outside the catalog (persona trivia).
    pub fn other_packages(&self) -> &[String] {
        &self.other_packages
    }

    pub fn get(&self, id: &SourceId) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SourceId) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a free-text token to a known id (case-insensitive, trimmed).
    pub fn resolve(&self, token: &str) -> Option<&SourceId> {
        let token = token.trim();
        self.sources
            .iter()
            .map(|s| &s.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(token))
    }

    /// Whether a token spells the "no source" sentinel.
    pub fn is_sentinel(token: &str) -> bool {
        let token = token.trim();
        SENTINEL_TOKENS.iter().any(|s| s.eq_ignore_ascii_case(token))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_other_packages() -> Vec<String> {
    [
        "AFINO", "CCSDSPy", "dbprocessing", "enlilviz", "GeospaceLAB", "OMMBV", "pyDARN",
        "sami2py", "SkyWinder", "SkyWinder-Analysis", "solarmach", "solo-epd-loader",
        "space-packet-parser", "Speasy", "fiasco", "OCBpy", "AACGMV2", "apexpy", "SpiceyPy",
        "NDCube", "viresclient", "aiapy", "aidapy", "geopack", "MCALF", "hissw", "sunraster",
        "sunkit-image", "sunkit-instruments", "pyflct", "irispy-lmsal", "XRTpy",
        "regularizePSF", "TomograPy", "python-magnetosphere", "pysatCDF", "pyglow", "geodata",
        "fisspy", "CDFlib", "PyTplot", "lofarSun", "PyGS", "ACEmag", "AstrometryAzEl",
        "Auroral Electrojet", "DASCutils", "Digital Meridian Spectrometer", "GEOrinex",
        "GOESutils", "GIMAmag", "GLOW", "HWM-93", "IGRF-13", "IRI-2016", "IRI-90", "LOWTRAN",
        "Maidenhead", "MGSutils", "POLAN", "PyGemini", "PyMap3D", "PyZenodo", "ReesAurora",
        "Scanning Doppler Interferometer", "ScienceDates", "THEMISasi", "WMM2020", "WMM2015",
        "MSISE-00", "MadrigalWeb", "NEXRADutils",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
