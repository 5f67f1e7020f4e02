//! Source catalog override from TOML (`[[sources]]` array)

use pyhc_domain::{
    ConfigIssue, ConfigIssueCode, DomainError, SourceDescriptor, SourceId, SourceRegistry,
};
use serde::{Deserialize, Serialize};

/// One `[[sources]]` entry.
///
/// ```toml
/// [[sources]]
/// id = "sunpy"
/// display_name = "SunPy"
/// repo_url = "https://github.com/sunpy/sunpy.git"
/// suffixes = [".py", ".rst"]
/// description = "Solar data analysis environment"
///
/// [[sources]]
/// id = "pyhc"
/// display_name = "PyHC"
/// community = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourceConfig {
    pub id: String,
    pub display_name: Option<String>,
    pub repo_url: String,
    pub suffixes: Vec<String>,
    pub description: String,
    pub community: bool,
}

impl FileSourceConfig {
    fn to_descriptor(&self) -> Result<SourceDescriptor, DomainError> {
        let id = SourceId::new(&self.id)?;
        Ok(SourceDescriptor {
            display_name: self.display_name.clone().unwrap_or_else(|| id.to_string()),
            repo_url: self.repo_url.clone(),
            suffixes: self.suffixes.clone(),
            description: self.description.clone(),
            community: self.community,
            id,
        })
    }
}

/// Collect every catalog problem instead of stopping at the first.
pub fn validate_sources(sources: &[FileSourceConfig]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    if sources.is_empty() {
        return issues;
    }

    let mut seen: Vec<SourceId> = Vec::new();
    for source in sources {
        let id = match SourceId::new(&source.id) {
            Ok(id) => id,
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidSourceId,
                    format!("sources: {}", e),
                ));
                continue;
            }
        };
        if SourceRegistry::is_sentinel(id.as_str()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ReservedSourceId,
                format!("sources: '{}' is reserved for \"no source\"", id),
            ));
        }
        if seen.contains(&id) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateSourceId,
                format!("sources: '{}' is listed more than once", id),
            ));
        }
        seen.push(id);
    }

    match sources.iter().filter(|s| s.community).count() {
        0 => issues.push(ConfigIssue::error(
            ConfigIssueCode::MissingCommunitySource,
            "sources: exactly one entry must set community = true",
        )),
        1 => {}
        n => issues.push(ConfigIssue::error(
            ConfigIssueCode::MultipleCommunitySources,
            format!("sources: {} entries set community = true, expected 1", n),
        )),
    }

    issues
}

/// Build the registry: the built-in catalog unless `[[sources]]` overrides it.
pub fn to_registry(sources: &[FileSourceConfig]) -> Result<SourceRegistry, DomainError> {
    if sources.is_empty() {
        return Ok(SourceRegistry::builtin());
    }
    let descriptors = sources
        .iter()
        .map(FileSourceConfig::to_descriptor)
        .collect::<Result<Vec<_>, _>>()?;
    SourceRegistry::from_descriptors(
        descriptors,
        SourceRegistry::builtin().other_packages().to_vec(),
    )
}
