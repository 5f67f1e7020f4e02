//! Domain error types

use thiserror::Error;

/// Errors raised while building domain values from configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Source catalog is empty")]
    EmptyCatalog,

    #[error("Invalid source id: '{0}'")]
    InvalidSourceId(String),

    #[error("Duplicate source id: '{0}'")]
    DuplicateSource(String),

    #[error("Source id '{0}' collides with the 'no source' sentinel")]
    ReservedSourceId(String),

    #[error("More than one community source configured: '{0}' and '{1}'")]
    MultipleCommunitySources(String, String),

    #[error("No community source configured")]
    MissingCommunitySource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::DuplicateSource("sunpy".into()).to_string(),
            "Duplicate source id: 'sunpy'"
        );
        assert_eq!(
            DomainError::ReservedSourceId("n/a".into()).to_string(),
            "Source id 'n/a' collides with the 'no source' sentinel"
        );
    }
}
