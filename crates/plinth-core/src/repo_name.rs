//! Strongly-typed repo name wrapper.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Name of a pluggable unit (plugin or theme), e.g. `acme-events`.
    ///
    /// Used to namespace per-repo option keys such as the migration running
    /// flag, and as the log prefix for everything the repo does.
    pub struct RepoName;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(RepoName::try_new("").is_none());
        assert_eq!(RepoName::try_new("acme").unwrap(), "acme");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let err = serde_yaml::from_str::<RepoName>("''").unwrap_err();
        assert!(err.to_string().contains("RepoName must not be empty"));
    }
}
