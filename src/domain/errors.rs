use thiserror::Error;

/// Configuration defects detected before any network activity. These abort
/// the run with zero side effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("destination credential missing: set NOTION_TOKEN")]
    MissingCredential,

    #[error("destination database id missing: set NOTION_DB")]
    MissingDatabaseId,
}

/// Failures of the single destination write. Fatal to the run; never
/// retried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("destination rejected credentials: {detail}")]
    Auth { detail: String },

    #[error("destination schema mismatch on property '{property}': {detail}")]
    SchemaMismatch { property: String, detail: String },

    #[error("destination transport failure: {detail}")]
    Transport { detail: String },
}

/// Terminal failure states of one pipeline run. Metric-level failures never
/// appear here; they are recorded as `Absent` values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("run aborted before any network call: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_names_the_property() {
        let err = PublishError::SchemaMismatch {
            property: "DeFi TVL ($B)".to_string(),
            detail: "is not a property that exists".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DeFi TVL ($B)"));
        assert!(msg.contains("is not a property that exists"));
    }

    #[test]
    fn test_precondition_error_names_the_variable() {
        assert!(
            PreconditionError::MissingCredential
                .to_string()
                .contains("NOTION_TOKEN")
        );
        assert!(
            PreconditionError::MissingDatabaseId
                .to_string()
                .contains("NOTION_DB")
        );
    }

    #[test]
    fn test_run_error_wraps_both_fatal_kinds() {
        let abort: RunError = PreconditionError::MissingCredential.into();
        assert!(matches!(abort, RunError::Precondition(_)));

        let publish: RunError = PublishError::Transport {
            detail: "connection reset".to_string(),
        }
        .into();
        assert!(publish.to_string().contains("connection reset"));
    }
}
