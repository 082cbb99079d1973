//! Error types for the publication core
//!
//! Every failure surfaced to a caller is one of these variants, so a handler
//! can always tell "nothing was written" (validation/duplicate failures,
//! which precede the transaction) from "a database error occurred mid-write"
//! (rolled back, so also nothing persisted).

use sea_orm::DbErr;

/// Typed errors produced by the publication and deletion services.
#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    /// The resolver found fewer rows than the submission requested for an
    /// axis, i.e. at least one id is unknown or belongs to a parent outside
    /// the submitted parent set.
    #[error("invalid {axis} selection: requested {requested} values, {resolved} resolved")]
    InvalidAxisValue {
        axis: &'static str,
        requested: usize,
        resolved: usize,
    },

    /// A record already exists for one of the submission's combinations.
    /// Carries the human-readable axis labels of the collision.
    #[error("a record already exists for '{sub_city}' / '{sub_category}'")]
    DuplicateCombination {
        sub_city: String,
        sub_category: String,
    },

    /// The edit target does not exist.
    #[error("record {0} not found")]
    RecordNotFound(i64),

    /// Any data-layer error raised during the write loop. The enclosing
    /// transaction has been rolled back by the time this is observed.
    #[error("database error: {0}")]
    TransactionFailure(#[from] DbErr),

    /// An uploaded file could not be written to the resource store.
    #[error("failed to stage upload '{path}': {source}")]
    ResourceStageFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The per-request deadline elapsed before the pipeline finished.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// An operation was invoked with nothing to act on (no axis values, or
    /// an empty deletion batch).
    #[error("empty selection")]
    EmptySelection,
}

impl PublishError {
    /// True when the failure is a user-input problem rather than an
    /// infrastructure fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PublishError::InvalidAxisValue { .. }
                | PublishError::DuplicateCombination { .. }
                | PublishError::RecordNotFound(_)
                | PublishError::EmptySelection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = PublishError::InvalidAxisValue {
            axis: "sub_city",
            requested: 3,
            resolved: 2,
        };
        assert_eq!(
            format!("{}", err),
            "invalid sub_city selection: requested 3 values, 2 resolved"
        );

        let err = PublishError::DuplicateCombination {
            sub_city: "Brooklyn".to_string(),
            sub_category: "Furniture".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "a record already exists for 'Brooklyn' / 'Furniture'"
        );

        let err = PublishError::RecordNotFound(7);
        assert_eq!(format!("{}", err), "record 7 not found");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PublishError::EmptySelection.is_client_error());
        assert!(PublishError::RecordNotFound(1).is_client_error());
        assert!(!PublishError::DeadlineExceeded.is_client_error());
        assert!(
            !PublishError::TransactionFailure(DbErr::Custom("boom".to_string())).is_client_error()
        );
    }
}
