//! Scheduler error types

use nodestore::{NodeId, ScheduleAction, StoreError};
use thiserror::Error;

/// Errors that abort a scheduler run.
///
/// Per-variant conditions (not yet due, guard denied, hook failure) are
/// not errors; they skip the variant and processing continues.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A candidate's type does not permit the action. The selection query
    /// filters by enabled types, so this means a candidate hook supplied
    /// an id outside its contract.
    #[error("node {nid} '{title}' will not be {action}ed because type '{node_type}' is not enabled for scheduled {action}ing")]
    TypeNotEnabled {
        nid: NodeId,
        title: String,
        node_type: String,
        action: ScheduleAction,
    },

    /// The schedule timestamp vanished between selection and use
    #[error("node {nid} '{title}' will not be processed because field '{field}' has no value")]
    MissingScheduleDate {
        nid: NodeId,
        title: String,
        field: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_not_enabled_display() {
        let err = SchedulerError::TypeNotEnabled {
            nid: 7,
            title: "Hello".to_string(),
            node_type: "page".to_string(),
            action: ScheduleAction::Publish,
        };
        assert_eq!(
            err.to_string(),
            "node 7 'Hello' will not be published because type 'page' is not enabled for scheduled publishing"
        );
    }

    #[test]
    fn test_missing_date_display() {
        let err = SchedulerError::MissingScheduleDate {
            nid: 7,
            title: "Hello".to_string(),
            field: "publish_on",
        };
        assert_eq!(
            err.to_string(),
            "node 7 'Hello' will not be processed because field 'publish_on' has no value"
        );
    }
}
