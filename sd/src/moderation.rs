//! Optional moderation-workflow collaborator

use nodestore::{NodeVariant, ScheduleAction, StoreError};

/// Moderation-aware persistence.
///
/// When a handler is installed and claims a variant, the scheduler commits
/// through it instead of the default store save, so the transition goes
/// through the moderation workflow's own state change.
pub trait ModerationHandler {
    /// Whether the variant participates in a moderation workflow
    fn is_moderated(&self, variant: &NodeVariant) -> bool;

    /// Commit the variant through the workflow's transition for the action
    fn commit(&self, variant: &NodeVariant, action: ScheduleAction) -> Result<(), StoreError>;
}
