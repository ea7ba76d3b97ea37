//! Optional rule-engine collaborator

use nodestore::{NodeVariant, ScheduleAction};

/// Fire-and-forget notification that a scheduled action just committed.
///
/// Failures inside the notifier are its own concern; the pipeline neither
/// observes nor reacts to them.
pub trait RulesNotifier {
    fn notify(&self, variant: &NodeVariant, action: ScheduleAction);
}
