//! Hook registry and hook traits
//!
//! Collaborators extend the scheduler by registering implementations of
//! these traits. Registration is explicit; there is no runtime discovery.

use nodestore::{NodeId, NodeVariant, ScheduleAction};

/// Outcome of an override hook invocation.
///
/// Decoded from the legacy integer protocol where 0 meant not handled,
/// 1 handled and -1 failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookResult {
    /// The hook did not act; the default transition applies
    #[default]
    NotHandled,
    /// The hook performed the action itself; skip the default transition
    Handled,
    /// The hook failed; abort processing of this variant
    Failed,
}

impl HookResult {
    /// Decode a legacy integer return code
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => HookResult::Handled,
            -1 => HookResult::Failed,
            _ => HookResult::NotHandled,
        }
    }

    /// The legacy integer return code for this result
    pub fn code(&self) -> i32 {
        match self {
            HookResult::NotHandled => 0,
            HookResult::Handled => 1,
            HookResult::Failed => -1,
        }
    }

    /// Combine two results. Failed takes precedence over Handled, which
    /// takes precedence over NotHandled.
    pub fn combine(self, other: HookResult) -> HookResult {
        use HookResult::*;
        match (self, other) {
            (Failed, _) | (_, Failed) => Failed,
            (Handled, _) | (_, Handled) => Handled,
            _ => NotHandled,
        }
    }
}

/// Predicate that can veto a scheduled action on a variant.
///
/// All registered guards must allow; results combine with logical AND.
pub trait GuardHook {
    fn allow_publishing(&self, _variant: &NodeVariant) -> bool {
        true
    }

    fn allow_unpublishing(&self, _variant: &NodeVariant) -> bool {
        true
    }
}

/// Supplies additional candidate node ids for an action
pub trait CandidateHook {
    fn candidates(&self, action: ScheduleAction) -> Vec<NodeId>;
}

/// Mutates the merged candidate list in place (add, remove, reorder)
pub trait AlterHook {
    fn alter(&self, ids: &mut Vec<NodeId>, action: ScheduleAction);
}

/// Performs the action's effect in place of the default transition
pub trait OverrideHook {
    fn publish(&self, _variant: &mut NodeVariant) -> HookResult {
        HookResult::NotHandled
    }

    fn unpublish(&self, _variant: &mut NodeVariant) -> HookResult {
        HookResult::NotHandled
    }
}

/// Registry of all hook implementations known to the scheduler
#[derive(Default)]
pub struct HookRegistry {
    guards: Vec<Box<dyn GuardHook>>,
    candidates: Vec<Box<dyn CandidateHook>>,
    alters: Vec<Box<dyn AlterHook>>,
    overrides: Vec<Box<dyn OverrideHook>>,
}

impl HookRegistry {
    pub fn register_guard(&mut self, hook: Box<dyn GuardHook>) {
        self.guards.push(hook);
    }

    pub fn register_candidate(&mut self, hook: Box<dyn CandidateHook>) {
        self.candidates.push(hook);
    }

    pub fn register_alter(&mut self, hook: Box<dyn AlterHook>) {
        self.alters.push(hook);
    }

    pub fn register_override(&mut self, hook: Box<dyn OverrideHook>) {
        self.overrides.push(hook);
    }

    /// Whether all registered guards allow the action. True when none are
    /// registered.
    pub fn allows(&self, variant: &NodeVariant, action: ScheduleAction) -> bool {
        self.guards.iter().all(|guard| match action {
            ScheduleAction::Publish => guard.allow_publishing(variant),
            ScheduleAction::Unpublish => guard.allow_unpublishing(variant),
        })
    }

    /// Union of candidate ids contributed for the action, duplicates
    /// removed, first-seen order preserved
    pub fn candidate_ids(&self, action: ScheduleAction) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for hook in &self.candidates {
            for nid in hook.candidates(action) {
                if !ids.contains(&nid) {
                    ids.push(nid);
                }
            }
        }
        ids
    }

    /// Run all alter hooks over the candidate list
    pub fn alter(&self, ids: &mut Vec<NodeId>, action: ScheduleAction) {
        for hook in &self.alters {
            hook.alter(ids, action);
        }
    }

    /// Run all override hooks for the action and combine their results
    pub fn run_overrides(&self, variant: &mut NodeVariant, action: ScheduleAction) -> HookResult {
        let mut outcome = HookResult::NotHandled;
        for hook in &self.overrides {
            let result = match action {
                ScheduleAction::Publish => hook.publish(variant),
                ScheduleAction::Unpublish => hook.unpublish(variant),
            };
            outcome = outcome.combine(result);
        }
        outcome
    }
}
