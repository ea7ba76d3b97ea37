//! Scheduler manager
//!
//! The manager runs two symmetric pipelines, publish and unpublish,
//! against the node store. Each invocation selects due candidates, runs
//! them through the hook and event seams, applies the state transition
//! and persists the result. Invocations are synchronous and run to
//! completion; serializing overlapping runs is the trigger layer's job.

use std::fmt;

use chrono::{TimeZone, Utc};
use tracing::{debug, info, warn};

use nodestore::{Node, NodeId, NodeStorage, NodeVariant, ScheduleAction, StoreError};

use crate::config::{SchedulerSettings, TypeSchedulingPolicy};
use crate::error::SchedulerError;
use crate::events::{EventBus, EventListener, SchedulerEventKind};
use crate::hooks::{HookRegistry, HookResult};
use crate::moderation::ModerationHandler;
use crate::rules::RulesNotifier;

/// What invoked the lightweight cron, used only in the log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CronTrigger {
    /// Command-line invocation
    CommandLine,
    /// Interactive run from the admin form
    AdminForm,
    /// External crontab hitting the cron URL
    #[default]
    Url,
}

impl fmt::Display for CronTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CronTrigger::CommandLine => write!(f, "command line"),
            CronTrigger::AdminForm => write!(f, "admin form"),
            CronTrigger::Url => write!(f, "url"),
        }
    }
}

/// Options for a lightweight cron run
#[derive(Debug, Clone, Copy, Default)]
pub struct CronOptions {
    /// Suppress the start/completion log pair for this run
    pub nolog: bool,
    /// What triggered the run
    pub trigger: CronTrigger,
}

/// The scheduled-publication state machine
pub struct SchedulerManager {
    store: Box<dyn NodeStorage>,
    settings: SchedulerSettings,
    hooks: HookRegistry,
    events: EventBus,
    moderation: Option<Box<dyn ModerationHandler>>,
    rules: Option<Box<dyn RulesNotifier>>,
}

impl SchedulerManager {
    pub fn new(store: Box<dyn NodeStorage>, settings: SchedulerSettings) -> Self {
        Self {
            store,
            settings,
            hooks: HookRegistry::default(),
            events: EventBus::default(),
            moderation: None,
            rules: None,
        }
    }

    /// The node store this manager operates on
    pub fn store(&self) -> &dyn NodeStorage {
        self.store.as_ref()
    }

    /// The hook registry, for collaborator registration
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Register an event listener
    pub fn register_listener(&mut self, listener: Box<dyn EventListener>) {
        self.events.register(listener);
    }

    /// Install the moderation collaborator
    pub fn set_moderation(&mut self, handler: Box<dyn ModerationHandler>) {
        self.moderation = Some(handler);
    }

    /// Install the rule-engine collaborator
    pub fn set_rules(&mut self, notifier: Box<dyn RulesNotifier>) {
        self.rules = Some(notifier);
    }

    /// Publish all nodes whose publish time has arrived.
    ///
    /// Returns true if any variant changed state.
    pub fn publish(&self, now: i64) -> Result<bool, SchedulerError> {
        self.process(ScheduleAction::Publish, now)
    }

    /// Unpublish all nodes whose unpublish time has arrived.
    ///
    /// Returns true if any variant changed state.
    pub fn unpublish(&self, now: i64) -> Result<bool, SchedulerError> {
        self.process(ScheduleAction::Unpublish, now)
    }

    /// Whether all registered guard hooks allow the action on this variant
    pub fn is_allowed(&self, variant: &NodeVariant, action: ScheduleAction) -> bool {
        self.hooks.allows(variant, action)
    }

    /// Candidate ids contributed by registered candidate hooks for the
    /// action, duplicates removed
    pub fn candidate_ids(&self, action: ScheduleAction) -> Vec<NodeId> {
        self.hooks.candidate_ids(action)
    }

    /// Run publish then unpublish against one wall-clock cutoff
    pub fn cron(&self) -> Result<bool, SchedulerError> {
        let now = Utc::now().timestamp();
        let published = self.publish(now)?;
        let unpublished = self.unpublish(now)?;
        Ok(published || unpublished)
    }

    /// Run only this scheduler's cron processing, out of band.
    ///
    /// Entry point for external triggers (crontab URL, admin form, command
    /// line). Emits a start/completion log pair unless logging is disabled
    /// globally or suppressed in the options.
    pub fn run_lightweight_cron(&self, options: CronOptions) -> Result<(), SchedulerError> {
        let log = self.settings.log && !options.nolog;
        if log {
            info!(trigger = %options.trigger, "lightweight cron run activated");
        }
        self.cron()?;
        if log {
            info!("lightweight cron run completed");
        }
        Ok(())
    }

    fn process(&self, action: ScheduleAction, now: i64) -> Result<bool, SchedulerError> {
        let mut result = false;

        // Candidate selection: enabled types with the schedule field elapsed,
        // in deterministic (timestamp, nid) order.
        let enabled = self.settings.enabled_types(action);
        let mut nids = if enabled.is_empty() {
            Vec::new()
        } else {
            self.store.due(action, now, &enabled)?
        };

        // Collaborators may add candidates, then alter the merged list.
        for nid in self.candidate_ids(action) {
            if !nids.contains(&nid) {
                nids.push(nid);
            }
        }
        self.hooks.alter(&mut nids, action);
        debug!(%action, now, candidates = nids.len(), "selected candidates");

        for nid in nids {
            let Some(node) = self.load_latest(nid)? else {
                debug!(nid, "candidate no longer exists, skipping");
                continue;
            };

            // Candidate hooks can return nodes of types which are not
            // enabled for this action. That is a contract violation, not a
            // skip: surface it. The check is per node, the policy is the
            // same for all variants.
            let policy = self.settings.policy(&node.node_type);
            if !policy.enabled_for(action) {
                return Err(SchedulerError::TypeNotEnabled {
                    nid,
                    title: node.variants.first().map(|v| v.title.clone()).unwrap_or_default(),
                    node_type: node.node_type.clone(),
                    action,
                });
            }

            // Translations are evaluated independently: some may be due now
            // and others not.
            for variant in node.variants {
                if self.process_variant(variant, action, now, policy)? {
                    result = true;
                }
            }
        }

        Ok(result)
    }

    /// Run one variant through the eligibility pipeline. Returns true if
    /// the variant committed.
    fn process_variant(
        &self,
        variant: NodeVariant,
        action: ScheduleAction,
        now: i64,
        policy: &TypeSchedulingPolicy,
    ) -> Result<bool, SchedulerError> {
        // Skip variants without their own elapsed timestamp.
        let Some(due_on) = variant.schedule(action) else {
            return Ok(false);
        };
        if due_on > now {
            return Ok(false);
        }

        // An elapsed publish_on still present means scheduled publishing was
        // deferred by a guard or hook; unpublishing must not supersede it.
        if action == ScheduleAction::Unpublish {
            if let Some(publish_on) = variant.publish_on {
                if publish_on <= now {
                    debug!(
                        nid = variant.nid,
                        langcode = %variant.langcode,
                        "publish still outstanding, unpublish deferred"
                    );
                    return Ok(false);
                }
            }
        }

        if !self.is_allowed(&variant, action) {
            debug!(nid = variant.nid, langcode = %variant.langcode, %action, "action vetoed by guard hook");
            return Ok(false);
        }

        // The date was checked above, but a collaborator could have removed
        // it concurrently. Trap that here with a meaningful error.
        if variant.schedule(action).is_none() {
            return Err(SchedulerError::MissingScheduleDate {
                nid: variant.nid,
                title: variant.title.clone(),
                field: action.field(),
            });
        }

        let mut variant = self.events.dispatch(SchedulerEventKind::pre(action), variant);

        variant.changed = due_on;
        let mut msg_extra = String::new();
        if action == ScheduleAction::Publish {
            let old_created = variant.created;
            if policy.publish_touch || (variant.created > due_on && policy.publish_past_date_created) {
                variant.created = due_on;
                msg_extra = format!(
                    "The previous creation date was {}, now updated to match the publishing date.",
                    format_ts(old_created)
                );
            }
        }

        if policy.revision_for(action) {
            let mut log = match action {
                ScheduleAction::Publish => {
                    format!("Published by Stagehand. The scheduled publishing date was {}.", format_ts(due_on))
                }
                ScheduleAction::Unpublish => {
                    format!(
                        "Unpublished by Stagehand. The scheduled unpublishing date was {}.",
                        format_ts(due_on)
                    )
                }
            };
            if !msg_extra.is_empty() {
                log.push(' ');
                log.push_str(&msg_extra);
            }
            variant.start_new_revision(log, now);
        }

        // Clear the schedule so subsequent saves cannot re-trigger this
        // action. Everything past this point commits the cleared field.
        variant.clear_schedule(action);

        match self.hooks.run_overrides(&mut variant, action) {
            HookResult::Failed => {
                warn!(
                    nid = variant.nid,
                    node_type = %variant.node_type,
                    title = %variant.title,
                    "{action}ing failed, override hook returned a failure code"
                );
                // The cleared schedule is still persisted, so this variant is
                // not retried on the next run.
                self.store.save(&variant)?;
                return Ok(false);
            }
            HookResult::Handled => {
                info!(
                    nid = variant.nid,
                    node_type = %variant.node_type,
                    title = %variant.title,
                    "scheduled {action}ing completed by override hooks"
                );
            }
            HookResult::NotHandled => {
                info!(
                    nid = variant.nid,
                    node_type = %variant.node_type,
                    title = %variant.title,
                    "scheduled {action}ing"
                );
                variant.status = action == ScheduleAction::Publish;
            }
        }

        if let Some(rules) = &self.rules {
            rules.notify(&variant, action);
        }

        let variant = self.events.dispatch(SchedulerEventKind::post(action), variant);
        self.commit(&variant, action)?;
        Ok(true)
    }

    /// Persist a processed variant, through the moderation workflow when one
    /// claims it
    fn commit(&self, variant: &NodeVariant, action: ScheduleAction) -> Result<(), StoreError> {
        if let Some(moderation) = &self.moderation {
            if moderation.is_moderated(variant) {
                return moderation.commit(variant, action);
            }
        }
        self.store.save(variant)?;
        Ok(())
    }

    /// Resolve a candidate id to the latest revision of its node
    fn load_latest(&self, nid: NodeId) -> Result<Option<Node>, StoreError> {
        if self.store.load(nid)?.is_none() {
            return Ok(None);
        }
        match self.store.revision_ids(nid)?.last() {
            Some(&vid) => self.store.load_revision(nid, vid),
            None => Ok(None),
        }
    }
}

fn format_ts(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}
