//! Stagehand - scheduled publishing and unpublishing of content nodes
//!
//! Stagehand runs a scheduled-publication state machine over a revisioned,
//! multi-language node store. On each invocation it selects nodes whose
//! publish or unpublish time has arrived, runs them through guard and
//! override hooks and a pre/post event chain, applies the state
//! transition and persists the result. A consumed schedule timestamp is
//! cleared, so each schedule fires exactly once.
//!
//! # Core concepts
//!
//! - **Deterministic order**: candidates process in (timestamp, nid)
//!   order so near-simultaneous schedules are auditable
//! - **Publish wins**: an elapsed publish schedule defers unpublishing
//!   until the next run
//! - **Explicit seams**: collaborators register hooks and listeners
//!   against the manager; nothing is discovered at runtime
//! - **Run to completion**: invocations are synchronous and
//!   single-threaded; overlapping runs are the trigger layer's problem
//!
//! # Modules
//!
//! - [`manager`] - the publish/unpublish pipelines and cron entry points
//! - [`hooks`] - guard, candidate, alter and override hook registry
//! - [`events`] - pre/post transition event bus
//! - [`config`] - per-type scheduling policies and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod manager;
pub mod moderation;
pub mod rules;

// Re-export commonly used types
pub use config::{Config, PolicyOverride, SchedulerSettings, StoreConfig, TypeSchedulingPolicy};
pub use error::SchedulerError;
pub use events::{EventBus, EventListener, SchedulerEventKind};
pub use hooks::{AlterHook, CandidateHook, GuardHook, HookRegistry, HookResult, OverrideHook};
pub use manager::{CronOptions, CronTrigger, SchedulerManager};
pub use moderation::ModerationHandler;
pub use rules::RulesNotifier;

// Re-export nodestore types for convenience
pub use nodestore::{Node, NodeId, NodeStorage, NodeVariant, RevisionId, ScheduleAction, SqliteNodeStore, StoreError};
