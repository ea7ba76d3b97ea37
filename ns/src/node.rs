//! Node domain types

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node
pub type NodeId = i64;

/// Unique identifier for a node revision
pub type RevisionId = i64;

/// A scheduled state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleAction {
    /// Set the node published at its `publish_on` time
    Publish,
    /// Set the node unpublished at its `unpublish_on` time
    Unpublish,
}

impl ScheduleAction {
    /// Name of the schedule field this action consumes
    pub fn field(&self) -> &'static str {
        match self {
            ScheduleAction::Publish => "publish_on",
            ScheduleAction::Unpublish => "unpublish_on",
        }
    }
}

impl fmt::Display for ScheduleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleAction::Publish => write!(f, "publish"),
            ScheduleAction::Unpublish => write!(f, "unpublish"),
        }
    }
}

/// One language variant of one revision of one node.
///
/// This is the unit the scheduler pipeline operates on. Timestamps are
/// epoch seconds; schedule fields are nullable and cleared once consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeVariant {
    pub nid: NodeId,
    pub vid: RevisionId,
    pub node_type: String,
    pub langcode: String,
    pub title: String,
    /// Published state
    pub status: bool,
    pub created: i64,
    pub changed: i64,
    pub publish_on: Option<i64>,
    pub unpublish_on: Option<i64>,
    pub revision_log: Option<String>,
    pub revision_created: i64,
    /// When set, the next save writes a new revision instead of updating
    /// the current one in place.
    #[serde(skip)]
    pub(crate) new_revision: bool,
}

impl NodeVariant {
    /// Create an unsaved variant with no schedule and unpublished state
    pub fn new(
        node_type: impl Into<String>,
        title: impl Into<String>,
        langcode: impl Into<String>,
        created: i64,
    ) -> Self {
        Self {
            nid: 0,
            vid: 0,
            node_type: node_type.into(),
            langcode: langcode.into(),
            title: title.into(),
            status: false,
            created,
            changed: created,
            publish_on: None,
            unpublish_on: None,
            revision_log: None,
            revision_created: created,
            new_revision: false,
        }
    }

    /// The schedule timestamp for the given action, if any
    pub fn schedule(&self, action: ScheduleAction) -> Option<i64> {
        match action {
            ScheduleAction::Publish => self.publish_on,
            ScheduleAction::Unpublish => self.unpublish_on,
        }
    }

    /// Set the schedule timestamp for the given action
    pub fn set_schedule(&mut self, action: ScheduleAction, on: Option<i64>) {
        match action {
            ScheduleAction::Publish => self.publish_on = on,
            ScheduleAction::Unpublish => self.unpublish_on = on,
        }
    }

    /// Clear the schedule timestamp for the given action
    pub fn clear_schedule(&mut self, action: ScheduleAction) {
        self.set_schedule(action, None);
    }

    /// Mark this variant so the next save creates a new revision with the
    /// given log message and revision timestamp
    pub fn start_new_revision(&mut self, log: impl Into<String>, at: i64) {
        self.new_revision = true;
        self.revision_log = Some(log.into());
        self.revision_created = at;
    }

    /// Whether the next save will create a new revision
    pub fn is_new_revision(&self) -> bool {
        self.new_revision
    }
}

/// One revision of a node with all of its language variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub nid: NodeId,
    pub vid: RevisionId,
    pub node_type: String,
    /// Variants in stable langcode order
    pub variants: Vec<NodeVariant>,
}

impl Node {
    /// Languages this revision is translated into
    pub fn langcodes(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.langcode.as_str()).collect()
    }

    /// Look up one language variant
    pub fn variant(&self, langcode: &str) -> Option<&NodeVariant> {
        self.variants.iter().find(|v| v.langcode == langcode)
    }
}
