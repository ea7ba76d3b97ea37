//! Storage trait and error types

use thiserror::Error;

use crate::node::{Node, NodeId, NodeVariant, RevisionId, ScheduleAction};

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("node {0} not found")]
    NotFound(NodeId),

    #[error("revision {vid} of node {nid} not found")]
    RevisionNotFound { nid: NodeId, vid: RevisionId },
}

/// Query and mutation interface for the content node store.
///
/// The scheduler consumes the store exclusively through this trait.
/// Implementations are synchronous; callers run to completion without
/// internal locking, so serializing overlapping invocations is the
/// trigger layer's responsibility.
pub trait NodeStorage {
    /// Ids of nodes of the given types with the action's schedule field
    /// elapsed at `now`, latest revision only.
    ///
    /// A node is a candidate when any of its variants is due. Results are
    /// ordered by earliest due timestamp, then nid, ascending - callers
    /// rely on this order being deterministic.
    fn due(&self, action: ScheduleAction, now: i64, types: &[String]) -> Result<Vec<NodeId>, StoreError>;

    /// Load the current revision of a node with all language variants
    fn load(&self, nid: NodeId) -> Result<Option<Node>, StoreError>;

    /// All revision ids of a node, oldest first
    fn revision_ids(&self, nid: NodeId) -> Result<Vec<RevisionId>, StoreError>;

    /// Load a specific revision of a node with all language variants
    fn load_revision(&self, nid: NodeId, vid: RevisionId) -> Result<Option<Node>, StoreError>;

    /// Persist one variant.
    ///
    /// When the variant is marked as a new revision, the current revision's
    /// rows are cloned to a fresh vid, the node's revision pointer advances,
    /// and the variant is applied there. Otherwise the variant's row in the
    /// current revision is updated in place. Returns the revision written.
    fn save(&self, variant: &NodeVariant) -> Result<RevisionId, StoreError>;

    /// Insert a new node, or a new translation when the variant names an
    /// existing nid. Returns the node id.
    fn insert(&self, variant: &NodeVariant) -> Result<NodeId, StoreError>;
}
