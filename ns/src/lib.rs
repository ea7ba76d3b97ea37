//! NodeStore - revisioned, multi-language content node store
//!
//! Stores content nodes the way a CMS does: each node has a current
//! revision, each revision has one row per language variant, and every
//! variant carries its own publish/unpublish schedule timestamps.
//!
//! # Architecture
//!
//! ```text
//! node            # one row per node: current revision pointer
//! └── node_revision   # one row per (revision, langcode)
//!     ├── title, status, created, changed
//!     └── publish_on, unpublish_on, revision_log
//! ```
//!
//! # Example
//!
//! ```ignore
//! use nodestore::{NodeStorage, NodeVariant, ScheduleAction, SqliteNodeStore};
//!
//! let store = SqliteNodeStore::open("nodestore.db")?;
//! let mut article = NodeVariant::new("article", "Launch post", "en", 1700000000);
//! article.publish_on = Some(1700003600);
//! let nid = store.insert(&article)?;
//! let due = store.due(ScheduleAction::Publish, 1700007200, &["article".to_string()])?;
//! assert_eq!(due, vec![nid]);
//! ```

pub mod cli;
pub mod config;
mod node;
mod sqlite;
mod store;

pub use node::{Node, NodeId, NodeVariant, RevisionId, ScheduleAction};
pub use sqlite::SqliteNodeStore;
pub use store::{NodeStorage, StoreError};

/// Default database file name
pub const DEFAULT_DB_PATH: &str = "nodestore.db";

/// Default language code for new variants
pub const DEFAULT_LANGCODE: &str = "en";
