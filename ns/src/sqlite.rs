//! SQLite-backed node store

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use tracing::debug;

use crate::node::{Node, NodeId, NodeVariant, RevisionId, ScheduleAction};
use crate::store::{NodeStorage, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS node (
    nid INTEGER PRIMARY KEY AUTOINCREMENT,
    vid INTEGER NOT NULL,
    node_type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS node_revision (
    nid INTEGER NOT NULL,
    vid INTEGER NOT NULL,
    node_type TEXT NOT NULL,
    langcode TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    status INTEGER NOT NULL DEFAULT 0,
    created INTEGER NOT NULL,
    changed INTEGER NOT NULL,
    publish_on INTEGER,
    unpublish_on INTEGER,
    revision_log TEXT,
    revision_created INTEGER NOT NULL,
    PRIMARY KEY (vid, langcode)
);

CREATE INDEX IF NOT EXISTS idx_node_revision_nid ON node_revision (nid);
CREATE INDEX IF NOT EXISTS idx_node_revision_publish_on
    ON node_revision (publish_on) WHERE publish_on IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_node_revision_unpublish_on
    ON node_revision (unpublish_on) WHERE unpublish_on IS NOT NULL;
";

const VARIANT_COLUMNS: &str = "nid, vid, node_type, langcode, title, status, created, changed, \
     publish_on, unpublish_on, revision_log, revision_created";

/// SQLite implementation of [`NodeStorage`]
pub struct SqliteNodeStore {
    conn: Connection,
}

impl SqliteNodeStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.as_ref().display(), "SqliteNodeStore::open: ready");
        Ok(Self { conn })
    }

    /// Open an in-memory store, used by tests
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// All node ids in the store, ascending
    pub fn node_ids(&self) -> Result<Vec<NodeId>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT nid FROM node ORDER BY nid")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<NodeId>, _>>()?;
        Ok(ids)
    }

    fn current_vid(&self, nid: NodeId) -> Result<Option<RevisionId>, StoreError> {
        let vid = self
            .conn
            .query_row("SELECT vid FROM node WHERE nid = ?1", [nid], |row| row.get(0))
            .optional()?;
        Ok(vid)
    }

    fn next_vid(&self) -> Result<RevisionId, StoreError> {
        let vid = self
            .conn
            .query_row("SELECT COALESCE(MAX(vid), 0) + 1 FROM node_revision", [], |row| {
                row.get(0)
            })?;
        Ok(vid)
    }

    fn load_at(&self, nid: NodeId, vid: RevisionId) -> Result<Option<Node>, StoreError> {
        let sql = format!(
            "SELECT {VARIANT_COLUMNS} FROM node_revision WHERE nid = ?1 AND vid = ?2 ORDER BY langcode"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let variants = stmt
            .query_map([nid, vid], variant_from_row)?
            .collect::<Result<Vec<NodeVariant>, _>>()?;
        match variants.first() {
            Some(first) => Ok(Some(Node {
                nid,
                vid,
                node_type: first.node_type.clone(),
                variants,
            })),
            None => Ok(None),
        }
    }

    fn write_variant(&self, variant: &NodeVariant, vid: RevisionId) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT OR REPLACE INTO node_revision ({VARIANT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        );
        self.conn.execute(
            &sql,
            rusqlite::params![
                variant.nid,
                vid,
                variant.node_type,
                variant.langcode,
                variant.title,
                variant.status as i64,
                variant.created,
                variant.changed,
                variant.publish_on,
                variant.unpublish_on,
                variant.revision_log,
                variant.revision_created,
            ],
        )?;
        Ok(())
    }
}

impl NodeStorage for SqliteNodeStore {
    fn due(&self, action: ScheduleAction, now: i64, types: &[String]) -> Result<Vec<NodeId>, StoreError> {
        if types.is_empty() {
            return Ok(Vec::new());
        }
        let field = action.field();
        let placeholders = vec!["?"; types.len()].join(", ");
        let sql = format!(
            "SELECT n.nid FROM node n
             JOIN node_revision r ON r.nid = n.nid AND r.vid = n.vid
             WHERE r.{field} IS NOT NULL AND r.{field} <= ?
               AND n.node_type IN ({placeholders})
             GROUP BY n.nid
             ORDER BY MIN(r.{field}) ASC, n.nid ASC"
        );
        let mut params: Vec<&dyn ToSql> = vec![&now];
        for node_type in types {
            params.push(node_type);
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map(&params[..], |row| row.get(0))?
            .collect::<Result<Vec<NodeId>, _>>()?;
        debug!(%action, now, candidates = ids.len(), "SqliteNodeStore::due");
        Ok(ids)
    }

    fn load(&self, nid: NodeId) -> Result<Option<Node>, StoreError> {
        match self.current_vid(nid)? {
            Some(vid) => self.load_at(nid, vid),
            None => Ok(None),
        }
    }

    fn revision_ids(&self, nid: NodeId) -> Result<Vec<RevisionId>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT vid FROM node_revision WHERE nid = ?1 ORDER BY vid")?;
        let ids = stmt
            .query_map([nid], |row| row.get(0))?
            .collect::<Result<Vec<RevisionId>, _>>()?;
        Ok(ids)
    }

    fn load_revision(&self, nid: NodeId, vid: RevisionId) -> Result<Option<Node>, StoreError> {
        self.load_at(nid, vid)
    }

    fn save(&self, variant: &NodeVariant) -> Result<RevisionId, StoreError> {
        let current = self.current_vid(variant.nid)?.ok_or(StoreError::NotFound(variant.nid))?;
        let tx = self.conn.unchecked_transaction()?;
        let target = if variant.is_new_revision() {
            let new_vid = self.next_vid()?;
            // Clone the current revision's rows so untouched translations
            // carry over to the new revision.
            self.conn.execute(
                "INSERT INTO node_revision (nid, vid, node_type, langcode, title, status, created,
                                            changed, publish_on, unpublish_on, revision_log, revision_created)
                 SELECT nid, ?1, node_type, langcode, title, status, created,
                        changed, publish_on, unpublish_on, revision_log, revision_created
                 FROM node_revision WHERE nid = ?2 AND vid = ?3",
                rusqlite::params![new_vid, variant.nid, current],
            )?;
            self.conn
                .execute("UPDATE node SET vid = ?1 WHERE nid = ?2", rusqlite::params![new_vid, variant.nid])?;
            new_vid
        } else {
            current
        };
        self.write_variant(variant, target)?;
        tx.commit()?;
        debug!(nid = variant.nid, vid = target, langcode = %variant.langcode, "SqliteNodeStore::save");
        Ok(target)
    }

    fn insert(&self, variant: &NodeVariant) -> Result<NodeId, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        // A known nid adds a translation to the node's current revision.
        if variant.nid != 0 {
            if let Some(vid) = self.current_vid(variant.nid)? {
                self.write_variant(variant, vid)?;
                tx.commit()?;
                return Ok(variant.nid);
            }
        }

        let vid = self.next_vid()?;
        let nid = if variant.nid != 0 {
            self.conn.execute(
                "INSERT INTO node (nid, vid, node_type) VALUES (?1, ?2, ?3)",
                rusqlite::params![variant.nid, vid, variant.node_type],
            )?;
            variant.nid
        } else {
            self.conn.execute(
                "INSERT INTO node (vid, node_type) VALUES (?1, ?2)",
                rusqlite::params![vid, variant.node_type],
            )?;
            self.conn.last_insert_rowid()
        };
        let mut row = variant.clone();
        row.nid = nid;
        self.write_variant(&row, vid)?;
        tx.commit()?;
        debug!(nid, vid, node_type = %variant.node_type, "SqliteNodeStore::insert");
        Ok(nid)
    }
}

fn variant_from_row(row: &Row) -> rusqlite::Result<NodeVariant> {
    let mut variant = NodeVariant::new("", "", "", 0);
    variant.nid = row.get(0)?;
    variant.vid = row.get(1)?;
    variant.node_type = row.get(2)?;
    variant.langcode = row.get(3)?;
    variant.title = row.get(4)?;
    variant.status = row.get::<_, i64>(5)? != 0;
    variant.created = row.get(6)?;
    variant.changed = row.get(7)?;
    variant.publish_on = row.get(8)?;
    variant.unpublish_on = row.get(9)?;
    variant.revision_log = row.get(10)?;
    variant.revision_created = row.get(11)?;
    Ok(variant)
}
