//! CLI tests for the sd binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use stagehand::{NodeStorage, NodeVariant, SqliteNodeStore};

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let db_path = dir.path().join("nodes.db");
    let config_path = dir.path().join("stagehand.yml");
    let yaml = format!(
        "store:\n  db-path: {}\ntypes:\n  article:\n    publish-enable: true\n    unpublish-enable: true\n",
        db_path.display()
    );
    std::fs::write(&config_path, yaml).expect("Failed to write config");
    config_path
}

fn seed_due_article(dir: &TempDir) -> nodestore::NodeId {
    let store = SqliteNodeStore::open(dir.path().join("nodes.db")).expect("Failed to open store");
    let mut variant = NodeVariant::new("article", "Hello", "en", 10);
    variant.publish_on = Some(99);
    store.insert(&variant).expect("Failed to insert")
}

#[test]
fn test_cron_publishes_due_node() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&dir);
    let nid = seed_due_article(&dir);

    Command::cargo_bin("sd")
        .expect("binary exists")
        .arg("--config")
        .arg(&config)
        .arg("cron")
        .arg("--nolog")
        .assert()
        .success()
        .stdout(predicate::str::contains("cron run completed"));

    let store = SqliteNodeStore::open(dir.path().join("nodes.db")).unwrap();
    let node = store.load(nid).unwrap().unwrap();
    assert!(node.variants[0].status);
    assert_eq!(node.variants[0].publish_on, None);
}

#[test]
fn test_due_lists_candidates() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&dir);
    let nid = seed_due_article(&dir);

    Command::cargo_bin("sd")
        .expect("binary exists")
        .arg("--config")
        .arg(&config)
        .args(["due", "publish"])
        .assert()
        .success()
        .stdout(predicate::str::contains(nid.to_string()));
}

#[test]
fn test_policy_shows_resolved_flags() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&dir);

    Command::cargo_bin("sd")
        .expect("binary exists")
        .arg("--config")
        .arg(&config)
        .args(["policy", "article"])
        .assert()
        .success()
        .stdout(predicate::str::contains("publish-enable:            true"));
}
