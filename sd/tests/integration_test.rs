//! Integration tests for Stagehand
//!
//! These tests verify end-to-end behavior of the scheduler against an
//! on-disk node store.

use tempfile::TempDir;

use stagehand::config::{SchedulerSettings, TypeSchedulingPolicy};
use stagehand::manager::{CronOptions, CronTrigger, SchedulerManager};
use stagehand::{NodeStorage, NodeVariant, ScheduleAction, SqliteNodeStore};

fn enabled_policy() -> TypeSchedulingPolicy {
    TypeSchedulingPolicy {
        publish_enable: true,
        unpublish_enable: true,
        publish_revision: true,
        ..Default::default()
    }
}

fn article_settings() -> SchedulerSettings {
    let mut settings = SchedulerSettings::new(true, TypeSchedulingPolicy::default());
    settings.set_type("article".to_string(), enabled_policy());
    settings
}

// =============================================================================
// Full pipeline over a persistent store
// =============================================================================

#[test]
fn test_publish_persists_across_store_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("nodes.db");

    let nid = {
        let store = SqliteNodeStore::open(&db_path).expect("Failed to open store");
        let mut variant = NodeVariant::new("article", "Launch post", "en", 10);
        variant.publish_on = Some(99);
        store.insert(&variant).expect("Failed to insert")
    };

    {
        let store = SqliteNodeStore::open(&db_path).expect("Failed to open store");
        let manager = SchedulerManager::new(Box::new(store), article_settings());
        assert!(manager.publish(100).expect("publish failed"));
    }

    // A fresh handle sees the committed transition and the new revision.
    let store = SqliteNodeStore::open(&db_path).expect("Failed to open store");
    let node = store.load(nid).expect("load failed").expect("node missing");
    assert!(node.variants[0].status);
    assert_eq!(node.variants[0].publish_on, None);
    assert_eq!(store.revision_ids(nid).expect("revision_ids failed").len(), 2);
}

#[test]
fn test_full_lifecycle_publish_then_unpublish() {
    let store = SqliteNodeStore::in_memory().expect("Failed to open store");
    let mut variant = NodeVariant::new("article", "Promo", "en", 10);
    variant.publish_on = Some(50);
    variant.unpublish_on = Some(200);
    let nid = store.insert(&variant).expect("Failed to insert");

    let manager = SchedulerManager::new(Box::new(store), article_settings());

    // First sweep at t=100: publish is due, unpublish is not.
    assert!(manager.publish(100).expect("publish failed"));
    assert!(!manager.unpublish(100).expect("unpublish failed"));
    let node = manager.store().load(nid).unwrap().unwrap();
    assert!(node.variants[0].status);
    assert_eq!(node.variants[0].unpublish_on, Some(200));

    // Second sweep at t=250: the unpublish fires and consumes its schedule.
    assert!(!manager.publish(250).expect("publish failed"));
    assert!(manager.unpublish(250).expect("unpublish failed"));
    let node = manager.store().load(nid).unwrap().unwrap();
    assert!(!node.variants[0].status);
    assert_eq!(node.variants[0].unpublish_on, None);

    // Nothing left to do.
    assert!(!manager.publish(300).unwrap());
    assert!(!manager.unpublish(300).unwrap());
}

// =============================================================================
// Lightweight cron entry point
// =============================================================================

#[test]
fn test_lightweight_cron_processes_both_pipelines() {
    let store = SqliteNodeStore::in_memory().expect("Failed to open store");

    let mut to_publish = NodeVariant::new("article", "Coming up", "en", 10);
    to_publish.publish_on = Some(99);
    let publish_nid = store.insert(&to_publish).expect("Failed to insert");

    let mut to_unpublish = NodeVariant::new("article", "Expiring", "en", 10);
    to_unpublish.status = true;
    to_unpublish.unpublish_on = Some(99);
    let unpublish_nid = store.insert(&to_unpublish).expect("Failed to insert");

    let manager = SchedulerManager::new(Box::new(store), article_settings());
    manager
        .run_lightweight_cron(CronOptions {
            nolog: false,
            trigger: CronTrigger::Url,
        })
        .expect("cron failed");

    assert!(manager.store().load(publish_nid).unwrap().unwrap().variants[0].status);
    assert!(!manager.store().load(unpublish_nid).unwrap().unwrap().variants[0].status);
}

// =============================================================================
// Multi-language processing
// =============================================================================

#[test]
fn test_translations_publish_independently() {
    let store = SqliteNodeStore::in_memory().expect("Failed to open store");
    let mut en = NodeVariant::new("article", "Hello", "en", 10);
    en.publish_on = Some(50);
    let nid = store.insert(&en).expect("Failed to insert");

    let mut de = NodeVariant::new("article", "Hallo", "de", 10);
    de.nid = nid;
    de.publish_on = Some(150);
    store.insert(&de).expect("Failed to insert translation");

    let manager = SchedulerManager::new(Box::new(store), article_settings());

    assert!(manager.publish(100).unwrap());
    let node = manager.store().load(nid).unwrap().unwrap();
    assert!(node.variant("en").unwrap().status);
    assert!(!node.variant("de").unwrap().status);

    assert!(manager.publish(200).unwrap());
    let node = manager.store().load(nid).unwrap().unwrap();
    assert!(node.variant("de").unwrap().status);
    assert_eq!(node.variant("de").unwrap().publish_on, None);
}

// =============================================================================
// Contract violations
// =============================================================================

#[test]
fn test_disabled_type_from_candidate_hook_aborts() {
    use stagehand::hooks::CandidateHook;
    use stagehand::{NodeId, SchedulerError};

    let store = SqliteNodeStore::in_memory().expect("Failed to open store");
    let mut variant = NodeVariant::new("page", "Rogue", "en", 10);
    variant.publish_on = Some(50);
    let nid = store.insert(&variant).expect("Failed to insert");

    struct Supply(NodeId);
    impl CandidateHook for Supply {
        fn candidates(&self, _action: ScheduleAction) -> Vec<NodeId> {
            vec![self.0]
        }
    }

    let mut manager = SchedulerManager::new(Box::new(store), article_settings());
    manager.hooks_mut().register_candidate(Box::new(Supply(nid)));

    let err = manager.publish(100).expect_err("run should abort");
    assert!(matches!(err, SchedulerError::TypeNotEnabled { .. }));
}
