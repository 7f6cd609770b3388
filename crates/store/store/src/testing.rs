//! Backend-agnostic conformance tests for store implementations.
//!
//! Each backend crate calls these from its own test module with a fresh
//! store instance, so every implementation is held to the same lifecycle
//! contract.

use chrono::{Duration, Utc};

use depot_core::FileRecord;

use crate::error::StoreError;
use crate::records::RecordStore;
use crate::settings::SettingsStore;

/// Run the full record store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_record_store_conformance_tests(
    store: &dyn RecordStore,
) -> Result<(), StoreError> {
    test_get_missing(store).await?;
    test_put_and_get(store).await?;
    test_put_replaces_lifecycle(store).await?;
    test_mark_downloaded_is_set_once(store).await?;
    test_mark_downloaded_missing(store).await?;
    test_mark_deleted_is_idempotent(store).await?;
    test_list_ordering_and_paging(store).await?;
    test_cleanup_candidates_filter(store).await?;
    test_stats(store).await?;
    Ok(())
}

/// Run the settings store conformance test suite.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_settings_store_conformance_tests(
    store: &dyn SettingsStore,
) -> Result<(), StoreError> {
    let val = store.get("conf-missing").await?;
    assert!(val.is_none(), "get on an unset key should return None");

    store.set("conf-key", "v1").await?;
    let val = store.get("conf-key").await?;
    assert_eq!(val.as_deref(), Some("v1"));

    store.set("conf-key", "v2").await?;
    let val = store.get("conf-key").await?;
    assert_eq!(val.as_deref(), Some("v2"), "set should overwrite");

    store.set("conf-other", "x").await?;
    let mut all = store.all().await?;
    all.sort();
    assert!(all.contains(&("conf-key".to_owned(), "v2".to_owned())));
    assert!(all.contains(&("conf-other".to_owned(), "x".to_owned())));

    Ok(())
}

fn record(job_id: &str, uploaded_offset_hours: i64) -> FileRecord {
    FileRecord::new(
        job_id,
        format!("{job_id}.zip"),
        64,
        Utc::now() - Duration::hours(uploaded_offset_hours),
    )
}

async fn test_get_missing(store: &dyn RecordStore) -> Result<(), StoreError> {
    let found = store.get("conf-never-uploaded").await?;
    assert!(found.is_none(), "get on a missing id should return None");
    Ok(())
}

async fn test_put_and_get(store: &dyn RecordStore) -> Result<(), StoreError> {
    let rec = record("conf-put-get", 0);
    store.put(rec.clone()).await?;

    let found = store.get("conf-put-get").await?.expect("record should exist");
    assert_eq!(found.job_id, rec.job_id);
    assert_eq!(found.blob_path, rec.blob_path);
    assert_eq!(found.size_bytes, rec.size_bytes);
    assert!(found.downloaded_at.is_none());
    assert!(!found.deleted);
    Ok(())
}

async fn test_put_replaces_lifecycle(store: &dyn RecordStore) -> Result<(), StoreError> {
    store.put(record("conf-replace", 2)).await?;
    store.mark_downloaded("conf-replace", Utc::now()).await?;
    store.mark_deleted("conf-replace").await?;

    // Re-upload: the whole lifecycle starts over.
    store.put(record("conf-replace", 0)).await?;
    let found = store.get("conf-replace").await?.expect("record should exist");
    assert!(
        found.downloaded_at.is_none(),
        "re-upload should clear downloaded_at"
    );
    assert!(!found.deleted, "re-upload should clear the tombstone");
    Ok(())
}

async fn test_mark_downloaded_is_set_once(store: &dyn RecordStore) -> Result<(), StoreError> {
    store.put(record("conf-download", 1)).await?;

    let first = Utc::now() - Duration::minutes(30);
    let updated = store.mark_downloaded("conf-download", first).await?;
    assert_eq!(updated.downloaded_at, Some(first));

    let later = Utc::now();
    let updated = store.mark_downloaded("conf-download", later).await?;
    assert_eq!(
        updated.downloaded_at,
        Some(first),
        "a second download must not move downloaded_at"
    );
    Ok(())
}

async fn test_mark_downloaded_missing(store: &dyn RecordStore) -> Result<(), StoreError> {
    let result = store.mark_downloaded("conf-no-such-id", Utc::now()).await;
    assert!(
        matches!(result, Err(StoreError::NotFound(_))),
        "mark_downloaded on a missing id should be NotFound"
    );
    Ok(())
}

async fn test_mark_deleted_is_idempotent(store: &dyn RecordStore) -> Result<(), StoreError> {
    store.put(record("conf-delete", 1)).await?;

    store.mark_deleted("conf-delete").await?;
    let found = store.get("conf-delete").await?.expect("record should exist");
    assert!(found.deleted, "mark_deleted should set the tombstone");

    // Second call is a no-op success, not an error.
    store.mark_deleted("conf-delete").await?;

    let result = store.mark_deleted("conf-no-such-id").await;
    assert!(
        matches!(result, Err(StoreError::NotFound(_))),
        "mark_deleted on a missing id should be NotFound"
    );
    Ok(())
}

async fn test_list_ordering_and_paging(store: &dyn RecordStore) -> Result<(), StoreError> {
    let base = Utc::now() + Duration::hours(100);
    // Three uploads at distinct times plus two sharing a timestamp.
    let mut older = record("conf-list-a", 0);
    older.uploaded_at = base - Duration::hours(3);
    let mut newest = record("conf-list-b", 0);
    newest.uploaded_at = base;
    let mut tie_first = record("conf-list-c", 0);
    tie_first.uploaded_at = base - Duration::hours(1);
    let mut tie_second = record("conf-list-d", 0);
    tie_second.uploaded_at = base - Duration::hours(1);

    store.put(older).await?;
    store.put(newest).await?;
    store.put(tie_first).await?;
    store.put(tie_second).await?;

    let listed = store.list(4, 0).await?;
    let ids: Vec<&str> = listed.iter().map(|r| r.job_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["conf-list-b", "conf-list-c", "conf-list-d", "conf-list-a"],
        "uploaded_at descending, ties in insertion order"
    );

    // Paging is a pure function of offset/limit.
    let page = store.list(2, 1).await?;
    let page_ids: Vec<&str> = page.iter().map(|r| r.job_id.as_str()).collect();
    assert_eq!(page_ids, vec!["conf-list-c", "conf-list-d"]);
    let again = store.list(2, 1).await?;
    assert_eq!(page, again, "list must be restartable");
    Ok(())
}

async fn test_cleanup_candidates_filter(store: &dyn RecordStore) -> Result<(), StoreError> {
    let now = Utc::now();
    let cutoff = now - Duration::hours(24);

    // Downloaded 25h ago: eligible.
    store.put(record("conf-sweep-old", 30)).await?;
    store
        .mark_downloaded("conf-sweep-old", now - Duration::hours(25))
        .await?;

    // Downloaded 1h ago: too fresh.
    store.put(record("conf-sweep-fresh", 30)).await?;
    store
        .mark_downloaded("conf-sweep-fresh", now - Duration::hours(1))
        .await?;

    // Never downloaded: never swept, no matter how old.
    store.put(record("conf-sweep-unread", 500)).await?;

    // Old download but already tombstoned.
    store.put(record("conf-sweep-gone", 30)).await?;
    store
        .mark_downloaded("conf-sweep-gone", now - Duration::hours(25))
        .await?;
    store.mark_deleted("conf-sweep-gone").await?;

    let candidates = store.cleanup_candidates(cutoff).await?;
    let ids: Vec<&str> = candidates.iter().map(|r| r.job_id.as_str()).collect();
    assert!(ids.contains(&"conf-sweep-old"));
    assert!(!ids.contains(&"conf-sweep-fresh"));
    assert!(!ids.contains(&"conf-sweep-unread"));
    assert!(!ids.contains(&"conf-sweep-gone"));
    Ok(())
}

async fn test_stats(store: &dyn RecordStore) -> Result<(), StoreError> {
    let mut live = record("conf-stats-live", 0);
    live.size_bytes = 100;
    let mut read = record("conf-stats-read", 0);
    read.size_bytes = 50;
    let mut gone = record("conf-stats-gone", 0);
    gone.size_bytes = 7;

    store.put(live).await?;
    store.put(read).await?;
    store.put(gone).await?;
    store.mark_downloaded("conf-stats-read", Utc::now()).await?;
    store.mark_deleted("conf-stats-gone").await?;

    let stats = store.stats().await?;
    assert!(stats.total >= 3);
    assert!(stats.active >= 2);
    assert!(stats.deleted >= 1);
    assert!(stats.downloaded >= 1);
    assert!(
        stats.total_size_bytes >= 150,
        "active sizes should be summed, tombstoned ones excluded"
    );
    Ok(())
}
