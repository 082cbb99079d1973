//! Cascading-deletion scenarios: orphan-aware file cleanup over shared
//! image groups.

mod common;

use bacheca_common::{KIND_PAGE_CONTENT, PublishError};
use bacheca_persistence::entity::listing;
use sea_orm::EntityTrait;

use common::*;

#[tokio::test]
async fn batch_delete_removes_orphaned_group_files_once() {
    let (service, dir) = setup().await;

    let mut sub = submission("10,11", "5");
    sub.files = vec![jpeg("main")];
    let outcome = service.publish(sub).await.unwrap();
    let group_id = outcome.image_group_id.clone().unwrap();
    assert_eq!(files_on_disk(dir.path()), 1);

    let result = service.delete(&outcome.record_ids).await.unwrap();

    assert_eq!(result.rows_deleted, 2);
    assert_eq!(result.files_deleted, 1);
    assert_eq!(files_on_disk(dir.path()), 0);
    assert_eq!(count_image_rows(service.db(), &group_id).await, 0);
    assert_eq!(count_listings(service.db(), KIND_PAGE_CONTENT).await, 0);
}

#[tokio::test]
async fn partial_delete_keeps_shared_group_files() {
    let (service, dir) = setup().await;

    let mut sub = submission("10,11", "5");
    sub.files = vec![jpeg("main")];
    let outcome = service.publish(sub).await.unwrap();
    let group_id = outcome.image_group_id.clone().unwrap();

    // Delete only the first record; the second still owns the group.
    let result = service.delete(&outcome.record_ids[..1]).await.unwrap();

    assert_eq!(result.rows_deleted, 1);
    assert_eq!(result.files_deleted, 0);
    assert_eq!(files_on_disk(dir.path()), 1);
    assert_eq!(count_image_rows(service.db(), &group_id).await, 1);

    // Deleting the survivor orphans the group and removes its files.
    let result = service.delete(&outcome.record_ids[1..]).await.unwrap();
    assert_eq!(result.rows_deleted, 1);
    assert_eq!(result.files_deleted, 1);
    assert_eq!(files_on_disk(dir.path()), 0);
}

#[tokio::test]
async fn survivor_outside_batch_blocks_file_deletion() {
    let (service, dir) = setup().await;

    let mut sub = submission("10,11", "5");
    sub.files = vec![jpeg("main")];
    let outcome = service.publish(sub).await.unwrap();
    let group_id = outcome.image_group_id.clone().unwrap();

    // A third record, created independently, also references the group.
    let outsider = insert_listing(service.db(), KIND_PAGE_CONTENT, 10, 6, Some(&group_id)).await;

    let result = service.delete(&outcome.record_ids).await.unwrap();

    assert_eq!(result.rows_deleted, 2);
    assert_eq!(result.files_deleted, 0);
    assert_eq!(files_on_disk(dir.path()), 1);
    assert!(
        listing::Entity::find_by_id(outsider)
            .one(service.db())
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn rows_without_group_delete_cleanly() {
    let (service, _dir) = setup().await;
    let outcome = service.publish(submission("10,11", "5")).await.unwrap();

    let result = service.delete(&outcome.record_ids).await.unwrap();

    assert_eq!(result.rows_deleted, 2);
    assert_eq!(result.files_deleted, 0);
}

#[tokio::test]
async fn missing_file_does_not_abort_row_deletion() {
    let (service, _dir) = setup().await;

    let id = insert_listing(service.db(), KIND_PAGE_CONTENT, 11, 5, Some("g-lost")).await;
    insert_image_row(service.db(), "g-lost", "main", "g-lost/main-gone.jpg").await;

    let result = service.delete(&[id]).await.unwrap();

    // The file was already missing on disk; the rows still go.
    assert_eq!(result.rows_deleted, 1);
    assert_eq!(result.files_deleted, 0);
    assert_eq!(count_image_rows(service.db(), "g-lost").await, 0);
    assert_eq!(count_listings(service.db(), KIND_PAGE_CONTENT).await, 0);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let (service, _dir) = setup().await;

    let err = service.delete(&[]).await.unwrap_err();
    assert!(matches!(err, PublishError::EmptySelection));
}

#[tokio::test]
async fn unknown_ids_report_zero_counts() {
    let (service, _dir) = setup().await;

    let result = service.delete(&[404, 405]).await.unwrap();
    assert_eq!(result.rows_deleted, 0);
    assert_eq!(result.files_deleted, 0);
}
