//! Shared test harness: in-memory SQLite with the publication schema, a
//! seeded pair of dimension hierarchies, and a tempdir-backed resource
//! store.

#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::*;
use tempfile::TempDir;

use bacheca_common::{KIND_PAGE_CONTENT, PublicationSettings, RESOURCE_COMMITTED};
use bacheca_persistence::entity::{category, city, listing, listing_image, sub_category, sub_city};
use bacheca_persistence::schema;
use bacheca_publication::{
    LocalResourceStore, NoopNotifier, PublicationService, Submission, UploadedFile,
};

/// Seeded dimensions:
/// - city 1 "New York" → sub_city 10 "Brooklyn", 11 "Queens"
/// - city 2 "Boston"   → sub_city 12 "Allston"
/// - category 2 "Home" → sub_category 5 "Furniture", 6 "Garden"
pub async fn setup() -> (PublicationService, TempDir) {
    setup_with_settings(PublicationSettings::default()).await
}

pub async fn setup_with_settings(
    mut settings: PublicationSettings,
) -> (PublicationService, TempDir) {
    let db = connect_memory().await;
    schema::create_schema(&db).await.expect("schema");
    seed(&db).await;

    let dir = tempfile::tempdir().expect("tempdir");
    settings.upload_root = dir.path().to_path_buf();
    let store = Arc::new(LocalResourceStore::new(dir.path()));
    let service = PublicationService::new(db, store, Arc::new(NoopNotifier), settings);
    (service, dir)
}

/// An in-memory SQLite handle. The pool is capped at one connection:
/// every pooled `:memory:` connection would otherwise get its own database.
pub async fn connect_memory() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    Database::connect(options).await.expect("sqlite connect")
}

pub async fn seed(db: &DatabaseConnection) {
    for (id, name) in [(1, "New York"), (2, "Boston")] {
        city::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await
        .expect("seed city");
    }
    for (id, city_id, name) in [(10, 1, "Brooklyn"), (11, 1, "Queens"), (12, 2, "Allston")] {
        sub_city::ActiveModel {
            id: Set(id),
            city_id: Set(city_id),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await
        .expect("seed sub_city");
    }
    category::ActiveModel {
        id: Set(2),
        name: Set("Home".to_string()),
    }
    .insert(db)
    .await
    .expect("seed category");
    for (id, name) in [(5, "Furniture"), (6, "Garden")] {
        sub_category::ActiveModel {
            id: Set(id),
            category_id: Set(2),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await
        .expect("seed sub_category");
    }
}

/// New page-content submission over the given leaf id lists.
pub fn submission(sub_city_ids: &str, sub_category_ids: &str) -> Submission {
    Submission {
        id: None,
        kind: KIND_PAGE_CONTENT.to_string(),
        city_ids: "1,2".to_string(),
        sub_city_ids: sub_city_ids.to_string(),
        category_ids: "2".to_string(),
        sub_category_ids: sub_category_ids.to_string(),
        payload: bacheca_publication::Payload {
            title: "About this area".to_string(),
            body: "Local intro text".to_string(),
            attrs: None,
        },
        files: Vec::new(),
        actor: "admin-1".to_string(),
        validity_days: None,
    }
}

pub fn jpeg(slot: &str) -> UploadedFile {
    UploadedFile {
        slot: slot.to_string(),
        ext: "jpg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

/// Insert a listing row directly, bypassing the publication pipeline.
pub async fn insert_listing(
    db: &DatabaseConnection,
    kind: &str,
    sub_city_id: i64,
    sub_category_id: i64,
    group_id: Option<&str>,
) -> i64 {
    let now = chrono::Local::now().naive_local();
    let row = listing::ActiveModel {
        id: NotSet,
        kind: Set(kind.to_string()),
        city_id: Set(1),
        sub_city_id: Set(sub_city_id),
        category_id: Set(2),
        sub_category_id: Set(sub_category_id),
        title: Set("existing".to_string()),
        body: Set("existing body".to_string()),
        attrs: Set(None),
        image_group_id: Set(group_id.map(str::to_string)),
        created_by: Set("seed".to_string()),
        expires_at: Set(None),
        gmt_create: Set(now),
        gmt_modified: Set(now),
    }
    .insert(db)
    .await
    .expect("insert listing");
    row.id
}

/// Insert an image metadata row directly.
pub async fn insert_image_row(db: &DatabaseConnection, group_id: &str, slot: &str, path: &str) {
    listing_image::ActiveModel {
        id: NotSet,
        group_id: Set(group_id.to_string()),
        slot: Set(slot.to_string()),
        path: Set(path.to_string()),
        status: Set(RESOURCE_COMMITTED.to_string()),
        gmt_create: Set(chrono::Local::now().naive_local()),
    }
    .insert(db)
    .await
    .expect("insert image row");
}

/// Number of regular files anywhere under `root`.
pub fn files_on_disk(root: &std::path::Path) -> usize {
    let mut count = 0;
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                count += 1;
            }
        }
    }
    count
}

pub async fn count_listings(db: &DatabaseConnection, kind: &str) -> u64 {
    listing::Entity::find()
        .filter(listing::Column::Kind.eq(kind))
        .count(db)
        .await
        .expect("count listings")
}

pub async fn count_image_rows(db: &DatabaseConnection, group_id: &str) -> u64 {
    listing_image::Entity::find()
        .filter(listing_image::Column::GroupId.eq(group_id))
        .count(db)
        .await
        .expect("count image rows")
}
