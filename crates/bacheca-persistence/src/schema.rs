//! Schema bootstrap
//!
//! DDL for the publication tables, used by the test harness and by fresh
//! deployments. The composite unique index on `(kind, sub_city_id,
//! sub_category_id)` is load-bearing: the duplicate guard is advisory, and
//! this index is what actually closes the race between two concurrent
//! submissions targeting the same combination.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Statement};

/// Backend-appropriate auto-increment primary key column.
fn pk_column(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        DbBackend::MySql => "id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY",
        DbBackend::Postgres => "id BIGSERIAL PRIMARY KEY",
    }
}

fn table_statements(pk: &str) -> Vec<String> {
    vec![
        format!("CREATE TABLE IF NOT EXISTS city ({pk}, name VARCHAR(128) NOT NULL)"),
        format!(
            "CREATE TABLE IF NOT EXISTS sub_city ({pk}, \
             city_id BIGINT NOT NULL, name VARCHAR(128) NOT NULL)"
        ),
        format!("CREATE TABLE IF NOT EXISTS category ({pk}, name VARCHAR(128) NOT NULL)"),
        format!(
            "CREATE TABLE IF NOT EXISTS sub_category ({pk}, \
             category_id BIGINT NOT NULL, name VARCHAR(128) NOT NULL)"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS listing ({pk}, \
             kind VARCHAR(32) NOT NULL, \
             city_id BIGINT NOT NULL, \
             sub_city_id BIGINT NOT NULL, \
             category_id BIGINT NOT NULL, \
             sub_category_id BIGINT NOT NULL, \
             title VARCHAR(255) NOT NULL, \
             body TEXT NOT NULL, \
             attrs TEXT NULL, \
             image_group_id VARCHAR(36) NULL, \
             created_by VARCHAR(64) NOT NULL, \
             expires_at TIMESTAMP NULL, \
             gmt_create TIMESTAMP NOT NULL, \
             gmt_modified TIMESTAMP NOT NULL)"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS listing_image ({pk}, \
             group_id VARCHAR(36) NOT NULL, \
             slot VARCHAR(64) NOT NULL, \
             path VARCHAR(255) NOT NULL, \
             status VARCHAR(16) NOT NULL, \
             gmt_create TIMESTAMP NOT NULL)"
        ),
    ]
}

const INDEX_STATEMENTS: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS uk_listing_combination \
     ON listing (kind, sub_city_id, sub_category_id)",
    "CREATE INDEX IF NOT EXISTS idx_listing_image_group \
     ON listing_image (group_id)",
];

/// Create all publication tables and indexes if they do not exist.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    for sql in table_statements(pk_column(backend)) {
        db.execute(Statement::from_string(backend, sql)).await?;
    }

    for sql in INDEX_STATEMENTS {
        // MySQL has no `CREATE INDEX IF NOT EXISTS`; a duplicate-name error
        // there means the index is already in place.
        let sql = match backend {
            DbBackend::MySql => sql.replace("IF NOT EXISTS ", ""),
            _ => sql.to_string(),
        };
        let result = db.execute(Statement::from_string(backend, sql)).await;
        match result {
            Ok(_) => {}
            Err(e) if backend == DbBackend::MySql => {
                let msg = e.to_string();
                if !msg.contains("Duplicate key name") {
                    return Err(e);
                }
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
