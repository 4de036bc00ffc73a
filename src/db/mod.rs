//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

use crate::models::DEFAULT_SETTINGS;

/// Number of schema steps; stored in `PRAGMA user_version` once applied.
pub const SCHEMA_VERSION: i64 = 4;

/// Initialize the database connection pool and bring the schema up to date.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Apply every schema step above the stored version.
///
/// Each step checks before it creates, so re-running one never touches
/// existing rows: the visit count and custom settings survive.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;

    let current: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;

    for version in (current + 1)..=SCHEMA_VERSION {
        apply_step(&mut conn, version).await?;
        // PRAGMA does not accept bound parameters.
        let pragma = format!("PRAGMA user_version = {}", version);
        sqlx::query(&pragma).execute(&mut *conn).await?;
        tracing::info!("Applied schema step {}", version);
    }

    Ok(())
}

async fn apply_step(conn: &mut SqliteConnection, version: i64) -> Result<(), sqlx::Error> {
    match version {
        1 => {
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS posts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    image_url TEXT,
                    content TEXT NOT NULL,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS visits (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    count INTEGER NOT NULL DEFAULT 0
                );

                INSERT OR IGNORE INTO visits (id, count) VALUES (1, 0);

                CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);
                "#,
            )
            .execute(&mut *conn)
            .await?;
        }
        2 => {
            // Databases created before posts carried images.
            let columns: Vec<String> = sqlx::query("PRAGMA table_info(posts)")
                .fetch_all(&mut *conn)
                .await?
                .iter()
                .map(|row| row.get("name"))
                .collect();

            if !columns.iter().any(|c| c == "image_url") {
                sqlx::query("ALTER TABLE posts ADD COLUMN image_url TEXT")
                    .execute(&mut *conn)
                    .await?;
            }
        }
        3 => {
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS recipes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    ingredients TEXT NOT NULL,
                    cook_time TEXT NOT NULL,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                );

                CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at);
                "#,
            )
            .execute(&mut *conn)
            .await?;
        }
        4 => {
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS site_settings (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                "#,
            )
            .execute(&mut *conn)
            .await?;

            for (key, value) in DEFAULT_SETTINGS {
                sqlx::query("INSERT OR IGNORE INTO site_settings (key, value) VALUES (?, ?)")
                    .bind(key)
                    .bind(value)
                    .execute(&mut *conn)
                    .await?;
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn user_version(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_init_creates_parent_dir_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("blog.db");

        let pool = init_database(&db_path).await.unwrap();

        assert!(db_path.exists());
        assert_eq!(user_version(&pool).await, SCHEMA_VERSION);

        let visits: i64 = sqlx::query_scalar("SELECT count FROM visits WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(visits, 0);

        let settings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(settings, 6);
    }

    #[tokio::test]
    async fn test_ensure_schema_keeps_existing_data() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("blog.db")).await.unwrap();

        sqlx::query("UPDATE visits SET count = 41 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE site_settings SET value = 'Acme' WHERE key = 'site_name'")
            .execute(&pool)
            .await
            .unwrap();

        // Force every step to run again.
        sqlx::query("PRAGMA user_version = 0")
            .execute(&pool)
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let visits: i64 = sqlx::query_scalar("SELECT count FROM visits")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(visits, 41);

        let name: String =
            sqlx::query_scalar("SELECT value FROM site_settings WHERE key = 'site_name'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(name, "Acme");
        assert_eq!(user_version(&pool).await, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_legacy_posts_table_gains_image_url() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("legacy.db");

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let legacy = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE posts (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL, content TEXT NOT NULL, created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
        )
        .execute(&legacy)
        .await
        .unwrap();
        sqlx::query("INSERT INTO posts (title, content) VALUES ('Old', 'Post')")
            .execute(&legacy)
            .await
            .unwrap();
        legacy.close().await;

        let pool = init_database(&db_path).await.unwrap();

        let row = sqlx::query("SELECT title, image_url FROM posts")
            .fetch_one(&pool)
            .await
            .unwrap();
        let title: String = row.get("title");
        let image_url: Option<String> = row.get("image_url");
        assert_eq!(title, "Old");
        assert!(image_url.is_none());
    }
}
