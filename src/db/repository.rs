//! Database repository for CRUD operations.
//!
//! A `Repository` owns one pooled connection for the lifetime of a request.
//! Every mutation commits on its own; there are no multi-statement transactions.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{Row, Sqlite, SqlitePool};

use crate::errors::AppError;
use crate::models::{Post, PostInput, Recipe, RecipeInput, SettingsInput, SiteSettings};
use crate::AppState;

/// Per-request storage handle.
pub struct Repository {
    conn: PoolConnection<Sqlite>,
}

impl FromRequestParts<AppState> for Repository {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Repository::acquire(&state.pool).await
    }
}

impl Repository {
    pub fn new(conn: PoolConnection<Sqlite>) -> Self {
        Self { conn }
    }

    /// Check a connection out of the pool; it returns on drop.
    pub async fn acquire(pool: &SqlitePool) -> Result<Self, AppError> {
        Ok(Self::new(pool.acquire().await?))
    }

    // ==================== POST OPERATIONS ====================

    /// List all posts, newest first.
    pub async fn list_posts(&mut self) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, image_url, content, created_at FROM posts ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Get a post by ID.
    pub async fn get_post(&mut self, id: i64) -> Result<Option<Post>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, image_url, content, created_at FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    /// Create a new post.
    pub async fn create_post(&mut self, input: &PostInput) -> Result<Post, AppError> {
        let post = input.validate()?;
        let now = timestamp_now();

        let result = sqlx::query(
            "INSERT INTO posts (title, image_url, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.image_url)
        .bind(&post.content)
        .bind(&now)
        .execute(&mut *self.conn)
        .await?;

        Ok(Post {
            id: result.last_insert_rowid(),
            title: post.title,
            image_url: post.image_url,
            content: post.content,
            created_at: now,
        })
    }

    /// Overwrite title, image and content of an existing post.
    pub async fn update_post(&mut self, id: i64, input: &PostInput) -> Result<Post, AppError> {
        let post = input.validate()?;

        let row = sqlx::query(
            "UPDATE posts SET title = ?, image_url = ?, content = ? WHERE id = ? RETURNING id, title, image_url, content, created_at",
        )
        .bind(&post.title)
        .bind(&post.image_url)
        .bind(&post.content)
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        row.as_ref()
            .map(post_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    /// Delete a post. Deleting a missing post is not an error.
    pub async fn delete_post(&mut self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== RECIPE OPERATIONS ====================

    /// List all recipes, newest first.
    pub async fn list_recipes(&mut self) -> Result<Vec<Recipe>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, ingredients, cook_time, created_at FROM recipes ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.iter().map(recipe_from_row).collect())
    }

    /// Create a new recipe.
    pub async fn create_recipe(&mut self, input: &RecipeInput) -> Result<Recipe, AppError> {
        let recipe = input.validate()?;
        let now = timestamp_now();

        let result = sqlx::query(
            "INSERT INTO recipes (title, ingredients, cook_time, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&recipe.title)
        .bind(&recipe.ingredients)
        .bind(&recipe.cook_time)
        .bind(&now)
        .execute(&mut *self.conn)
        .await?;

        Ok(Recipe {
            id: result.last_insert_rowid(),
            title: recipe.title,
            ingredients: recipe.ingredients,
            cook_time: recipe.cook_time,
            created_at: now,
        })
    }

    /// Delete a recipe. Deleting a missing recipe is not an error.
    pub async fn delete_recipe(&mut self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== SETTINGS OPERATIONS ====================

    /// Stored settings merged with defaults for any canonical key not yet written.
    pub async fn get_settings(&mut self) -> Result<SiteSettings, AppError> {
        let rows = sqlx::query("SELECT key, value FROM site_settings")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(SiteSettings::from_stored(
            rows.iter().map(|row| (row.get("key"), row.get("value"))),
        ))
    }

    /// Upsert every canonical key, empty values included.
    pub async fn replace_settings(&mut self, input: &SettingsInput) -> Result<(), AppError> {
        for (key, value) in input.pairs() {
            sqlx::query(
                "INSERT INTO site_settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *self.conn)
            .await?;
        }
        Ok(())
    }

    // ==================== VISIT COUNTER ====================

    /// Increment the visit counter and return the new value.
    ///
    /// A single upsert statement, so concurrent requests never lose a count.
    pub async fn increment_visits(&mut self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar(
            "INSERT INTO visits (id, count) VALUES (1, 1) ON CONFLICT(id) DO UPDATE SET count = count + 1 RETURNING count",
        )
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(count)
    }
}

// Helper functions for row conversion

/// Sorts alongside SQLite's `CURRENT_TIMESTAMP` format.
fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn post_from_row(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        image_url: row.get("image_url"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

fn recipe_from_row(row: &sqlx::sqlite::SqliteRow) -> Recipe {
    Recipe {
        id: row.get("id"),
        title: row.get("title"),
        ingredients: row.get("ingredients"),
        cook_time: row.get("cook_time"),
        created_at: row.get("created_at"),
    }
}
