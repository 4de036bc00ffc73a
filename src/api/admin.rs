//! Admin dashboard and content mutations.
//!
//! Every handler here sits behind [`crate::auth::require_admin`].

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;

use super::{lenient, redirect};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{PostInput, RecipeInput, SettingsInput};
use crate::AppState;

/// Body of the dashboard form; `form_type` picks which fields matter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminForm {
    pub form_type: String,
    pub title: String,
    pub image_url: String,
    pub content: String,
    pub ingredients: String,
    pub cook_time: String,
    pub site_name: String,
    pub site_tagline: String,
    pub hero_label: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub footer_text: String,
}

impl AdminForm {
    fn post_input(self) -> PostInput {
        PostInput {
            title: self.title,
            image_url: self.image_url,
            content: self.content,
        }
    }

    fn recipe_input(self) -> RecipeInput {
        RecipeInput {
            title: self.title,
            ingredients: self.ingredients,
            cook_time: self.cook_time,
        }
    }

    fn settings_input(self) -> SettingsInput {
        SettingsInput {
            site_name: self.site_name,
            site_tagline: self.site_tagline,
            hero_label: self.hero_label,
            hero_title: self.hero_title,
            hero_subtitle: self.hero_subtitle,
            footer_text: self.footer_text,
        }
    }
}

/// GET /admin - Dashboard with posts, recipes and settings.
pub async fn dashboard(
    State(state): State<AppState>,
    mut repo: Repository,
) -> Result<Response, AppError> {
    let posts = repo.list_posts().await?;
    let recipes = repo.list_recipes().await?;
    let settings = repo.get_settings().await?;

    let page = state
        .views
        .render("admin.html", context! { posts, recipes, settings })?;
    Ok(page.into_response())
}

/// POST /admin - Create a post or recipe, or replace the site settings.
pub async fn submit(
    State(state): State<AppState>,
    mut repo: Repository,
    Form(mut form): Form<AdminForm>,
) -> Result<Response, AppError> {
    let form_type = std::mem::take(&mut form.form_type);
    match form_type.as_str() {
        "recipe" => {
            let result = repo.create_recipe(&form.recipe_input()).await;
            if let Some(recipe) = lenient("create recipe", result)? {
                tracing::info!("Created recipe {}", recipe.id);
            }
        }
        "settings" => {
            repo.replace_settings(&form.settings_input()).await?;
            tracing::info!("Replaced site settings");
        }
        _ => {
            let result = repo.create_post(&form.post_input()).await;
            if let Some(post) = lenient("create post", result)? {
                tracing::info!("Created post {}", post.id);
            }
        }
    }

    Ok(redirect(&state, "/admin"))
}

/// GET /admin/edit/{id} - Edit form for one post.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut repo: Repository,
) -> Result<Response, AppError> {
    let Some(post) = repo.get_post(id).await? else {
        return Ok(redirect(&state, "/admin"));
    };
    let settings = repo.get_settings().await?;

    let page = state
        .views
        .render("admin_edit.html", context! { post, settings })?;
    Ok(page.into_response())
}

/// POST /admin/edit/{id} - Overwrite a post.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut repo: Repository,
    Form(input): Form<PostInput>,
) -> Result<Response, AppError> {
    let result = repo.update_post(id, &input).await;
    if lenient("update post", result)?.is_some() {
        tracing::info!("Updated post {}", id);
    }

    Ok(redirect(&state, "/admin"))
}

/// POST /admin/delete/{id} - Delete a post.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut repo: Repository,
) -> Result<Response, AppError> {
    if repo.delete_post(id).await? {
        tracing::info!("Deleted post {}", id);
    }
    Ok(redirect(&state, "/admin"))
}

/// POST /admin/delete-recipe/{id} - Delete a recipe.
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut repo: Repository,
) -> Result<Response, AppError> {
    if repo.delete_recipe(id).await? {
        tracing::info!("Deleted recipe {}", id);
    }
    Ok(redirect(&state, "/admin"))
}
