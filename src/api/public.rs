//! Public pages: feed, single post, recipes, maintenance.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use minijinja::context;
use serde::Serialize;

use super::redirect;
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Recipe, SiteSettings};
use crate::AppState;

/// Recipe with its ingredient blob split for display.
#[derive(Debug, Serialize)]
struct RecipeView {
    #[serde(flatten)]
    recipe: Recipe,
    ingredient_items: Vec<String>,
}

impl From<Recipe> for RecipeView {
    fn from(recipe: Recipe) -> Self {
        let ingredient_items = recipe.ingredient_items();
        Self {
            recipe,
            ingredient_items,
        }
    }
}

/// GET / - Send visitors to the feed.
pub async fn index(State(state): State<AppState>) -> Response {
    redirect(&state, "/feed")
}

/// GET /feed, /home - Count the visit and list posts.
pub async fn feed(
    State(state): State<AppState>,
    mut repo: Repository,
) -> Result<Response, AppError> {
    let visit_count = repo.increment_visits().await?;
    let posts = repo.list_posts().await?;
    let settings = repo.get_settings().await?;

    let page = state.views.render(
        "feed.html",
        context! { posts, settings, visit_count },
    )?;
    Ok(page.into_response())
}

/// GET /post/{id} - Show one post, or go home if it does not exist.
pub async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut repo: Repository,
) -> Result<Response, AppError> {
    let Some(post) = repo.get_post(id).await? else {
        return Ok(redirect(&state, "/"));
    };
    let settings = repo.get_settings().await?;

    let page = state.views.render("post.html", context! { post, settings })?;
    Ok(page.into_response())
}

/// GET /recipes - List recipes.
pub async fn list_recipes(
    State(state): State<AppState>,
    mut repo: Repository,
) -> Result<Response, AppError> {
    let recipes: Vec<RecipeView> = repo
        .list_recipes()
        .await?
        .into_iter()
        .map(RecipeView::from)
        .collect();
    let settings = repo.get_settings().await?;

    let page = state
        .views
        .render("recipes.html", context! { recipes, settings })?;
    Ok(page.into_response())
}

/// GET /maintenance, /maintance - Static maintenance notice.
///
/// Renders with the default settings so it works while storage is down.
pub async fn maintenance(State(state): State<AppState>) -> Result<Response, AppError> {
    let settings = SiteSettings::default();
    let page = state.views.render("maintenance.html", context! { settings })?;
    Ok(page.into_response())
}
