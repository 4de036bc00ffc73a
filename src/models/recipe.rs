//! Recipe model and form input.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A published recipe. Recipes are created and deleted, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    /// Free-form list, one ingredient per line or comma-separated
    pub ingredients: String,
    pub cook_time: String,
    pub created_at: String,
}

impl Recipe {
    /// Split the ingredient blob into display items.
    pub fn ingredient_items(&self) -> Vec<String> {
        self.ingredients
            .split(['\n', ','])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Raw recipe fields as submitted by the admin form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub cook_time: String,
}

/// Recipe fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: String,
    pub cook_time: String,
}

impl RecipeInput {
    /// Trim all fields and require every one of them.
    pub fn validate(&self) -> Result<NewRecipe, AppError> {
        let title = self.title.trim();
        let ingredients = self.ingredients.trim();
        let cook_time = self.cook_time.trim();

        if title.is_empty() || ingredients.is_empty() || cook_time.is_empty() {
            return Err(AppError::Validation(
                "Recipe title, ingredients and cook time are required".to_string(),
            ));
        }

        Ok(NewRecipe {
            title: title.to_string(),
            ingredients: ingredients.to_string(),
            cook_time: cook_time.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_all_fields() {
        let missing_time = RecipeInput {
            title: "Soup".into(),
            ingredients: "water".into(),
            cook_time: " ".into(),
        };
        assert!(missing_time.validate().is_err());

        let ok = RecipeInput {
            title: " Soup ".into(),
            ingredients: "water,salt\n".into(),
            cook_time: "20m".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.title, "Soup");
        assert_eq!(ok.ingredients, "water,salt");
    }

    #[test]
    fn test_ingredient_items_split_on_newlines_and_commas() {
        let recipe = Recipe {
            id: 1,
            title: "Soup".into(),
            ingredients: "water, salt\npepper\n\n, ".into(),
            cook_time: "20m".into(),
            created_at: "2024-01-01 00:00:00".into(),
        };
        assert_eq!(recipe.ingredient_items(), vec!["water", "salt", "pepper"]);
    }
}
