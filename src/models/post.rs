//! Blog post model and form input.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A published blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub content: String,
    pub created_at: String,
}

/// Raw post fields as submitted by the admin form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub content: String,
}

/// Post fields that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub image_url: Option<String>,
    pub content: String,
}

impl PostInput {
    /// Trim all fields and require a title and content.
    ///
    /// A blank image URL is treated as absent.
    pub fn validate(&self) -> Result<NewPost, AppError> {
        let title = self.title.trim();
        let content = self.content.trim();
        let image_url = self.image_url.trim();

        if title.is_empty() {
            return Err(AppError::Validation("Post title is required".to_string()));
        }
        if content.is_empty() {
            return Err(AppError::Validation("Post content is required".to_string()));
        }

        Ok(NewPost {
            title: title.to_string(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, content: &str, image_url: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            image_url: image_url.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let post = input("  Hello ", "\n World \t", " https://img/x.png ")
            .validate()
            .unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert_eq!(post.image_url.as_deref(), Some("https://img/x.png"));
    }

    #[test]
    fn test_blank_image_url_is_none() {
        let post = input("Hello", "World", "   ").validate().unwrap();
        assert!(post.image_url.is_none());
    }

    #[test]
    fn test_blank_title_or_content_rejected() {
        assert!(matches!(
            input("", "x", "").validate(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            input("x", "   ", "").validate(),
            Err(AppError::Validation(_))
        ));
    }
}
