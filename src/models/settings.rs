//! Site display settings.
//!
//! Settings are a flat key/value mapping. Six keys are canonical and always
//! present on read: stored values win, missing ones fall back to defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical setting keys with their defaults.
pub const DEFAULT_SETTINGS: [(&str, &str); 6] = [
    ("site_name", "My Blog"),
    ("site_tagline", "Stories, notes and recipes"),
    ("hero_label", "Welcome"),
    ("hero_title", "Latest from the kitchen and the desk"),
    ("hero_subtitle", "Fresh posts and recipes, straight from the admin."),
    ("footer_text", "Thanks for stopping by."),
];

/// Resolved settings mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteSettings(BTreeMap<String, String>);

impl SiteSettings {
    /// Merge stored rows with the canonical defaults.
    pub fn from_stored(stored: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut values: BTreeMap<String, String> = stored.into_iter().collect();
        for (key, default) in DEFAULT_SETTINGS {
            values
                .entry(key.to_string())
                .or_insert_with(|| default.to_string());
        }
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self::from_stored(std::iter::empty())
    }
}

/// Full batch of canonical settings as submitted by the admin form.
///
/// Fields absent from the form are written as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsInput {
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub site_tagline: String,
    #[serde(default)]
    pub hero_label: String,
    #[serde(default)]
    pub hero_title: String,
    #[serde(default)]
    pub hero_subtitle: String,
    #[serde(default)]
    pub footer_text: String,
}

impl SettingsInput {
    /// Key/value pairs in canonical order.
    pub fn pairs(&self) -> [(&'static str, &str); 6] {
        [
            ("site_name", &self.site_name),
            ("site_tagline", &self.site_tagline),
            ("hero_label", &self.hero_label),
            ("hero_title", &self.hero_title),
            ("hero_subtitle", &self.hero_subtitle),
            ("footer_text", &self.footer_text),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_count(settings: &SiteSettings) -> usize {
        serde_json::to_value(settings).unwrap().as_object().unwrap().len()
    }

    #[test]
    fn test_defaults_fill_every_key() {
        let settings = SiteSettings::default();
        assert_eq!(key_count(&settings), 6);
        for (key, default) in DEFAULT_SETTINGS {
            assert_eq!(settings.get(key), Some(default));
        }
    }

    #[test]
    fn test_stored_values_win_and_extras_kept() {
        let settings = SiteSettings::from_stored(vec![
            ("site_name".to_string(), "Acme".to_string()),
            ("hero_label".to_string(), String::new()),
            ("theme".to_string(), "dark".to_string()),
        ]);
        assert_eq!(settings.get("site_name"), Some("Acme"));
        assert_eq!(settings.get("hero_label"), Some(""));
        assert_eq!(settings.get("theme"), Some("dark"));
        assert_eq!(settings.get("footer_text"), Some("Thanks for stopping by."));
        assert_eq!(key_count(&settings), 7);
    }

    #[test]
    fn test_input_pairs_cover_canonical_keys() {
        let input = SettingsInput::default();
        let keys: Vec<&str> = input.pairs().iter().map(|(k, _)| *k).collect();
        let canonical: Vec<&str> = DEFAULT_SETTINGS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, canonical);
    }
}
