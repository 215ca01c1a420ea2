use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::model::Category;

/// One ordered classification rule. The first rule whose pattern appears
/// (case-insensitively) in any path segment decides the category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: Category,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: Category) -> Self {
        Self {
            pattern: pattern.into(),
            category,
        }
    }
}

// Common editing-suite folder names. Substring matching means "cache" also
// covers CacheClip and RenderCache, "backup" covers Project Backups, and
// "gallery" covers GalleryStills.
static DEFAULT_RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        CategoryRule::new("proxymedia", Category::Proxy),
        CategoryRule::new("proxy", Category::Proxy),
        CategoryRule::new("proxies", Category::Proxy),
        CategoryRule::new("optimizedmedia", Category::Optimized),
        CategoryRule::new("optimized", Category::Optimized),
        CategoryRule::new("cache", Category::RenderCache),
        CategoryRule::new("render cache", Category::RenderCache),
        CategoryRule::new("stills", Category::Stills),
        CategoryRule::new("gallery", Category::Stills),
        CategoryRule::new("backup", Category::Backups),
        CategoryRule::new("backups", Category::Backups),
    ]
});

pub fn default_rules() -> Vec<CategoryRule> {
    DEFAULT_RULES.clone()
}

/// Pure path-to-category mapper over an explicit, immutable, ordered rule
/// list. No I/O, no process-global state.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
}

impl Classifier {
    /// Patterns are lowercased once here so `classify` only lowercases the
    /// path under test.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                pattern: rule.pattern.to_lowercase(),
                category: rule.category,
            })
            .collect();
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    /// First-match-wins across the whole segment list: an earlier rule beats a
    /// later one even when the later rule matches a deeper segment. The file
    /// name counts as a segment.
    pub fn classify(&self, path: &Path) -> Category {
        let segments = path
            .components()
            .map(|component| component.as_os_str().to_string_lossy().to_lowercase())
            .collect::<Vec<_>>();
        if segments.is_empty() {
            return Category::Other;
        }

        for rule in &self.rules {
            if segments
                .iter()
                .any(|segment| segment.contains(&rule.pattern))
            {
                return rule.category;
            }
        }
        Category::Other
    }
}
