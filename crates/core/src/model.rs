use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub const REPORT_VERSION: &str = "1.0.0";

/// The fixed set of buckets files are grouped into. `Other` is never matched
/// by a rule; it is the fallback when no rule applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Proxy,
    Optimized,
    RenderCache,
    Stills,
    Backups,
    Other,
}

impl Category {
    /// Rendering order for summaries and CSV rows.
    pub const ALL: [Category; 6] = [
        Category::Proxy,
        Category::Optimized,
        Category::RenderCache,
        Category::Stills,
        Category::Backups,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Proxy => "proxy",
            Category::Optimized => "optimized",
            Category::RenderCache => "render_cache",
            Category::Stills => "stills",
            Category::Backups => "backups",
            Category::Other => "other",
        }
    }
}

/// One counter per category. All six keys are always present in the report,
/// zero-valued when nothing matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTally {
    pub proxy: u64,
    pub optimized: u64,
    pub render_cache: u64,
    pub stills: u64,
    pub backups: u64,
    pub other: u64,
}

impl CategoryTally {
    pub fn add(&mut self, category: Category, amount: u64) {
        let slot = self.slot_mut(category);
        *slot = slot.saturating_add(amount);
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Proxy => self.proxy,
            Category::Optimized => self.optimized,
            Category::RenderCache => self.render_cache,
            Category::Stills => self.stills,
            Category::Backups => self.backups,
            Category::Other => self.other,
        }
    }

    pub fn sum(&self) -> u64 {
        Category::ALL
            .iter()
            .fold(0_u64, |acc, category| acc.saturating_add(self.get(*category)))
    }

    fn slot_mut(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Proxy => &mut self.proxy,
            Category::Optimized => &mut self.optimized,
            Category::RenderCache => &mut self.render_cache,
            Category::Stills => &mut self.stills,
            Category::Backups => &mut self.backups,
            Category::Other => &mut self.other,
        }
    }
}

/// Per-extension usage. `extension` is lowercase with the leading dot, or the
/// empty string for files without one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtensionUsage {
    pub extension: String,
    pub files: u64,
    pub bytes: u64,
}

/// One of the largest files seen during a scan.
///
/// Ordering ranks a bigger file higher; at equal size the lexicographically
/// smaller path ranks higher, so eviction and snapshots stay deterministic
/// across runs and platforms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopEntry {
    pub size_bytes: u64,
    pub path: String,
}

impl Ord for TopEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size_bytes
            .cmp(&other.size_bytes)
            .then_with(|| other.path.cmp(&self.path))
    }
}

impl PartialOrd for TopEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A path that could not be fully visited. Non-fatal: the scan keeps going.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanMetrics {
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub directory_count: u64,
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default)]
    pub cancelled: bool,
}

/// Immutable result of one scan, consumed by the console/JSON/CSV renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub report_version: String,
    pub generated_at: String,
    pub root: String,
    pub top_limit: usize,
    pub metrics: ScanMetrics,
    pub category_bytes: CategoryTally,
    pub category_files: CategoryTally,
    pub extensions: Vec<ExtensionUsage>,
    pub top_files: Vec<TopEntry>,
    pub errors: Vec<SkippedEntry>,
}
