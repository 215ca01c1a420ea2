use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::info;
use walkdir::WalkDir;

use crate::classify::{CategoryRule, Classifier};
use crate::error::AuditError;
use crate::model::{
    CategoryTally, ExtensionUsage, Report, ScanMetrics, SkippedEntry, TopEntry, REPORT_VERSION,
};
use crate::render::human_bytes;
use crate::top_k::TopFileTracker;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    /// How many largest files to keep. Zero disables the top list.
    pub top_files: usize,
    pub max_depth: Option<usize>,
    /// Glob or substring patterns; matching entries are pruned from the walk.
    pub excludes: Vec<String>,
    /// Classification rule table. `None` uses the built-in table.
    pub rules: Option<Vec<CategoryRule>>,
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl ScanOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            top_files: 30,
            max_depth: None,
            excludes: Vec::new(),
            rules: None,
            cancel_flag: None,
        }
    }
}

/// Walk the tree once and build the audit report.
///
/// Single streaming pass: per-category and per-extension totals plus the
/// bounded top-K tracker are the only state held across files, so memory use
/// is independent of the number of files visited. Unreadable entries are
/// recorded in `Report.errors` and never abort the walk.
pub fn run_scan(options: &ScanOptions) -> Result<Report, AuditError> {
    let root = options.root.as_path();
    if !root.exists() {
        return Err(AuditError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(AuditError::NotADirectory(root.to_path_buf()));
    }

    let started = Instant::now();
    let mut errors: Vec<SkippedEntry> = Vec::new();
    let excludes = ExcludeMatcher::new(&options.excludes, &mut errors);
    let classifier = match &options.rules {
        Some(rules) => Classifier::new(rules.clone()),
        None => Classifier::with_default_rules(),
    };

    let mut tracker = TopFileTracker::new(options.top_files);
    let mut category_bytes = CategoryTally::default();
    let mut category_files = CategoryTally::default();
    let mut extension_usage: HashMap<String, (u64, u64)> = HashMap::new();
    let mut file_count = 0_u64;
    let mut directory_count = 0_u64;
    let mut total_bytes = 0_u64;
    let mut cancelled = false;

    let mut walker = WalkDir::new(root).follow_links(false);
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }
    let iter = walker
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !excludes.is_excluded(entry.path()));

    for item in iter {
        if is_cancelled(options) {
            cancelled = true;
            errors.push(SkippedEntry {
                path: root.to_string_lossy().to_string(),
                reason: "scan cancelled by caller; report contains partial data".to_string(),
            });
            break;
        }

        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .unwrap_or(root)
                    .to_string_lossy()
                    .to_string();
                errors.push(SkippedEntry {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if entry.file_type().is_dir() {
            directory_count += 1;
            continue;
        }
        if !entry.file_type().is_file() {
            // symlinks and special entries are never counted
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                errors.push(SkippedEntry {
                    path: entry.path().to_string_lossy().to_string(),
                    reason: format!("metadata read failed: {err}"),
                });
                continue;
            }
        };

        let path = entry.path();
        let size_bytes = metadata.len();
        let relative = path.strip_prefix(root).unwrap_or(path);

        let category = classifier.classify(relative);
        category_bytes.add(category, size_bytes);
        category_files.add(category, 1);

        let usage = extension_usage.entry(normalize_extension(path)).or_insert((0, 0));
        usage.0 += 1;
        usage.1 = usage.1.saturating_add(size_bytes);

        file_count += 1;
        total_bytes = total_bytes.saturating_add(size_bytes);
        tracker.offer(TopEntry {
            size_bytes,
            path: path.to_string_lossy().to_string(),
        });
    }

    let report = Report {
        report_version: REPORT_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        root: root.to_string_lossy().to_string(),
        top_limit: options.top_files,
        metrics: ScanMetrics {
            elapsed_ms: started.elapsed().as_millis().try_into().unwrap_or(u64::MAX),
            file_count,
            directory_count,
            total_bytes,
            cancelled,
        },
        category_bytes,
        category_files,
        extensions: finalize_extensions(extension_usage),
        top_files: tracker.into_sorted_entries(),
        errors,
    };

    info!(
        "scan complete: {} file(s), {} under {}",
        report.metrics.file_count,
        human_bytes(report.metrics.total_bytes),
        report.root
    );

    Ok(report)
}

/// `.mov`-style lowercase extension with the leading dot, empty when absent.
fn normalize_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

fn finalize_extensions(map: HashMap<String, (u64, u64)>) -> Vec<ExtensionUsage> {
    let mut extensions = map
        .into_iter()
        .map(|(extension, (files, bytes))| ExtensionUsage {
            extension,
            files,
            bytes,
        })
        .collect::<Vec<_>>();
    extensions.sort_by(|a, b| {
        b.bytes
            .cmp(&a.bytes)
            .then_with(|| a.extension.cmp(&b.extension))
    });
    extensions
}

fn is_cancelled(options: &ScanOptions) -> bool {
    options
        .cancel_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

struct ExcludeMatcher {
    globset: Option<GlobSet>,
    substrings: Vec<String>,
}

impl ExcludeMatcher {
    fn new(patterns: &[String], errors: &mut Vec<SkippedEntry>) -> Self {
        if patterns.is_empty() {
            return Self {
                globset: None,
                substrings: Vec::new(),
            };
        }

        let mut builder = GlobSetBuilder::new();
        let mut substrings = Vec::new();
        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }

            if is_plain_substring_pattern(pattern) {
                substrings.push(pattern.to_lowercase());
                continue;
            }

            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => {
                    errors.push(SkippedEntry {
                        path: pattern.to_string(),
                        reason: format!("invalid exclude glob: {err}; using substring fallback"),
                    });
                    substrings.push(pattern.to_lowercase());
                }
            }
        }

        let globset = match builder.build() {
            Ok(set) => Some(set),
            Err(err) => {
                errors.push(SkippedEntry {
                    path: patterns.join(", "),
                    reason: format!("failed to compile exclude glob set: {err}; glob excludes disabled"),
                });
                None
            }
        };

        Self {
            globset,
            substrings,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if let Some(globset) = &self.globset {
            if globset.is_match(path) {
                return true;
            }
        }

        if self.substrings.is_empty() {
            return false;
        }

        let lowered = path.to_string_lossy().to_lowercase();
        self.substrings
            .iter()
            .any(|pattern| lowered.contains(pattern))
    }
}

fn is_plain_substring_pattern(pattern: &str) -> bool {
    !pattern
        .chars()
        .any(|ch| matches!(ch, '*' | '?' | '[' | ']' | '{' | '}'))
}
