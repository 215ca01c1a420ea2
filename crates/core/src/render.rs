use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{Category, Report};

const CONSOLE_EXTENSION_ROWS: usize = 20;

/// Plain-text summary: totals, per-category sizes in fixed order, the top
/// largest files, and the biggest extensions.
pub fn render_console_summary(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Scanned: {}  |  Total: {}  |  Generated at: {}\n",
        report.root,
        human_bytes(report.metrics.total_bytes),
        report.generated_at
    ));

    out.push_str("\n== Size by category ==\n");
    for category in Category::ALL {
        out.push_str(&format!(
            "{:>12}: {} ({} file(s))\n",
            category.label(),
            human_bytes(report.category_bytes.get(category)),
            report.category_files.get(category)
        ));
    }

    out.push_str("\n== Top largest files ==\n");
    if report.top_files.is_empty() {
        out.push_str("(none)\n");
    } else {
        for entry in &report.top_files {
            out.push_str(&format!(
                "{:>10}  {}\n",
                human_bytes(entry.size_bytes),
                entry.path
            ));
        }
    }

    out.push_str("\n== Top extensions by space ==\n");
    for usage in report.extensions.iter().take(CONSOLE_EXTENSION_ROWS) {
        let label = if usage.extension.is_empty() {
            "(no ext)"
        } else {
            usage.extension.as_str()
        };
        out.push_str(&format!(
            "{:>10}  {} ({} file(s))\n",
            human_bytes(usage.bytes),
            label,
            usage.files
        ));
    }

    if !report.errors.is_empty() {
        out.push_str(&format!(
            "\n{} entr(ies) skipped; see the report errors for details.\n",
            report.errors.len()
        ));
    }

    out
}

/// Serialize the report verbatim as pretty-printed JSON.
pub fn write_json_report(report: &Report, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let payload = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    fs::write(path, payload)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

/// One row per top entry, then one summary row per category.
pub fn write_csv_report(report: &Report, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create csv report at {}", path.display()))?;

    writer
        .write_record(["path", "size_bytes", "size_human"])
        .context("failed to write csv header")?;
    for entry in &report.top_files {
        writer
            .write_record([
                entry.path.clone(),
                entry.size_bytes.to_string(),
                human_bytes(entry.size_bytes),
            ])
            .with_context(|| format!("failed to write csv row for {}", entry.path))?;
    }
    for category in Category::ALL {
        let bytes = report.category_bytes.get(category);
        writer
            .write_record([
                format!("category:{}", category.label()),
                bytes.to_string(),
                human_bytes(bytes),
            ])
            .with_context(|| format!("failed to write csv row for {}", category.label()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush csv report at {}", path.display()))?;
    Ok(())
}

pub fn human_bytes(value: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if value == 0 {
        return "0 B".to_string();
    }
    let mut size = value as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{human_bytes, render_console_summary, write_csv_report, write_json_report};
    use crate::model::{
        Category, CategoryTally, ExtensionUsage, Report, ScanMetrics, SkippedEntry, TopEntry,
        REPORT_VERSION,
    };

    fn sample_report() -> Report {
        let mut category_bytes = CategoryTally::default();
        category_bytes.add(Category::Proxy, 1000);
        category_bytes.add(Category::RenderCache, 2000);
        category_bytes.add(Category::Other, 10);
        let mut category_files = CategoryTally::default();
        category_files.add(Category::Proxy, 1);
        category_files.add(Category::RenderCache, 1);
        category_files.add(Category::Other, 1);

        Report {
            report_version: REPORT_VERSION.to_string(),
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            root: "/media/projects".to_string(),
            top_limit: 2,
            metrics: ScanMetrics {
                elapsed_ms: 12,
                file_count: 3,
                directory_count: 3,
                total_bytes: 3010,
                cancelled: false,
            },
            category_bytes,
            category_files,
            extensions: vec![
                ExtensionUsage {
                    extension: ".tmp".to_string(),
                    files: 1,
                    bytes: 2000,
                },
                ExtensionUsage {
                    extension: ".mov".to_string(),
                    files: 1,
                    bytes: 1000,
                },
                ExtensionUsage {
                    extension: String::new(),
                    files: 1,
                    bytes: 10,
                },
            ],
            top_files: vec![
                TopEntry {
                    size_bytes: 2000,
                    path: "/media/projects/RenderCache/c.tmp".to_string(),
                },
                TopEntry {
                    size_bytes: 1000,
                    path: "/media/projects/ProxyMedia/a.mov".to_string(),
                },
            ],
            errors: vec![SkippedEntry {
                path: "/media/projects/locked".to_string(),
                reason: "permission denied".to_string(),
            }],
        }
    }

    #[test]
    fn human_bytes_formats_units() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(512), "512.0 B");
        assert_eq!(human_bytes(2048), "2.0 KB");
        assert_eq!(human_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn console_summary_lists_categories_in_fixed_order() {
        let summary = render_console_summary(&sample_report());
        let proxy = summary.find("proxy:").expect("proxy line");
        let cache = summary.find("render_cache:").expect("render_cache line");
        let other = summary.find("other:").expect("other line");
        assert!(proxy < cache && cache < other);
        assert!(summary.contains("2.0 KB"));
        assert!(summary.contains("(no ext)"));
        assert!(summary.contains("1 entr(ies) skipped"));
    }

    #[test]
    fn json_report_round_trips() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("report.json");
        let report = sample_report();

        write_json_report(&report, &path).expect("write json");
        let raw = fs::read_to_string(&path).expect("read json");
        let parsed: Report = serde_json::from_str(&raw).expect("parse json");
        assert_eq!(parsed, report);
    }

    #[test]
    fn csv_report_has_top_rows_then_category_rows() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("report.csv");
        let report = sample_report();

        write_csv_report(&report, &path).expect("write csv");
        let raw = fs::read_to_string(&path).expect("read csv");
        let lines = raw.lines().collect::<Vec<_>>();

        // header + 2 top entries + 6 category rows
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "path,size_bytes,size_human");
        assert!(lines[1].contains("c.tmp"));
        assert!(lines[3].starts_with("category:proxy,1000"));
        assert!(lines[8].starts_with("category:other,10"));
    }
}
