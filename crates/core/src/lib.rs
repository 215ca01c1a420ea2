pub mod classify;
pub mod error;
pub mod model;
pub mod render;
pub mod scan;
pub mod top_k;

pub use classify::{default_rules, CategoryRule, Classifier};
pub use error::AuditError;
pub use model::{
    Category, CategoryTally, ExtensionUsage, Report, ScanMetrics, SkippedEntry, TopEntry,
    REPORT_VERSION,
};
pub use render::{human_bytes, render_console_summary, write_csv_report, write_json_report};
pub use scan::{run_scan, ScanOptions};
pub use top_k::TopFileTracker;
