use std::path::PathBuf;

use anyhow::Result;
use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use space_audit_core::{
    default_rules, human_bytes, render_console_summary, run_scan, write_csv_report,
    write_json_report, Category, ScanOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "space-audit",
    version,
    about = "Audit editing-suite storage: size up proxies, optimized media, render cache, stills and backups."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan a root folder and print a disk-usage summary.
    Scan(ScanArgs),
    /// Print the active classification rule table.
    Rules,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Root folder to scan (e.g. a projects or media drive).
    root: PathBuf,

    /// How many largest files to keep and list.
    #[arg(long, default_value_t = 30)]
    top: usize,

    /// Maximum traversal depth (root is depth 0).
    #[arg(long)]
    max_depth: Option<usize>,

    /// Exclude glob or substring patterns (repeatable).
    #[arg(long = "exclude", value_name = "PATTERN", num_args = 1.., action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Only print category totals and exit.
    #[arg(long)]
    categories_only: bool,

    /// Optional JSON report output file.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Optional CSV report output file (largest files plus category rows).
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => run_scan_command(args),
        Commands::Rules => {
            run_rules_command();
            Ok(())
        }
    }
}

fn run_scan_command(args: ScanArgs) -> Result<()> {
    let mut options = ScanOptions::new(args.root);
    options.top_files = args.top;
    options.max_depth = args.max_depth;
    options.excludes = args.exclude;

    let report = run_scan(&options)?;

    if args.categories_only {
        println!(
            "Scanned: {}  |  Total: {}",
            report.root,
            human_bytes(report.metrics.total_bytes)
        );
        for category in Category::ALL {
            println!(
                "{:>12}: {}",
                category.label(),
                human_bytes(report.category_bytes.get(category))
            );
        }
        return Ok(());
    }

    print!("{}", render_console_summary(&report));

    if let Some(json_path) = args.json {
        write_json_report(&report, &json_path)?;
        println!("Report written to {}", json_path.display());
    }
    if let Some(csv_path) = args.csv {
        write_csv_report(&report, &csv_path)?;
        println!("CSV written to {}", csv_path.display());
    }

    Ok(())
}

fn run_rules_command() {
    for rule in default_rules() {
        println!("{:>14} -> {}", rule.pattern, rule.category.label());
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
