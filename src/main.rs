use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod correlation;
mod error;
mod ingest;
mod models;
mod projection;
mod report;
mod stats;
mod table;

use crate::report::Dashboard;
use crate::table::{SortColumn, SortDirection};

const CSV_ENV: &str = "SKILLS_DASHBOARD_CSV";
const DEFAULT_CSV: &str = "student_cognitive_skills_persona.csv";

#[derive(Parser)]
#[command(name = "skills-dashboard")]
#[command(about = "Cognitive skills and student performance dashboard", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Student CSV (falls back to $SKILLS_DASHBOARD_CSV)
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Source {
    fn resolve(&self) -> PathBuf {
        resolve_csv_path(self.csv.clone(), std::env::var(CSV_ENV).ok())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print metric averages and the key insight
    Summary {
        #[command(flatten)]
        source: Source,
    },
    /// Print the bar, scatter and radar chart series
    Charts {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        student: Option<String>,
    },
    /// Search and sort the student table
    Table {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        sort: Option<SortColumn>,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        student: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Export every widget's data as JSON
    Export {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        student: Option<String>,
        #[arg(long, default_value = "dashboard.json")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Commands::Summary { source } => {
            let students = ingest::load_students(&source.resolve())?;
            match stats::compute_averages(&students) {
                Ok(averages) => {
                    println!("Average scores across {} students:", students.len());
                    for (metric, value) in averages.iter() {
                        println!("- {}: {:.2}", metric.label(), value);
                    }
                }
                Err(err) => println!("No averages: {err}."),
            }
            println!();
            println!(
                "{}",
                report::insight_or_fallback(correlation::compute_insight(&students))
            );
        }
        Commands::Charts { source, student } => {
            let students = ingest::load_students(&source.resolve())?;
            let dashboard = Dashboard::build(&students, student.as_deref());

            println!("Bar: skill averages");
            for (metric, value) in dashboard.bar.labels.iter().zip(&dashboard.bar.values) {
                println!("- {}: {:.2}", metric, value);
            }
            println!("Scatter: attention vs assessment score");
            for point in dashboard.scatter.iter() {
                println!("- ({:.2}, {:.2})", point.x, point.y);
            }
            match dashboard.selected_student {
                Some(selected) => {
                    println!("Radar: {} ({})", selected.name, selected.student_id);
                    for (metric, value) in
                        dashboard.radar.labels.iter().zip(&dashboard.radar.values)
                    {
                        println!("- {}: {:.2}", metric, value);
                    }
                }
                None => println!("Radar: no student selected."),
            }
        }
        Commands::Table {
            source,
            search,
            sort,
            desc,
            limit,
        } => {
            let students = ingest::load_students(&source.resolve())?;
            let mut rows = table::filter_students(&students, &search);
            if let Some(column) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                table::sort_students(&mut rows, column, direction);
            }
            if let Some(limit) = limit {
                rows.truncate(limit);
            }
            print!(
                "{}",
                table::render_table(&rows, !search.trim().is_empty())
            );
        }
        Commands::Report {
            source,
            student,
            out,
        } => {
            let csv_path = source.resolve();
            let students = ingest::load_students(&csv_path)?;
            let dashboard = Dashboard::build(&students, student.as_deref());
            let report = report::build_report(
                &dashboard,
                &csv_path.display().to_string(),
                chrono::Utc::now(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            source,
            student,
            out,
        } => {
            let students = ingest::load_students(&source.resolve())?;
            let dashboard = Dashboard::build(&students, student.as_deref());
            let json = serde_json::to_string_pretty(&dashboard)?;
            std::fs::write(&out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dashboard data written to {}.", out.display());
        }
    }

    Ok(())
}

/// Flag wins over the environment, which wins over the default file name.
fn resolve_csv_path(flag: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    flag.or_else(|| {
        env_value
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV))
}
