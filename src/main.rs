use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repomine::config::MineConfig;
use repomine::github::GithubClient;
use repomine::mine;
use repomine::progress::phase;
use repomine::store::{SqliteStore, Store};

const DAYS_PER_YEAR: f64 = 365.2425;

#[derive(Parser)]
#[command(name = "repomine")]
#[command(about = "Mine GitHub organization repository metadata into SQLite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all repository data for one organization and populate the database
    Mine {
        /// SQLite database path (falls back to $DATABASE)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Organization to mine (falls back to $GITHUB_ORGANIZATION)
        #[arg(long)]
        org: Option<String>,

        /// API token (falls back to $GITHUB_API_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Alternate API base URL
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Summaries over a previously mined database
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Repository counts per language, split private/public
    Languages {
        /// SQLite database path (falls back to $DATABASE)
        #[arg(long)]
        database: Option<PathBuf>,

        /// How many languages to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Histogram of repository ages (last push minus initial commit)
    Ages {
        /// SQLite database path (falls back to $DATABASE)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Fortnightly buckets within a single year instead of half-year
        /// buckets over ten years
        #[arg(long)]
        within_year: bool,
    },
}

fn open_store(database: Option<PathBuf>) -> anyhow::Result<SqliteStore> {
    let path = database
        .or_else(|| std::env::var("DATABASE").ok().map(PathBuf::from))
        .ok_or_else(|| anyhow::anyhow!("no database path; pass --database or set DATABASE"))?;

    if !path.exists() {
        bail!(
            "Database not found at {}. Run 'repomine mine' first.",
            path.display()
        );
    }

    SqliteStore::new(&path).map_err(Into::into)
}

fn run_mine(config: &MineConfig) -> anyhow::Result<()> {
    let store = SqliteStore::new(&config.database)?;
    phase("Creating database", || store.initialize())?;

    let client = GithubClient::with_base_url(&config.api_url, config.token.clone())?;
    let data = phase("Fetching data about repos from GitHub", || {
        mine::fetch_org_data(&client, &config.organization)
    })?;

    phase("Populating database", || mine::populate(&store, &data))?;
    Ok(())
}

fn run_report_languages(store: &SqliteStore, top: usize) -> anyhow::Result<()> {
    let mut usage = store.language_repo_counts()?;
    usage.sort_by_key(|u| u.private_repos + u.public_repos);

    println!("{:<24} {:>8} {:>8}", "LANGUAGE", "PRIVATE", "PUBLIC");
    for entry in usage.iter().rev().take(top) {
        println!(
            "{:<24} {:>8} {:>8}",
            entry.name, entry.private_repos, entry.public_repos
        );
    }
    Ok(())
}

fn run_report_ages(store: &SqliteStore, within_year: bool) -> anyhow::Result<()> {
    for (label, private) in [("Public", false), ("Private", true)] {
        let ages = store.repo_ages_days(private)?;
        println!("{label} repos by age:");
        print_age_histogram(&ages, within_year);
        println!();
    }
    Ok(())
}

fn print_age_histogram(ages_days: &[f64], within_year: bool) {
    let (bucket_days, max_days) = if within_year {
        (14.0, DAYS_PER_YEAR)
    } else {
        (DAYS_PER_YEAR / 2.0, 10.0 * DAYS_PER_YEAR)
    };

    let buckets = (max_days / bucket_days).ceil() as usize;
    let mut counts = vec![0usize; buckets];
    for &age in ages_days {
        if (0.0..=max_days).contains(&age) {
            let index = ((age / bucket_days) as usize).min(buckets - 1);
            counts[index] += 1;
        }
    }

    for (index, count) in counts.iter().enumerate() {
        let (lo, hi, unit) = if within_year {
            ((index * 2) as f64, ((index + 1) * 2) as f64, "wk")
        } else {
            (index as f64 * 0.5, (index + 1) as f64 * 0.5, "yr")
        };
        println!(
            "{lo:>5.1}-{hi:<5.1} {unit} | {count:>4} {}",
            "#".repeat((*count).min(60))
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("repomine=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mine {
            database,
            org,
            token,
            api_url,
        } => {
            let config = MineConfig::resolve(database, org, token, api_url)?;
            run_mine(&config)?;
        }
        Commands::Report { command } => match command {
            ReportCommands::Languages { database, top } => {
                let store = open_store(database)?;
                run_report_languages(&store, top)?;
            }
            ReportCommands::Ages {
                database,
                within_year,
            } => {
                let store = open_store(database)?;
                run_report_ages(&store, within_year)?;
            }
        },
    }

    Ok(())
}
