use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use log::debug;
use std::path::{Path, PathBuf};

use domaincov::{analyze_file, render, validate_threshold, Config};

const CONFIG_FILE: &str = "domaincov.toml";

#[derive(Parser)]
#[command(name = "domaincov")]
#[command(about = "Split Cobertura line coverage into domain logic and presentation code")]
#[command(version)]
struct Cli {
    /// Cobertura XML report (e.g. coverage.cobertura.xml)
    report: Option<String>,

    /// Path to config file (default: domaincov.toml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of least covered domain units to list
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Fail when domain coverage is below this percentage
    #[arg(long, value_name = "PERCENT")]
    fail_under_domain: Option<f64>,

    /// Fail when adjusted coverage is below this percentage
    #[arg(long, value_name = "PERCENT")]
    fail_under_adjusted: Option<f64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let Some(report) = cli.report.as_deref() else {
        println!("{}", Cli::command().render_usage());
        std::process::exit(1);
    };

    match run(&cli, report) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every configured threshold passed
fn run(cli: &Cli, report: &str) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(top) = cli.top {
        config.report.top = top;
    }
    if cli.fail_under_domain.is_some() {
        config.thresholds.domain = cli.fail_under_domain;
    }
    if cli.fail_under_adjusted.is_some() {
        config.thresholds.adjusted = cli.fail_under_adjusted;
    }
    config.validate()?;

    let report_path = expand(report);
    let analysis = analyze_file(&report_path, &config.markers)?;

    // The report is fully parsed before anything is printed
    print!("{}", render(&analysis, &config.markers, config.report.top));

    let result = validate_threshold(
        &analysis,
        config.thresholds.domain,
        config.thresholds.adjusted,
    );
    if !result.gates.is_empty() {
        println!("\n{}", "Thresholds:".bold());
        result.print_summary();
    }

    Ok(result.passed)
}

fn load_config(explicit: Option<&str>) -> Result<Config> {
    if let Some(path) = explicit {
        let path = expand(path);
        debug!("Loading config from {}", path.display());
        return Config::load(&path);
    }

    let default_path = Path::new(CONFIG_FILE);
    if default_path.is_file() {
        debug!("Loading config from {}", default_path.display());
        return Config::load(default_path);
    }

    debug!("No {} found, using built-in markers", CONFIG_FILE);
    Ok(Config::default())
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = Builder::new();
    builder.filter_level(level).format(|buf, record| {
        writeln!(
            buf,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}
