//! Genomic benchmark CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use gbench_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use gbench_cli::commands::{
    Workspace, datasets_table, run_clear_cache, run_distribution, run_download, run_evaluate,
    run_filter_distance, run_genome, run_process, tasks_table,
};
use gbench_cli::logging::{LogConfig, LogFormat, init_logging};
use gbench_cli::summary::{
    distribution_table, metrics_table, print_download, print_filter, print_process_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let workspace = || Workspace::load(cli.registry.as_deref(), cli.cache_root.as_deref());
    match &cli.command {
        Command::Tasks => println!("{}", tasks_table(&workspace()?.registry)),
        Command::Datasets { task } => println!("{}", datasets_table(&workspace()?.registry, task)?),
        Command::Download(args) => print_download(&run_download(&workspace()?, args)?),
        Command::Process(args) => print_process_summary(&run_process(&workspace()?, args)?),
        Command::Evaluate(args) => {
            let report = run_evaluate(args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", metrics_table(&report));
            }
        }
        Command::Distribution(args) => {
            let distribution = run_distribution(args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&distribution)?);
            } else {
                println!("{}", distribution_table(&distribution));
            }
        }
        Command::FilterDistance(args) => print_filter(&run_filter_distance(args)?),
        Command::Genome(args) => {
            let genome = run_genome(&workspace()?, args)?;
            println!("FASTA: {}", genome.fasta.display());
            println!("GTF: {}", genome.gtf.display());
        }
        Command::ClearCache(args) => match run_clear_cache(&workspace()?, args)? {
            Some(path) => println!("Removed {}", path.display()),
            None => println!("Nothing cached"),
        },
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
