mod check;
mod common;
mod dup;
mod inter;
mod pipeline;
mod stat;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "annoflow";
    pub const VERBOSE_ARG: &str = "verbose";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Streaming assembly and transformation of genome feature annotations.")
        .subcommand_required(true)
        .arg(
            Arg::new(consts::VERBOSE_ARG)
                .short('v')
                .long(consts::VERBOSE_ARG)
                .help("Raise the log level (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(dup::cli::create_dup_cli())
        .subcommand(inter::cli::create_inter_cli())
        .subcommand(check::cli::create_check_cli())
        .subcommand(stat::cli::create_stat_cli())
        .subcommand(pipeline::cli::create_pipeline_cli())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();
    init_logging(matches.get_count(consts::VERBOSE_ARG));

    match matches.subcommand() {
        //
        // DUPLICATE
        //
        Some((dup::cli::DUP_CMD, matches)) => {
            dup::handlers::run_dup(matches)?;
        }

        //
        // INTERLEAVE
        //
        Some((inter::cli::INTER_CMD, matches)) => {
            inter::handlers::run_inter(matches)?;
        }

        //
        // TYPE CHECK
        //
        Some((check::cli::CHECK_CMD, matches)) => {
            check::handlers::run_check(matches)?;
        }

        //
        // STATISTICS
        //
        Some((stat::cli::STAT_CMD, matches)) => {
            stat::handlers::run_stat(matches)?;
        }

        //
        // CONFIGURED PIPELINE
        //
        Some((pipeline::cli::PIPELINE_CMD, matches)) => {
            pipeline::handlers::run_pipeline(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
