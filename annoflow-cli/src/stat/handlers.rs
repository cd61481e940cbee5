use anyhow::Result;
use clap::ArgMatches;

use annoflow_streams::{NodeStream, StatStage, StreamStats};

use super::cli::JSON_ARG;
use crate::common::open_assembly_from_matches;

pub fn gather_stats(matches: &ArgMatches) -> Result<StreamStats> {
    let mut stage = StatStage::new(open_assembly_from_matches(matches)?);
    while stage.next_tree()?.is_some() {}
    Ok(stage.stats().clone())
}

pub fn run_stat(matches: &ArgMatches) -> Result<()> {
    let stats = gather_stats(matches)?;
    if matches.get_flag(JSON_ARG) {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats);
    }
    Ok(())
}
