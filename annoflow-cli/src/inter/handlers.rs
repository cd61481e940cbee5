use anyhow::Result;
use clap::ArgMatches;
use log::info;

use annoflow_streams::InterleavingStage;

use super::cli::{INTER_TYPE_ARG, OUTSIDE_TYPE_ARG};
use crate::common::{OUTPUT_ARG, open_assembly_from_matches, required_str, write_stream};

pub fn run_inter(matches: &ArgMatches) -> Result<()> {
    let outside_type = required_str(matches, OUTSIDE_TYPE_ARG)?;
    let inter_type = required_str(matches, INTER_TYPE_ARG)?;
    let output = required_str(matches, OUTPUT_ARG)?;

    let assembly = open_assembly_from_matches(matches)?;
    let mut stage = InterleavingStage::new(assembly, outside_type, inter_type)?;
    let trees = write_stream(&mut stage, output)?;

    info!("Wrote {} trees with {} features between {} features", trees, inter_type, outside_type);
    Ok(())
}
