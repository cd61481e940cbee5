use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use log::info;

use annoflow_core::traits::TypeChecker;
use annoflow_streams::{
    DuplicatingStage, InterleavingStage, NodeStream, StatStage, TypeCheckStage,
};

use super::cli::{CONFIG_ARG, OUTPUT_OVERRIDE_ARG};
use super::config::{PipelineConfig, StageConfig};
use crate::check::handlers::load_checker;
use crate::common::{open_assembly, required_str, write_stream};

///
/// Wrap the assembly stage in every configured stage, innermost first.
///
pub fn build_chain<'a>(
    config: &PipelineConfig,
    checker: &'a dyn TypeChecker,
) -> Result<Box<dyn NodeStream + 'a>> {
    let mut chain: Box<dyn NodeStream + 'a> =
        Box::new(open_assembly(&config.input, config.drop_pseudo_parents)?);

    for stage in &config.stages {
        chain = match stage {
            StageConfig::Duplicate {
                source_type,
                dest_type,
            } => Box::new(DuplicatingStage::new(chain, source_type, dest_type)?),
            StageConfig::Interleave {
                outside_type,
                inter_type,
            } => Box::new(InterleavingStage::new(chain, outside_type, inter_type)?),
            StageConfig::Typecheck => Box::new(TypeCheckStage::new(chain, checker)),
            StageConfig::Stat => Box::new(StatStage::new(chain)),
        };
    }
    Ok(chain)
}

pub fn run_pipeline_config(config: &PipelineConfig) -> Result<usize> {
    let checker = load_checker(config.ontology.as_ref())?;
    let mut chain = build_chain(config, checker.as_ref())?;
    let trees = write_stream(&mut chain, &config.output)?;
    info!("Pipeline wrote {} trees to {}", trees, config.output);
    Ok(trees)
}

pub fn run_pipeline(matches: &ArgMatches) -> Result<()> {
    let mut config = PipelineConfig::from_path(Path::new(required_str(matches, CONFIG_ARG)?))?;
    if let Some(output) = matches.get_one::<String>(OUTPUT_OVERRIDE_ARG) {
        config.output = output.clone();
    }
    run_pipeline_config(&config)?;
    Ok(())
}
