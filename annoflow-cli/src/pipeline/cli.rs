use clap::{Arg, Command};

pub const PIPELINE_CMD: &str = "pipeline";
pub const CONFIG_ARG: &str = "config";
pub const OUTPUT_OVERRIDE_ARG: &str = "output";

pub fn create_pipeline_cli() -> Command {
    Command::new(PIPELINE_CMD)
        .about("Run a chain of stages described in a TOML file.")
        .arg_required_else_help(true)
        .arg(
            Arg::new(CONFIG_ARG)
                .required(true)
                .help("Pipeline config file (TOML)"),
        )
        .arg(
            Arg::new(OUTPUT_OVERRIDE_ARG)
                .short('o')
                .long(OUTPUT_OVERRIDE_ARG)
                .help("Write here instead of the output named in the config"),
        )
}
