use clap::{Arg, ArgAction, Command};

use crate::common::{drop_pseudo_arg, input_arg};

pub const STAT_CMD: &str = "stat";
pub const JSON_ARG: &str = "json";

pub fn create_stat_cli() -> Command {
    Command::new(STAT_CMD)
        .about("Print feature tree statistics for a GFF3 file.")
        .arg(input_arg())
        .arg(
            Arg::new(JSON_ARG)
                .long(JSON_ARG)
                .help("Print the statistics as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(drop_pseudo_arg())
}
