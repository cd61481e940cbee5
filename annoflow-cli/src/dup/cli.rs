use clap::{Arg, Command};

use crate::common::{drop_pseudo_arg, input_arg, output_arg};

pub const DUP_CMD: &str = "dup";
pub const SOURCE_TYPE_ARG: &str = "source-type";
pub const DEST_TYPE_ARG: &str = "dest-type";

pub fn create_dup_cli() -> Command {
    Command::new(DUP_CMD)
        .about("Duplicate every feature of one type as a feature of another type.")
        .arg(input_arg())
        .arg(
            Arg::new(SOURCE_TYPE_ARG)
                .short('s')
                .long(SOURCE_TYPE_ARG)
                .required(true)
                .help("Type of the features to duplicate"),
        )
        .arg(
            Arg::new(DEST_TYPE_ARG)
                .short('d')
                .long(DEST_TYPE_ARG)
                .required(true)
                .help("Type given to the copies"),
        )
        .arg(output_arg())
        .arg(drop_pseudo_arg())
}
