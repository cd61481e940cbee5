use clap::{Arg, Command};

use crate::common::{drop_pseudo_arg, input_arg, output_arg};

pub const INTER_CMD: &str = "inter";
pub const OUTSIDE_TYPE_ARG: &str = "outside-type";
pub const INTER_TYPE_ARG: &str = "inter-type";

pub fn create_inter_cli() -> Command {
    Command::new(INTER_CMD)
        .about("Insert features covering the gaps between consecutive features of one type.")
        .arg(input_arg())
        .arg(
            Arg::new(OUTSIDE_TYPE_ARG)
                .short('t')
                .long(OUTSIDE_TYPE_ARG)
                .required(true)
                .help("Type of the features whose gaps are filled, e.g. gene or exon"),
        )
        .arg(
            Arg::new(INTER_TYPE_ARG)
                .short('i')
                .long(INTER_TYPE_ARG)
                .required(true)
                .help("Type of the inserted gap features, e.g. intergenic_region or intron"),
        )
        .arg(output_arg())
        .arg(drop_pseudo_arg())
}
