use clap::{Arg, Command};

use crate::common::{drop_pseudo_arg, input_arg};

pub const CHECK_CMD: &str = "check";
pub const ONTOLOGY_ARG: &str = "ontology";

pub fn create_check_cli() -> Command {
    Command::new(CHECK_CMD)
        .about("Assemble a GFF3 file and validate every feature type.")
        .long_about(
            "Assemble a GFF3 file and validate every feature type. Without --ontology a built-in \
             list of common sequence ontology types is used.",
        )
        .arg(input_arg())
        .arg(
            Arg::new(ONTOLOGY_ARG)
                .long(ONTOLOGY_ARG)
                .help("OBO file (optionally gzip'd) defining the valid feature types"),
        )
        .arg(drop_pseudo_arg())
}
