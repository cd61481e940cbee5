use std::io::{BufReader, Read, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches};

use annoflow_core::utils::{get_dynamic_reader_w_stdin, get_dynamic_writer_w_stdout};
use annoflow_io::{Gff3Reader, write_header, write_tree};
use annoflow_streams::{AssemblyStage, NodeStream};

pub const INPUT_ARG: &str = "input";
pub const OUTPUT_ARG: &str = "output";
pub const DROP_PSEUDO_ARG: &str = "drop-pseudo-parents";
pub const STDIO: &str = "-";

pub type GffEvents = Gff3Reader<BufReader<Box<dyn Read>>>;

pub fn input_arg() -> Arg {
    Arg::new(INPUT_ARG)
        .help("GFF3 input, gzip'd or not ('-' reads stdin)")
        .default_value(STDIO)
}

pub fn output_arg() -> Arg {
    Arg::new(OUTPUT_ARG)
        .short('o')
        .long(OUTPUT_ARG)
        .help("GFF3 output, gzip'd when ending in .gz ('-' writes stdout)")
        .default_value(STDIO)
}

pub fn drop_pseudo_arg() -> Arg {
    Arg::new(DROP_PSEUDO_ARG)
        .long(DROP_PSEUDO_ARG)
        .help("Emit the children of unresolved parents as separate trees")
        .action(ArgAction::SetTrue)
}

pub fn required_str<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument: {}", id))
}

///
/// Open a GFF3 source and wrap it in an assembly stage.
///
pub fn open_assembly(input: &str, drop_pseudo_parents: bool) -> Result<AssemblyStage<GffEvents>> {
    let reader = get_dynamic_reader_w_stdin(input)?;
    Ok(AssemblyStage::new(Gff3Reader::new(reader)).with_drop_pseudo_parents(drop_pseudo_parents))
}

pub fn open_assembly_from_matches(matches: &ArgMatches) -> Result<AssemblyStage<GffEvents>> {
    open_assembly(
        required_str(matches, INPUT_ARG)?,
        matches.get_flag(DROP_PSEUDO_ARG),
    )
}

///
/// Pull every tree from the stream and write it out as soon as it arrives.
/// Returns the number of trees written.
///
pub fn write_stream<S: NodeStream + ?Sized>(stream: &mut S, output: &str) -> Result<usize> {
    let mut writer = get_dynamic_writer_w_stdout(output)?;
    write_header(&mut writer)?;

    let mut trees = 0;
    while let Some(tree) = stream.next_tree()? {
        write_tree(&mut writer, &tree)?;
        trees += 1;
    }
    writer.flush()?;
    Ok(trees)
}
