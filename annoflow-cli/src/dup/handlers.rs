use anyhow::Result;
use clap::ArgMatches;
use log::info;

use annoflow_streams::DuplicatingStage;

use super::cli::{DEST_TYPE_ARG, SOURCE_TYPE_ARG};
use crate::common::{OUTPUT_ARG, open_assembly_from_matches, required_str, write_stream};

pub fn run_dup(matches: &ArgMatches) -> Result<()> {
    let source_type = required_str(matches, SOURCE_TYPE_ARG)?;
    let dest_type = required_str(matches, DEST_TYPE_ARG)?;
    let output = required_str(matches, OUTPUT_ARG)?;

    let assembly = open_assembly_from_matches(matches)?;
    let mut stage = DuplicatingStage::new(assembly, source_type, dest_type)?;
    let trees = write_stream(&mut stage, output)?;

    info!("Duplicated {} as {} across {} trees", source_type, dest_type, trees);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_parser;
    use crate::common::test_utils::{get_test_path, read_types};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_dup_writes_copies_after_originals() {
        let tempdir = tempfile::tempdir().unwrap();
        let out = tempdir.path().join("dup.gff3");
        let input = get_test_path("genes.gff3");

        let matches = build_parser().get_matches_from([
            "annoflow",
            "dup",
            input.to_str().unwrap(),
            "-s",
            "CDS",
            "-d",
            "coding_region",
            "-o",
            out.to_str().unwrap(),
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        run_dup(sub).unwrap();

        let types = read_types(&out);
        assert_eq!(types.iter().filter(|t| *t == "coding_region").count(), 2);
        let first = types.iter().position(|t| t == "CDS").unwrap();
        assert_eq!(types[first + 1], "coding_region");
    }

    #[rstest]
    fn test_dup_reports_duplicate_ids() {
        let tempdir = tempfile::tempdir().unwrap();
        let out = tempdir.path().join("dup.gff3");
        let input = get_test_path("duplicate_id.gff3");

        let matches = build_parser().get_matches_from([
            "annoflow",
            "dup",
            input.to_str().unwrap(),
            "-s",
            "gene",
            "-d",
            "locus",
            "-o",
            out.to_str().unwrap(),
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let err = run_dup(sub).unwrap_err();
        assert!(err.to_string().contains("g1"));
    }
}
