use anyhow::Result;
use clap::ArgMatches;
use log::info;

use annoflow_core::traits::TypeChecker;
use annoflow_ontology::{BuiltinTypeChecker, OntologyTypeChecker};
use annoflow_streams::{NodeStream, StatStage, TypeCheckStage};

use super::cli::ONTOLOGY_ARG;
use crate::common::open_assembly_from_matches;

///
/// Load the ontology named on the command line, or fall back to the built-in
/// type list.
///
pub fn load_checker(ontology: Option<&String>) -> Result<Box<dyn TypeChecker>> {
    let checker: Box<dyn TypeChecker> = match ontology {
        Some(path) => Box::new(OntologyTypeChecker::from_obo_path(path)?),
        None => Box::new(BuiltinTypeChecker),
    };
    Ok(checker)
}

pub fn run_check(matches: &ArgMatches) -> Result<()> {
    let checker = load_checker(matches.get_one::<String>(ONTOLOGY_ARG))?;
    info!("Checking types against {}", checker.description());

    let assembly = open_assembly_from_matches(matches)?;
    let mut stage = StatStage::new(TypeCheckStage::new(assembly, checker));
    while stage.next_tree()?.is_some() {}

    let stats = stage.stats();
    println!(
        "OK: {} trees, {} features, {} pseudo-parents",
        stats.trees, stats.features, stats.pseudo_parents
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_parser;
    use crate::common::test_utils::get_test_path;
    use rstest::*;

    fn check(args: &[&str]) -> Result<()> {
        let mut argv = vec!["annoflow", "check"];
        argv.extend_from_slice(args);
        let matches = build_parser().get_matches_from(argv);
        let (_, sub) = matches.subcommand().unwrap();
        run_check(sub)
    }

    fn obo() -> String {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/obo/so_mini.obo")
            .to_string_lossy()
            .into_owned()
    }

    #[rstest]
    #[case("genes.gff3", true)]
    #[case("unknown_type.gff3", false)]
    fn test_check_with_ontology(#[case] file: &str, #[case] passes: bool) {
        let input = get_test_path(file);
        let result = check(&[input.to_str().unwrap(), "--ontology", &obo()]);
        assert_eq!(result.is_ok(), passes);
    }

    #[rstest]
    fn test_check_with_builtin_types() {
        let input = get_test_path("genes.gff3");
        assert!(check(&[input.to_str().unwrap()]).is_ok());
    }

    #[rstest]
    fn test_check_reports_cycles() {
        let input = get_test_path("cycle.gff3");
        let err = check(&[input.to_str().unwrap()]).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[rstest]
    fn test_missing_ontology_file() {
        let input = get_test_path("genes.gff3");
        assert!(check(&[input.to_str().unwrap(), "--ontology", "no/such/file.obo"]).is_err());
    }
}
