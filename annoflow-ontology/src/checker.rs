use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap as HashMap;
use log::info;

use annoflow_core::traits::TypeChecker;
use annoflow_core::utils::get_dynamic_reader;

use crate::errors::OntologyLoadError;
use crate::obo::parse_obo;
use crate::term_graph::TermGraph;

///
/// OntologyTypeChecker struct, answers type queries against a loaded term
/// graph.
///
/// Type names resolve by term ID or by term name, so both `SO:0000234` and
/// `mRNA` are accepted. The is-a closure of every term is computed once at
/// construction; afterwards the checker is read-only.
///
#[derive(Debug, Clone)]
pub struct OntologyTypeChecker {
    graph: TermGraph,
    lookup: HashMap<String, usize>,
    ancestors: Vec<HashSet<usize>>,
    origin: Option<PathBuf>,
}

impl OntologyTypeChecker {
    ///
    /// Wrap an already built term graph.
    ///
    pub fn new(graph: TermGraph) -> Result<Self, OntologyLoadError> {
        if graph.is_empty() {
            return Err(OntologyLoadError::EmptyOntology);
        }

        let mut parents: Vec<Vec<usize>> = Vec::with_capacity(graph.len());
        for term in graph.terms() {
            let mut resolved = Vec::with_capacity(term.parents.len());
            for parent in &term.parents {
                let pos = graph
                    .position(parent)
                    .ok_or_else(|| OntologyLoadError::UnknownParent {
                        term: term.id.clone(),
                        parent: parent.clone(),
                    })?;
                resolved.push(pos);
            }
            parents.push(resolved);
        }

        let mut lookup = HashMap::default();
        for (i, term) in graph.terms().iter().enumerate() {
            lookup.insert(term.id.clone(), i);
        }
        for (i, term) in graph.terms().iter().enumerate() {
            if let Some(name) = &term.name {
                lookup.entry(name.clone()).or_insert(i);
            }
        }

        let ancestors = (0..graph.len())
            .map(|i| ancestor_closure(i, &parents))
            .collect();

        Ok(OntologyTypeChecker {
            graph,
            lookup,
            ancestors,
            origin: None,
        })
    }

    /// Parse an OBO document from any buffered reader.
    pub fn from_obo<R: BufRead>(reader: R) -> Result<Self, OntologyLoadError> {
        Self::new(parse_obo(reader)?)
    }

    ///
    /// Load an OBO file (optionally gzip'd) and build the checker from it.
    ///
    /// # Arguments
    /// - path: path to the `.obo` or `.obo.gz` file
    pub fn from_obo_path<P: AsRef<Path>>(path: P) -> Result<Self, OntologyLoadError> {
        let path = path.as_ref();
        let reader = get_dynamic_reader(path)
            .map_err(|e| OntologyLoadError::FileReadError(format!("{:#}", e)))?;
        let mut checker = Self::from_obo(reader)?;
        info!("Loaded {} ontology terms from {}", checker.graph.len(), path.display());
        checker.origin = Some(path.to_path_buf());
        Ok(checker)
    }

    pub fn graph(&self) -> &TermGraph {
        &self.graph
    }

    fn resolve(&self, type_name: &str) -> Option<usize> {
        self.lookup.get(type_name).copied()
    }
}

/// Every term reachable from `start` over is-a edges, `start` included.
fn ancestor_closure(start: usize, parents: &[Vec<usize>]) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    while let Some(term) = stack.pop() {
        if seen.insert(term) {
            stack.extend(parents[term].iter().copied());
        }
    }
    seen
}

impl TypeChecker for OntologyTypeChecker {
    fn description(&self) -> String {
        match &self.origin {
            Some(path) => format!("ontology {}", path.display()),
            None => format!("in-memory ontology with {} terms", self.graph.len()),
        }
    }

    fn is_valid_type(&self, type_name: &str) -> bool {
        self.resolve(type_name).is_some()
    }

    fn is_a(&self, child_type: &str, ancestor_type: &str) -> bool {
        match (self.resolve(child_type), self.resolve(ancestor_type)) {
            (Some(child), Some(ancestor)) => self.ancestors[child].contains(&ancestor),
            _ => false,
        }
    }
}

/// Feature types accepted without an ontology file.
pub const BUILTIN_TYPES: &[&str] = &[
    "CDS",
    "EST",
    "LTR_retrotransposon",
    "SNP",
    "TF_binding_site",
    "cDNA_match",
    "exon",
    "five_prime_UTR",
    "gap",
    "gene",
    "intergenic_region",
    "intron",
    "long_terminal_repeat",
    "mRNA",
    "match",
    "nucleotide_match",
    "primer_binding_site",
    "protein_match",
    "pseudogene",
    "region",
    "repeat_region",
    "tRNA",
    "target_site_duplication",
    "three_prime_UTR",
    "transcript",
];

///
/// BuiltinTypeChecker struct, a fixed list of common sequence ontology
/// types without inheritance: `is_a` only holds reflexively.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTypeChecker;

impl TypeChecker for BuiltinTypeChecker {
    fn description(&self) -> String {
        "built-in type list".to_string()
    }

    fn is_valid_type(&self, type_name: &str) -> bool {
        BUILTIN_TYPES.binary_search(&type_name).is_ok()
    }

    fn is_a(&self, child_type: &str, ancestor_type: &str) -> bool {
        self.is_valid_type(child_type) && child_type == ancestor_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/obo")
            .join(file_name)
    }

    #[fixture]
    #[once]
    fn sofa() -> OntologyTypeChecker {
        OntologyTypeChecker::from_obo_path(get_test_path("so_mini.obo")).unwrap()
    }

    #[rstest]
    fn test_valid_types_by_name_and_id(sofa: &OntologyTypeChecker) {
        assert!(sofa.is_valid_type("mRNA"));
        assert!(sofa.is_valid_type("SO:0000234"));
        assert!(!sofa.is_valid_type("not_a_type"));
        assert!(sofa.description().contains("so_mini.obo"));
    }

    #[rstest]
    #[case("mRNA", "transcript", true)]
    #[case("mRNA", "sequence_feature", true)]
    #[case("SO:0000234", "transcript", true)]
    #[case("transcript", "mRNA", false)]
    #[case("exon", "transcript", false)]
    #[case("mRNA", "not_a_type", false)]
    #[case("not_a_type", "not_a_type", false)]
    fn test_is_a(
        sofa: &OntologyTypeChecker,
        #[case] child: &str,
        #[case] ancestor: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(sofa.is_a(child, ancestor), expected);
    }

    #[rstest]
    fn test_is_a_is_reflexive(sofa: &OntologyTypeChecker) {
        for term in sofa.graph().terms() {
            assert!(sofa.is_a(&term.id, &term.id));
            if let Some(name) = &term.name {
                assert!(sofa.is_a(name, name));
            }
        }
    }

    #[rstest]
    fn test_multiple_inheritance_and_cycles() {
        let mut graph = TermGraph::new();
        graph.add_term("A", None, &["B", "C"]).unwrap();
        graph.add_term("B", None, &["D"]).unwrap();
        graph.add_term("C", None, &["D"]).unwrap();
        // a malformed but parseable loop must not hang the closure
        graph.add_term("D", None, &["A"]).unwrap();
        let checker = OntologyTypeChecker::new(graph).unwrap();
        assert!(checker.is_a("A", "D"));
        assert!(checker.is_a("D", "B"));
        assert!(checker.description().contains("4 terms"));
    }

    #[rstest]
    fn test_dangling_parent_is_a_load_error() {
        let mut graph = TermGraph::new();
        graph.add_term("A", None, &["missing"]).unwrap();
        assert!(matches!(
            OntologyTypeChecker::new(graph),
            Err(OntologyLoadError::UnknownParent { .. })
        ));
    }

    #[rstest]
    fn test_empty_and_missing_sources_fail() {
        assert!(matches!(
            OntologyTypeChecker::new(TermGraph::new()),
            Err(OntologyLoadError::EmptyOntology)
        ));
        assert!(matches!(
            OntologyTypeChecker::from_obo_path(get_test_path("missing.obo")),
            Err(OntologyLoadError::FileReadError(_))
        ));
    }

    #[rstest]
    fn test_gzipped_obo() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("tiny.obo.gz");
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        write!(encoder, "[Term]\nid: T:1\nname: gene\n").unwrap();
        encoder.finish().unwrap();

        let checker = OntologyTypeChecker::from_obo_path(&path).unwrap();
        assert!(checker.is_valid_type("gene"));
    }

    #[rstest]
    fn test_builtin_list_is_sorted_and_usable() {
        let mut sorted = BUILTIN_TYPES.to_vec();
        sorted.sort();
        assert_eq!(sorted, BUILTIN_TYPES.to_vec());

        let checker = BuiltinTypeChecker;
        assert!(checker.is_valid_type("exon"));
        assert!(checker.is_a("exon", "exon"));
        assert!(!checker.is_a("mRNA", "transcript"));
        assert!(!checker.is_valid_type("widget"));
    }
}
