use thiserror::Error;

/// Why an ontology could not be turned into a usable term graph.
///
/// Loading is all-or-nothing: no partially built ontology is ever handed out.
#[derive(Error, Debug)]
pub enum OntologyLoadError {
    #[error("Can't read ontology file: {0}")]
    FileReadError(String),

    #[error("Malformed OBO line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    #[error("Term stanza ending on line {line} has no id")]
    MissingId { line: usize },

    #[error("Term {0} is defined more than once")]
    DuplicateTerm(String),

    #[error("Term {term} has is_a parent {parent}, which is not defined")]
    UnknownParent { term: String, parent: String },

    #[error("Ontology defines no terms")]
    EmptyOntology,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
