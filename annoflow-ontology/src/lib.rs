//! Feature type validation backed by an ontology.
//!
//! An [OntologyTypeChecker] is loaded once from an OBO file, usually the
//! Sequence Ontology, and then answers two questions: is a type name known,
//! and is one type a (transitive) specialisation of another.
//!
//! ```rust
//! use annoflow_core::traits::TypeChecker;
//! use annoflow_ontology::OntologyTypeChecker;
//!
//! let obo = "[Term]\nid: SO:0000673\nname: transcript\n\n[Term]\nid: SO:0000234\nname: mRNA\nis_a: SO:0000673 ! transcript\n";
//! let checker = OntologyTypeChecker::from_obo(obo.as_bytes()).unwrap();
//! assert!(checker.is_a("mRNA", "transcript"));
//! assert!(!checker.is_a("transcript", "mRNA"));
//! ```

pub mod checker;
pub mod errors;
pub mod obo;
pub mod term_graph;

// re-exports
pub use self::checker::{BUILTIN_TYPES, BuiltinTypeChecker, OntologyTypeChecker};
pub use self::errors::OntologyLoadError;
pub use self::obo::parse_obo;
pub use self::term_graph::{Term, TermGraph};
