//! Core data model for annoflow.
//!
//! This crate holds the pieces every pipeline stage shares:
//!
//! - [models]: feature records as decoded from an annotation source, and the owned
//!   feature trees the stages pass along
//! - [graph]: the ID-indexed arena that assembles records arriving in any order into
//!   trees, synthesizing pseudo-parents for forward references and rejecting cycles
//! - [traits]: the [TypeChecker] seam used to validate feature types
//! - [errors]: structural and stream error kinds
//!
//! ```rust
//! use annoflow_core::graph::FeatureGraphIndex;
//! use annoflow_core::models::{FeatureNode, FeatureRecord, Range};
//!
//! let exon = FeatureNode::from(FeatureRecord::new(
//!     Some("e1"),
//!     Some("t1"),
//!     "chr1",
//!     "exon",
//!     Range { start: 5, end: 9 },
//! ));
//!
//! let mut index = FeatureGraphIndex::new();
//! let nid = index.add("e1", exon.clone()).unwrap();
//! index.add_pseudo_parent("t1", FeatureNode::pseudo_parent("t1", &exon)).unwrap();
//! index.attach(nid, "t1").unwrap();
//!
//! assert!(index.find_root("e1").unwrap().is_pseudo());
//! ```
pub mod errors;
pub mod graph;
pub mod models;
pub mod traits;
pub mod utils;

// re-exports
pub use errors::{GraphError, StreamError};
pub use graph::FeatureGraphIndex;
pub use traits::TypeChecker;
