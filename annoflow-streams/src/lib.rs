//! Pull-based pipeline stages for genome feature trees.
//!
//! Every stage implements [NodeStream] and owns exactly one upstream stage, so a
//! pipeline is built by wrapping stages inside each other. The consumer pulls
//! from the outermost stage; each stage pulls from its upstream only as far as
//! its bounded lookahead requires.
//!
//! ```rust
//! use annoflow_core::models::{FeatureRecord, Range};
//! use annoflow_streams::{AssemblyStage, DuplicatingStage, InterleavingStage, RecordArraySource, collect};
//!
//! let records = vec![
//!     FeatureRecord::new(Some("g1"), None, "chr1", "gene", Range { start: 1, end: 10 }),
//!     FeatureRecord::new(Some("g2"), None, "chr1", "gene", Range { start: 21, end: 30 }),
//! ];
//!
//! let assembled = AssemblyStage::new(RecordArraySource::from(records));
//! let interleaved = InterleavingStage::new(assembled, "gene", "intergenic").unwrap();
//! let mut pipeline = DuplicatingStage::new(interleaved, "intergenic", "spacer").unwrap();
//!
//! let types: Vec<String> = collect(&mut pipeline)
//!     .unwrap()
//!     .into_iter()
//!     .map(|tree| tree.feature_type)
//!     .collect();
//! assert_eq!(types, vec!["gene", "intergenic", "spacer", "gene"]);
//! ```

pub mod assembly;
pub mod duplicate;
pub mod interleave;
pub mod stat;
pub mod stream;
pub mod type_check;

// re-exports
pub use self::assembly::AssemblyStage;
pub use self::duplicate::DuplicatingStage;
pub use self::interleave::InterleavingStage;
pub use self::stat::{StatStage, StreamStats};
pub use self::stream::{
    ArrayInStream, NodeStream, RecordArraySource, StreamLatch, StreamResult, collect,
};
pub use self::type_check::TypeCheckStage;
