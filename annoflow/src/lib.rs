//! Streaming assembly and transformation of genome feature annotations.
//!
//! This crate only re-exports the workspace crates, each behind a feature of
//! the same name.

#[cfg(feature = "core")]
#[doc(inline)]
pub use annoflow_core as core;

#[cfg(feature = "streams")]
#[doc(inline)]
pub use annoflow_streams as streams;

#[cfg(feature = "ontology")]
#[doc(inline)]
pub use annoflow_ontology as ontology;

#[cfg(feature = "io")]
#[doc(inline)]
pub use annoflow_io as io;
