//! # GFF3 input/output for feature streams.
//!
//! [Gff3Reader] turns GFF3 lines into the record events consumed by the
//! assembly stage; [write_trees] and the [Gff3Writer] trait write finished
//! feature trees back out, plain or gzip'd.
//!
pub mod consts;
pub mod escape;
pub mod gff3;
pub mod write;

// re-expose core functions
pub use consts::*;
pub use gff3::*;
pub use write::*;
