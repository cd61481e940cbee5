pub mod feature;
pub mod range;
pub mod record;
pub mod strand;

// re-export for cleaner imports
pub use self::feature::{FeatureNode, Features, PSEUDO_PARENT_TYPE};
pub use self::range::Range;
pub use self::record::{FeatureRecord, RecordEvent};
pub use self::strand::Strand;
