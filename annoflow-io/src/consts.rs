pub const GFF3_VERSION_PRAGMA: &str = "##gff-version 3";
pub const RESOLVE_DIRECTIVE: &str = "###";
pub const FASTA_DIRECTIVE: &str = "##FASTA";
pub const ABSENT: &str = ".";

pub const ID_ATTRIBUTE: &str = "ID";
pub const PARENT_ATTRIBUTE: &str = "Parent";

pub const GFF3_COLUMNS: usize = 9;
