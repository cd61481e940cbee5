use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::StreamError;

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    Forward,
    Reverse,
    /// Strand is relevant but unknown (`?` in GFF3).
    Unknown,
    /// Feature is not stranded (`.` in GFF3).
    #[default]
    Both,
}

impl Strand {
    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unknown => '?',
            Strand::Both => '.',
        }
    }
}

impl FromStr for Strand {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "?" => Ok(Strand::Unknown),
            "." => Ok(Strand::Both),
            _ => Err(StreamError::MalformedRecord(format!(
                "invalid strand '{}' -- must be one of +-?.",
                s
            ))),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
