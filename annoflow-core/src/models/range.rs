use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::errors::StreamError;

/// Represent a range [start, end]
/// 1-based, inclusive of both start and end (GFF3 coordinates)
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    ///
    /// Create a new range, rejecting reversed coordinates.
    ///
    pub fn new(start: u64, end: u64) -> Result<Self, StreamError> {
        if end < start {
            return Err(StreamError::MalformedRecord(format!(
                "range end {} lies before start {}",
                end, start
            )));
        }
        Ok(Range { start, end })
    }

    /// Number of positions covered by the range.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A valid range always covers at least one position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    #[inline]
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn join(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    ///
    /// The positions strictly between `self` and a range that starts after it.
    ///
    /// The gap is `[self.end + 1, next.start - 1]`. Adjacent or overlapping
    /// ranges have no gap, and neither does a `next` that starts before `self`.
    ///
    pub fn gap_to(&self, next: &Range) -> Option<Range> {
        let gap_start = self.end.checked_add(1)?;
        if next.start <= gap_start {
            return None;
        }
        Some(Range {
            start: gap_start,
            end: next.start - 1,
        })
    }
}

impl Ord for Range {
    #[inline]
    fn cmp(&self, other: &Range) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl PartialOrd for Range {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
