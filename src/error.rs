use core::fmt;

/// Error returned when a rank-based access falls outside the index.
///
/// Key and index *types* are checked by the compiler (`T: Ord`, `isize` indices), so the only
/// failure left for run time is a position outside `[-len, len)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum IndexError {
    /// `index` was outside `[-len, len)`.
    OutOfRange {
        /// The index as the caller passed it.
        index: isize,
        /// The number of keys in the index at the time of the call.
        len: usize,
    },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::OutOfRange {
                index,
                len,
            } => write!(f, "index {index} out of range for ordered index of length {len}"),
        }
    }
}

impl core::error::Error for IndexError {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn out_of_range_message() {
        let error = IndexError::OutOfRange {
            index: -21,
            len: 20,
        };
        assert_eq!(error.to_string(), "index -21 out of range for ordered index of length 20");
    }
}
