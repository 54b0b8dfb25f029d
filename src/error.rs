use std::{error, fmt};

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, PartialEq)]
pub enum Error<K>
where
    K: Clone + Ord,
{
    /// Key is not present in the index, or the index is empty while
    /// asking for its min / max key.
    NotFound,
    /// Argument is outside the domain of the operation, like rank
    /// passed to select() beyond the number of entries.
    InvalidArgument(String),
    /// delete_min() / delete_max() on an empty index.
    Underflow,
    /// Fatal case, breaking one of the two LLRB rules.
    ConsecutiveReds,
    /// Fatal case, a red link leaning right, left leaning tree shall
    /// have red links only on the left.
    RightLeaningRed,
    /// Fatal case, root link is red after a mutation returned.
    RedRoot,
    /// Fatal case, breaking one of the two LLRB rules. The String
    /// component of this variant can be used for debugging.
    UnbalancedBlacks(String),
    /// Fatal case, cached subtree size is stale.
    SizeMismatch(String),
    /// Fatal case, index entries are not in sort-order.
    SortError(K, K),
}

impl<K> fmt::Display for Error<K>
where
    K: Clone + Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "key not found"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Underflow => write!(f, "index underflow"),
            Error::ConsecutiveReds => write!(f, "consecutive red links"),
            Error::RightLeaningRed => write!(f, "right leaning red link"),
            Error::RedRoot => write!(f, "root link is red"),
            Error::UnbalancedBlacks(msg) => write!(f, "unbalanced blacks, {}", msg),
            Error::SizeMismatch(msg) => write!(f, "size mismatch, {}", msg),
            Error::SortError(key, parent) => {
                write!(f, "key {:?} out of order under {:?}", key, parent)
            }
        }
    }
}

impl<K> error::Error for Error<K> where K: Clone + Ord + fmt::Debug {}
