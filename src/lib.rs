//! Left leaning red black tree, augmented with sub-tree size, to
//! serve as an in-memory ordered map with rank and select.

mod error;
mod llrb;

pub use crate::error::Error;
pub use crate::llrb::{Iter, Keys, Llrb, Range, Reverse, Stats, Values};
