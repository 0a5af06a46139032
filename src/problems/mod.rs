//! Reference problem plugins.
//!
//! - [`NQueens`]: permutation search with local-search hybridization
//! - [`ZeroCount`]: bit strings scored by their number of zero bits

mod n_queens;
mod zero_count;

pub use n_queens::NQueens;
pub use zero_count::ZeroCount;
