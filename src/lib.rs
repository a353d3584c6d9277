//! A growable array that keeps its length and capacity in a header stored
//! immediately before the first element, so the handle is a single pointer that
//! indexes like a plain array.

#[macro_use]
mod logging;

mod dontdothis;
mod error;
mod hdrvec;
mod header;
mod traits;

pub use error::HdrVecError;
pub use hdrvec::HdrVec;
pub use header::{grown_capacity, Header, MIN_CAPACITY};
pub use traits::HdrVecIterator;
