//! Concrete layers.
//!
//! Each layer validates its parameters on construction and again when it is
//! rebuilt from an archive, so a loaded layer always upholds the same
//! invariants as one built in code.

mod conv;
mod dense;
mod dropout;
mod pool;


pub use conv::{ConvParams, Convolutional, Padding};
pub use dense::Dense;
pub use dropout::{Dropout, Phase};
pub use pool::{MaxPool, PoolParams};
