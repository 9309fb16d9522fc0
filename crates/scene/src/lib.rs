pub mod feature;
pub mod filter;
pub mod picking;
pub mod tracker;

pub use feature::*;
pub use filter::*;
pub use tracker::*;
