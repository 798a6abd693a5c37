mod forest;
mod rows;

pub use crate::forest::*;
pub use crate::rows::*;
