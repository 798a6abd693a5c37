mod id;
mod node;
mod ops;
mod patch;

pub use crate::id::*;
pub use crate::node::*;
pub use crate::ops::*;
pub use crate::patch::*;
