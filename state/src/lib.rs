mod drag;
mod load;
mod store;
#[cfg(test)]
mod testing;

pub use crate::load::{LoadOutcome, ToggleOutcome};
pub use crate::store::TreeStore;
