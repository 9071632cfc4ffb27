//! Policy trait, the shared Q-table and its persistence.

#[cfg(feature = "serde")]
pub mod persistence;
pub mod table;
pub mod trait_;

#[cfg(feature = "serde")]
pub use persistence::{load_policy, read_policy, save_policy, write_policy, PolicyError};
pub use table::SharedPolicy;
pub use trait_::Policy;
