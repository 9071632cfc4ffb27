//! The ground-truth world: grid geometry, mineral layout and map generation.

pub mod error;
pub mod generator;
pub mod grid;
pub mod position;

pub use error::WorldError;
pub use generator::BlobGenerator;
pub use grid::WorldGrid;
pub use position::{Action, Position};
