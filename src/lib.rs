//! prospector - Swarm mineral exploration with a shared Q-table
//!
//! A fleet of agents explores a grid hiding mineral deposits. Each agent
//! senses a square window around itself, moves one cell per tick and learns
//! from a single tabular Q-learning policy shared by the whole swarm. Cells
//! pay a one-time bonus to whoever reveals them first.
//!
//! ```
//! use prospector::rl::{SharedPolicy, SwarmConfig, SwarmEnvironment};
//! use prospector::world::BlobGenerator;
//!
//! let config = SwarmConfig {
//!     num_agents: 3,
//!     num_ticks: 20,
//!     ..SwarmConfig::square(10)
//! };
//! let mut env = SwarmEnvironment::generate(config, &BlobGenerator::new(0.15, 2), 7).unwrap();
//! let mut policy = SharedPolicy::new();
//! let summary = env.run(&mut policy);
//! assert_eq!(summary.ticks, 20);
//! ```

pub mod discovery;
pub mod rl;
pub mod world;

pub use discovery::{Category, CellStatus, DiscoveryState};
pub use rl::{SharedPolicy, SwarmConfig, SwarmEnvironment};
pub use world::{Action, BlobGenerator, Position, WorldGrid};
