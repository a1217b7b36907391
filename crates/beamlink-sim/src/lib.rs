//! # Beamlink Sim
//!
//! Concrete collaborators for the beam-selection core: a line-of-sight
//! channel evaluator, simulated PHY devices owning panels and per-device
//! beam state, and the link driver that runs one selection end to end while
//! enforcing the experiment preconditions.

pub mod channel;
pub mod device;
pub mod link;

pub use channel::{LosChannel, LosChannelConfig};
pub use device::{DeviceRole, PhyConfig, PhyDevice, SnrReport};
pub use link::select_beams;
