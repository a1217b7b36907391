//! # Beamlink Core
//!
//! Beam-selection algorithms for a cellular radio-link simulator: given a
//! base-station and a mobile-station endpoint, determine the transmit and
//! receive antenna weighting vectors that maximise link quality, and report
//! the resulting beam identities and estimated SNR.
//!
//! ## Components
//!
//! - [`grid`] — search-grid derivation from antenna configuration profiles
//! - [`search`] — the exhaustive cell scan with geometric tie-breaking, and
//!   its quasi-omni variant
//! - [`direct`] — closed-form direct-path beamforming and its omni variants
//! - [`policy`] — the closed policy family dispatched through one entry point
//! - [`panel`] — planar-array geometry, weight computation, and the
//!   per-device beam state machine
//! - [`channel`] — the seam a propagation model plugs into
//! - [`psd`] — transmit and noise power spectral density construction
//!
//! The propagation model and the simulated devices live outside this crate;
//! `beamlink-sim` provides concrete ones.
//!
//! ## Example
//!
//! ```rust
//! use beamlink_core::direct::direct_path;
//! use beamlink_core::panel::PanelGeometry;
//! use beamlink_core::types::Position;
//!
//! let gnb = Position::new(0.0, 0.0, 10.0);
//! let ue = Position::new(100.0, 0.0, 1.5);
//! let (tx, rx) = direct_path(gnb, ue, &PanelGeometry::new(8, 8), &PanelGeometry::new(4, 4));
//! assert_eq!(tx.weights.len(), 64);
//! assert_eq!(rx.weights.len(), 16);
//! ```

pub mod channel;
pub mod direct;
pub mod grid;
pub mod panel;
pub mod policy;
pub mod psd;
pub mod search;
pub mod types;

pub use channel::{ChannelEvaluator, LinkEnd, PathBearing};
pub use grid::{AntennaProfile, EndGrid, SearchGrid};
pub use panel::{BeamSteerer, PanelGeometry, SteeredPanel};
pub use policy::{select, BeamformingConfig, BeamformingMethod};
pub use psd::{noise_power_spectral_density, tx_power_spectral_density, Psd, SpectrumModel};
pub use search::{cell_scan, quasi_omni_scan, BeamSelection, Endpoint, LinkBudget};
pub use types::{BeamError, BeamId, BeamResult, BeamformingVector, Complex, Position, SteeringVector};
