//! Line-of-sight channel evaluator
//!
//! Free-space (Friis) path loss at the carrier frequency, multiplied by the
//! array gains both ends present toward the line-of-sight direction. An
//! optional log-normal shadowing term can be enabled; it is off by default
//! so beam search stays deterministic.
//!
//! This channel knows the true path geometry, so it reports a
//! [`PathBearing`] and the cell scan can refine exact power ties.

use std::cell::RefCell;
use std::f64::consts::PI;

use beamlink_core::channel::{ChannelEvaluator, LinkEnd, PathBearing};
use beamlink_core::psd::{Psd, SpectrumModel};
use beamlink_core::types::Position;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Line-of-sight channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LosChannelConfig {
    /// Standard deviation of the log-normal shadowing term in dB.
    /// Zero disables shadowing.
    pub shadowing_sigma_db: f64,
    /// Seed for the shadowing draw.
    pub seed: u64,
}

impl Default for LosChannelConfig {
    fn default() -> Self {
        Self {
            shadowing_sigma_db: 0.0,
            seed: 0,
        }
    }
}

/// Free-space propagation with per-end array gains
#[derive(Debug)]
pub struct LosChannel {
    spectrum: SpectrumModel,
    config: LosChannelConfig,
    rng: RefCell<StdRng>,
}

impl LosChannel {
    pub fn new(spectrum: SpectrumModel, config: LosChannelConfig) -> Self {
        Self {
            spectrum,
            config,
            rng: RefCell::new(StdRng::seed_from_u64(config.seed)),
        }
    }

    pub fn config(&self) -> &LosChannelConfig {
        &self.config
    }

    /// Linear shadowing gain, 1.0 when shadowing is disabled
    fn shadowing_gain(&self) -> f64 {
        if self.config.shadowing_sigma_db == 0.0 {
            return 1.0;
        }
        let draw = Normal::new(0.0, self.config.shadowing_sigma_db)
            .unwrap()
            .sample(&mut *self.rng.borrow_mut());
        10.0_f64.powf(draw / 10.0)
    }
}

impl ChannelEvaluator for LosChannel {
    fn rx_power_spectral_density(&self, tx_psd: &Psd, tx: &LinkEnd<'_>, rx: &LinkEnd<'_>) -> Psd {
        let distance = tx.position.distance_to(&rx.position);
        assert!(distance > 0.0, "propagation is undefined at zero distance");

        let (departure_azimuth, departure_zenith) = tx.position.bearing_to(&rx.position);
        let (arrival_azimuth, arrival_zenith) = rx.position.bearing_to(&tx.position);
        let tx_gain = tx.panel.array_gain(tx.weights, departure_azimuth, departure_zenith);
        let rx_gain = rx.panel.array_gain(rx.weights, arrival_azimuth, arrival_zenith);

        let wavelength = self.spectrum.wavelength_m();
        let friis = (wavelength / (4.0 * PI * distance)).powi(2);

        tx_psd.scaled(tx_gain * rx_gain * friis * self.shadowing_gain())
    }

    fn path_bearing(&self, tx_position: Position, rx_position: Position) -> Option<PathBearing> {
        let (departure_azimuth_deg, departure_zenith_deg) = tx_position.bearing_to(&rx_position);
        let (arrival_azimuth_deg, arrival_zenith_deg) = rx_position.bearing_to(&tx_position);
        Some(PathBearing {
            departure_azimuth_deg,
            departure_zenith_deg,
            arrival_azimuth_deg,
            arrival_zenith_deg,
        })
    }
}
