//! Beamforming policy dispatch
//!
//! The policy family is a closed enum dispatched through one [`select`]
//! entry point, constructed from explicit configuration rather than a
//! runtime type registry. [`BeamformingMethod::OptimalCovMatrix`] is a
//! declared placeholder so that policy selection stays uniform.

use serde::{Deserialize, Serialize};

use crate::channel::ChannelEvaluator;
use crate::direct;
use crate::grid::SearchGrid;
use crate::search::{cell_scan, quasi_omni_scan, BeamSelection, Endpoint, LinkBudget};
use crate::types::{BeamError, BeamResult};

/// The closed family of beam-selection policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamformingMethod {
    /// Exhaustive double grid scan with geometric tie-breaking.
    CellScan,
    /// Transmit-only scan against a fixed omnidirectional receive beam.
    QuasiOmniCellScan,
    /// Closed-form steering along the geometric bearing, no search.
    DirectPath,
    /// Omnidirectional transmit, direct-path receive.
    QuasiOmniDirectPath,
    /// Direct-path transmit, omnidirectional receive.
    DirectPathQuasiOmni,
    /// Reserved for a covariance-matrix-based optimal algorithm.
    OptimalCovMatrix,
}

impl Default for BeamformingMethod {
    fn default() -> Self {
        Self::CellScan
    }
}

/// Configuration shared by the beamforming policies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamformingConfig {
    pub method: BeamformingMethod,
    /// Elevation step of the scan variants, degrees.
    pub beam_search_angle_step_deg: f64,
    /// Calibration margin between ideal and realistic SNR estimation,
    /// applied to the reported SNR.
    pub ideal_snr_offset: f64,
}

impl Default for BeamformingConfig {
    fn default() -> Self {
        Self {
            method: BeamformingMethod::CellScan,
            beam_search_angle_step_deg: 30.0,
            ideal_snr_offset: 1.0,
        }
    }
}

/// Run the configured policy for one link.
pub fn select(
    cfg: &BeamformingConfig,
    tx: Endpoint<'_>,
    rx: Endpoint<'_>,
    grid: &SearchGrid,
    channel: &dyn ChannelEvaluator,
    budget: &LinkBudget,
) -> BeamResult<BeamSelection> {
    match cfg.method {
        BeamformingMethod::CellScan => Ok(cell_scan(tx, rx, grid, channel, budget, cfg)),
        BeamformingMethod::QuasiOmniCellScan => {
            Ok(quasi_omni_scan(tx, rx, grid, channel, budget, cfg))
        }
        BeamformingMethod::DirectPath => {
            let (tx_vector, rx_vector) = direct::direct_path(
                tx.position,
                rx.position,
                tx.steerer.geometry(),
                rx.steerer.geometry(),
            );
            Ok(closed_form(tx_vector, rx_vector))
        }
        BeamformingMethod::QuasiOmniDirectPath => {
            let (tx_vector, rx_vector) = direct::quasi_omni_direct_path(
                tx.position,
                rx.position,
                tx.steerer.geometry(),
                rx.steerer.geometry(),
            );
            Ok(closed_form(tx_vector, rx_vector))
        }
        BeamformingMethod::DirectPathQuasiOmni => {
            let (tx_vector, rx_vector) = direct::direct_path_quasi_omni(
                tx.position,
                rx.position,
                tx.steerer.geometry(),
                rx.steerer.geometry(),
            );
            Ok(closed_form(tx_vector, rx_vector))
        }
        BeamformingMethod::OptimalCovMatrix => Err(BeamError::NotImplemented(
            "optimal covariance-matrix beamforming",
        )),
    }
}

fn closed_form(
    tx: crate::types::BeamformingVector,
    rx: crate::types::BeamformingVector,
) -> BeamSelection {
    BeamSelection {
        tx,
        rx,
        snr: None,
        sector_snr_trace: Default::default(),
    }
}
