//! Simulated PHY devices
//!
//! A [`PhyDevice`] is one end of a link: it owns its antenna panel, its
//! current beamforming vector (overwritten by each selection), and the SNR
//! reports delivered to it, keyed by the peer cell identity.

use std::collections::HashMap;
use std::sync::Arc;

use beamlink_core::channel::ChannelEvaluator;
use beamlink_core::grid::{AntennaProfile, EndGrid};
use beamlink_core::panel::{PanelGeometry, SteeredPanel};
use beamlink_core::psd::SpectrumModel;
use beamlink_core::types::{BeamId, BeamformingVector, Position};
use serde::{Deserialize, Serialize};

/// Which link end a device plays when grids are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceRole {
    BaseStation,
    MobileStation,
}

/// SNR estimate reported to the receive device after a selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnrReport {
    pub snr: f64,
    /// The receive beam the estimate was taken on.
    pub beam: BeamId,
}

/// Static device configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhyConfig {
    pub role: DeviceRole,
    pub profile: AntennaProfile,
    pub rows: usize,
    pub columns: usize,
    pub noise_figure_db: f64,
    /// Elevation step this device contributes to the search grid, degrees.
    pub vertical_step_deg: f64,
}

impl PhyConfig {
    pub fn base_station(rows: usize, columns: usize) -> Self {
        Self {
            role: DeviceRole::BaseStation,
            profile: AntennaProfile::Default,
            rows,
            columns,
            noise_figure_db: 5.0,
            vertical_step_deg: 30.0,
        }
    }

    pub fn mobile_station(rows: usize, columns: usize) -> Self {
        Self {
            role: DeviceRole::MobileStation,
            ..Self::base_station(rows, columns)
        }
    }
}

/// One simulated PHY endpoint
pub struct PhyDevice {
    pub cell_id: u16,
    pub position: Position,
    pub spectrum: SpectrumModel,
    /// The device's beam state machine; the link driver borrows it for the
    /// duration of one selection.
    pub panel: SteeredPanel,
    /// Written by the link driver after each selection.
    pub current_beam: BeamformingVector,
    config: PhyConfig,
    channel: Arc<dyn ChannelEvaluator>,
    snr_reports: HashMap<u16, SnrReport>,
}

impl PhyDevice {
    pub fn new(
        cell_id: u16,
        position: Position,
        config: PhyConfig,
        spectrum: SpectrumModel,
        channel: Arc<dyn ChannelEvaluator>,
    ) -> Self {
        let geometry = PanelGeometry::new(config.rows, config.columns);
        let end = match config.role {
            DeviceRole::BaseStation => {
                EndGrid::transmit(config.profile, config.rows, config.vertical_step_deg)
            }
            DeviceRole::MobileStation => {
                EndGrid::receive(config.profile, config.rows, config.vertical_step_deg)
            }
        };
        Self {
            cell_id,
            position,
            spectrum,
            panel: SteeredPanel::new(geometry, end.azimuth_step_deg),
            current_beam: BeamformingVector::default(),
            config,
            channel,
            snr_reports: HashMap::new(),
        }
    }

    pub fn config(&self) -> &PhyConfig {
        &self.config
    }

    /// The propagation model this device is attached to
    pub fn channel(&self) -> &Arc<dyn ChannelEvaluator> {
        &self.channel
    }

    /// Store the SNR estimate delivered after a selection, keyed by the
    /// transmitting cell.
    pub fn record_snr(&mut self, peer_cell_id: u16, snr: f64, beam: BeamId) {
        self.snr_reports.insert(peer_cell_id, SnrReport { snr, beam });
    }

    pub fn snr_report(&self, peer_cell_id: u16) -> Option<&SnrReport> {
        self.snr_reports.get(&peer_cell_id)
    }
}
