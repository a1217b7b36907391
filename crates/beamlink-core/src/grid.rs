//! Search-grid derivation from antenna configuration profiles
//!
//! The cell scan walks a 2-D angular grid (azimuth sector x elevation angle)
//! on each link end. This module derives those grid parameters from the
//! transmit device's [`AntennaProfile`] and the panel row counts.

use serde::{Deserialize, Serialize};

/// Antenna configuration profile supplied by the transmit device
///
/// The profile is a closed enum, so an unrecognised profile cannot arise at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntennaProfile {
    /// Azimuth step derived from the panel row count, elevation span
    /// [60°, 120°] on both ends.
    Default,
    /// Fixed 9°/18° azimuth steps with asymmetric elevation spans, assuming
    /// the Inets physical layout. Sector counts are recomputed from the
    /// azimuth step rather than taken from the array.
    Inets,
}

impl Default for AntennaProfile {
    fn default() -> Self {
        Self::Default
    }
}

/// Per-endpoint search-grid parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndGrid {
    pub azimuth_step_deg: f64,
    /// Highest sector index; the scan visits `0..=sectors` inclusive.
    pub sectors: u16,
    pub elevation_min_deg: f64,
    pub elevation_max_deg: f64,
    pub elevation_step_deg: f64,
}

impl EndGrid {
    /// Transmit-side grid for the given profile.
    pub fn transmit(profile: AntennaProfile, rows: usize, vertical_step_deg: f64) -> Self {
        match profile {
            AntennaProfile::Default => Self::from_rows(rows, vertical_step_deg),
            AntennaProfile::Inets => Self::inets(9.0, 90.0, 150.0),
        }
    }

    /// Receive-side grid for the given profile.
    pub fn receive(profile: AntennaProfile, rows: usize, vertical_step_deg: f64) -> Self {
        match profile {
            AntennaProfile::Default => Self::from_rows(rows, vertical_step_deg),
            AntennaProfile::Inets => Self::inets(18.0, 30.0, 90.0),
        }
    }

    /// The azimuth step divides 180° into `rows + 1` fence-post intervals, so
    /// `step * (sectors + 1)` spans the steerable range exactly once.
    fn from_rows(rows: usize, vertical_step_deg: f64) -> Self {
        Self {
            azimuth_step_deg: 180.0 / (rows as f64 + 1.0),
            sectors: rows as u16,
            elevation_min_deg: 60.0,
            elevation_max_deg: 120.0,
            elevation_step_deg: vertical_step_deg,
        }
    }

    fn inets(azimuth_step_deg: f64, elevation_min_deg: f64, elevation_max_deg: f64) -> Self {
        Self {
            azimuth_step_deg,
            sectors: (180.0 / azimuth_step_deg) as u16,
            elevation_min_deg,
            elevation_max_deg,
            elevation_step_deg: 30.0,
        }
    }
}

/// Search grids for both ends of one link
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchGrid {
    pub tx: EndGrid,
    pub rx: EndGrid,
}

impl SearchGrid {
    pub fn derive(
        profile: AntennaProfile,
        tx_rows: usize,
        rx_rows: usize,
        tx_vertical_step_deg: f64,
        rx_vertical_step_deg: f64,
    ) -> Self {
        Self {
            tx: EndGrid::transmit(profile, tx_rows, tx_vertical_step_deg),
            rx: EndGrid::receive(profile, rx_rows, rx_vertical_step_deg),
        }
    }
}
