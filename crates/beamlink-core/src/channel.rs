//! Channel evaluation seam
//!
//! The search engine probes every candidate beam pair through the
//! [`ChannelEvaluator`] trait. Steering weights travel with each call inside
//! a [`LinkEnd`], so the channel never reads ambient per-device beam state.
//!
//! A channel kind that knows the true path geometry can additionally report
//! a [`PathBearing`]; the default implementation returns `None`, which
//! skips the geometric tie-break refinement in the cell scan.

use crate::panel::PanelGeometry;
use crate::psd::Psd;
use crate::types::{Complex, Position};

/// One end of a link as seen by the channel for a single probe
#[derive(Debug, Clone, Copy)]
pub struct LinkEnd<'a> {
    pub position: Position,
    pub weights: &'a [Complex],
    pub panel: PanelGeometry,
}

/// True geometric departure and arrival bearing of the dominant path
///
/// Angles are in degrees: azimuth from +x, zenith from +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathBearing {
    pub departure_azimuth_deg: f64,
    pub departure_zenith_deg: f64,
    pub arrival_azimuth_deg: f64,
    pub arrival_zenith_deg: f64,
}

/// Propagation model evaluated once per candidate beam pair
pub trait ChannelEvaluator {
    /// Received PSD for the given transmit PSD with the supplied steering
    /// weights applied on both ends.
    fn rx_power_spectral_density(&self, tx_psd: &Psd, tx: &LinkEnd<'_>, rx: &LinkEnd<'_>) -> Psd;

    /// True angle-of-departure/arrival between the two positions, if this
    /// channel kind knows the path geometry.
    fn path_bearing(&self, _tx_position: Position, _rx_position: Position) -> Option<PathBearing> {
        None
    }
}
