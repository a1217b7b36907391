//! Core types for beam selection
//!
//! This module defines the fundamental value types shared by every
//! beamforming policy: complex steering weights, beam identities, and the
//! 3-D positions the link geometry is computed from.
//!
//! ## Beam identity
//!
//! A selected beam is identified by its discretised azimuth sector and its
//! elevation angle. Two reserved identities exist alongside the directional
//! ones:
//!
//! - [`BeamId::EMPTY`] — no directional beam was selected (closed-form
//!   direct-path results carry this).
//! - [`BeamId::OMNI`] — the array is weighted omnidirectionally.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// Per-element complex weighting that steers an array's radiation pattern
pub type SteeringVector = Vec<Complex>;

/// Result type for beamforming policy dispatch
pub type BeamResult<T> = Result<T, BeamError>;

/// Errors surfaced by beamforming policy dispatch
///
/// Experiment-correctness violations (coincident endpoints, empty steering
/// vectors, cross-channel pairing) are not represented here: a malformed
/// experiment aborts immediately instead of propagating an error value.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BeamError {
    #[error("beamforming method not implemented: {0}")]
    NotImplemented(&'static str),
}

/// A point in 3-D space, metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance to another position in metres
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Bearing toward another position as `(azimuth, zenith)` in degrees.
    ///
    /// Azimuth is measured from the +x axis in the x-y plane; the zenith
    /// angle is measured down from +z, so 90° is the horizon.
    pub fn bearing_to(&self, other: &Position) -> (f64, f64) {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        let r = self.distance_to(other);
        assert!(r > 0.0, "bearing is undefined between coincident positions");
        let azimuth = dy.atan2(dx).to_degrees();
        let zenith = (dz / r).acos().to_degrees();
        (azimuth, zenith)
    }
}

/// Identity of a selected beam: azimuth sector index and elevation angle
///
/// Equality is exact on both fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamId {
    /// Discretised azimuth index over the array's steerable range.
    pub sector: u16,
    /// Elevation (zenith) angle in degrees.
    pub elevation_deg: f64,
}

impl BeamId {
    /// Reserved identity for "no directional beam selected".
    pub const EMPTY: BeamId = BeamId {
        sector: u16::MAX,
        elevation_deg: 0.0,
    };

    /// Reserved identity for an omnidirectional beam.
    pub const OMNI: BeamId = BeamId {
        sector: u16::MAX - 1,
        elevation_deg: 0.0,
    };

    pub fn new(sector: u16, elevation_deg: f64) -> Self {
        Self {
            sector,
            elevation_deg,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    pub fn is_omni(&self) -> bool {
        *self == Self::OMNI
    }
}

/// A steering-weight vector together with the beam identity that produced it
///
/// The weight sequence length equals the owning array's element count. A
/// device's current vector is overwritten as a whole by the next selection.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamformingVector {
    pub weights: SteeringVector,
    pub beam: BeamId,
}

impl Default for BeamformingVector {
    fn default() -> Self {
        Self {
            weights: Vec::new(),
            beam: BeamId::EMPTY,
        }
    }
}
