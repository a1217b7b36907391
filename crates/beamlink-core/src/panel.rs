//! Uniform planar array geometry and beam steering
//!
//! A [`PanelGeometry`] describes a rectangular antenna panel facing the +x
//! axis, with `rows` elements stacked along z and `columns` along y. The
//! closed-form weight computations here are pure; the stateful side lives in
//! [`SteeredPanel`], the per-device beam state machine whose only mutators
//! are [`BeamSteerer::set_beam`] and [`BeamSteerer::set_omni`].
//!
//! # Example
//!
//! ```
//! use beamlink_core::panel::PanelGeometry;
//!
//! let panel = PanelGeometry::new(4, 4);
//! let weights = panel.steering_weights(30.0, 90.0);
//! assert_eq!(weights.len(), 16);
//!
//! // Matched-filter weights put the full array gain toward the look direction
//! let gain = panel.array_gain(&weights, 30.0, 90.0);
//! assert!((gain - 16.0).abs() < 1e-9);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::types::{BeamId, BeamformingVector, Complex, SteeringVector};

/// Uniform planar array facing the +x axis
///
/// Element `(row, col)` sits at `(0, col * spacing, row * spacing)` in
/// wavelength units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    pub rows: usize,
    pub columns: usize,
    /// Inter-element spacing in wavelengths (typically 0.5).
    pub spacing_wavelengths: f64,
}

impl PanelGeometry {
    /// Half-wavelength-spaced panel with the given layout.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            spacing_wavelengths: 0.5,
        }
    }

    pub fn num_elements(&self) -> usize {
        self.rows * self.columns
    }

    /// Array response phasor at each element for a plane wave toward
    /// `(azimuth, zenith)` in degrees.
    ///
    /// With azimuth `phi` from +x and zenith `theta` from +z, the phase at
    /// element `(y, z)` is `2*pi * (y * sin(theta) sin(phi) + z * cos(theta))`.
    pub fn steering_phasors(&self, azimuth_deg: f64, zenith_deg: f64) -> SteeringVector {
        let phi = azimuth_deg.to_radians();
        let theta = zenith_deg.to_radians();
        let uy = theta.sin() * phi.sin();
        let uz = theta.cos();
        let d = self.spacing_wavelengths;
        let mut phasors = Vec::with_capacity(self.num_elements());
        for row in 0..self.rows {
            for col in 0..self.columns {
                let phase = 2.0 * PI * d * (col as f64 * uy + row as f64 * uz);
                phasors.push(Complex::new(phase.cos(), phase.sin()));
            }
        }
        phasors
    }

    /// Matched-filter weights steering the main lobe toward the direction.
    ///
    /// Every weight has magnitude `1/sqrt(N)` so the radiated power does not
    /// depend on the steered direction.
    pub fn steering_weights(&self, azimuth_deg: f64, zenith_deg: f64) -> SteeringVector {
        let scale = 1.0 / (self.num_elements() as f64).sqrt();
        self.steering_phasors(azimuth_deg, zenith_deg)
            .into_iter()
            .map(|a| a.conj() * scale)
            .collect()
    }

    /// Flat omnidirectional weighting, magnitude `1/sqrt(N)` per element
    pub fn omni_weights(&self) -> SteeringVector {
        let scale = 1.0 / (self.num_elements() as f64).sqrt();
        vec![Complex::new(scale, 0.0); self.num_elements()]
    }

    /// Array power gain `|sum_n w_n a_n|^2` toward a direction
    pub fn array_gain(&self, weights: &[Complex], azimuth_deg: f64, zenith_deg: f64) -> f64 {
        let phasors = self.steering_phasors(azimuth_deg, zenith_deg);
        assert_eq!(
            weights.len(),
            phasors.len(),
            "weight vector length must match the number of array elements"
        );
        let response: Complex = weights
            .iter()
            .zip(phasors.iter())
            .map(|(w, a)| w * a)
            .sum();
        response.norm_sqr()
    }
}

/// Per-device beam state machine
///
/// Commanding a beam recomputes the steering weights and leaves them as the
/// device's current beam until the next command. The search engine takes
/// `&mut dyn BeamSteerer` for each endpoint, so exclusive access for the
/// duration of one selection is enforced by the borrow rather than by a lock.
pub trait BeamSteerer {
    /// Array geometry behind this steerer.
    fn geometry(&self) -> &PanelGeometry;

    /// Point the array at the given sector and elevation, returning the
    /// resulting steering weights.
    fn set_beam(&mut self, sector: u16, elevation_deg: f64) -> SteeringVector;

    /// Switch to the flat omnidirectional weighting.
    fn set_omni(&mut self) -> SteeringVector;

    /// The beam most recently committed by `set_beam` or `set_omni`.
    fn current_beam(&self) -> &BeamformingVector;
}

/// Concrete steerer mapping sector indices to azimuth by a fixed step
#[derive(Debug, Clone)]
pub struct SteeredPanel {
    geometry: PanelGeometry,
    azimuth_step_deg: f64,
    current: BeamformingVector,
}

impl SteeredPanel {
    pub fn new(geometry: PanelGeometry, azimuth_step_deg: f64) -> Self {
        Self {
            geometry,
            azimuth_step_deg,
            current: BeamformingVector::default(),
        }
    }

    pub fn azimuth_step_deg(&self) -> f64 {
        self.azimuth_step_deg
    }
}

impl BeamSteerer for SteeredPanel {
    fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    fn set_beam(&mut self, sector: u16, elevation_deg: f64) -> SteeringVector {
        let azimuth = sector as f64 * self.azimuth_step_deg;
        let weights = self.geometry.steering_weights(azimuth, elevation_deg);
        assert!(
            !weights.is_empty(),
            "steering a zero-element panel produced an empty weight vector"
        );
        self.current = BeamformingVector {
            weights: weights.clone(),
            beam: BeamId::new(sector, elevation_deg),
        };
        weights
    }

    fn set_omni(&mut self) -> SteeringVector {
        let weights = self.geometry.omni_weights();
        assert!(
            !weights.is_empty(),
            "steering a zero-element panel produced an empty weight vector"
        );
        self.current = BeamformingVector {
            weights: weights.clone(),
            beam: BeamId::OMNI,
        };
        weights
    }

    fn current_beam(&self) -> &BeamformingVector {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_element_count() {
        assert_eq!(PanelGeometry::new(8, 8).num_elements(), 64);
        assert_eq!(PanelGeometry::new(2, 4).num_elements(), 8);
    }

    #[test]
    fn test_steering_weight_magnitudes() {
        let panel = PanelGeometry::new(4, 4);
        let w = panel.steering_weights(42.0, 75.0);
        for wi in &w {
            assert_relative_eq!(wi.norm(), 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_omni_weights_are_flat() {
        let panel = PanelGeometry::new(3, 3);
        let w = panel.omni_weights();
        assert_eq!(w.len(), 9);
        for wi in &w {
            assert_relative_eq!(wi.norm(), 1.0 / 3.0, epsilon = 1e-12);
            assert_relative_eq!(wi.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_array_gain_peaks_at_look_direction() {
        let panel = PanelGeometry::new(4, 4);
        let w = panel.steering_weights(20.0, 100.0);
        let at_look = panel.array_gain(&w, 20.0, 100.0);
        assert_relative_eq!(at_look, 16.0, epsilon = 1e-9);
        // Away from the look direction the gain must not exceed the peak
        let away = panel.array_gain(&w, 60.0, 80.0);
        assert!(away < at_look);
    }

    #[test]
    #[should_panic(expected = "number of array elements")]
    fn test_array_gain_length_mismatch_panics() {
        let panel = PanelGeometry::new(2, 2);
        panel.array_gain(&[Complex::new(1.0, 0.0)], 0.0, 90.0);
    }

    #[test]
    fn test_steered_panel_tracks_current_beam() {
        let mut panel = SteeredPanel::new(PanelGeometry::new(2, 2), 30.0);
        assert!(panel.current_beam().beam.is_empty());

        let w = panel.set_beam(2, 90.0);
        assert_eq!(w.len(), 4);
        assert_eq!(panel.current_beam().beam, BeamId::new(2, 90.0));
        assert_eq!(panel.current_beam().weights, w);

        // sector 2 at a 30 degree step points 60 degrees off boresight
        let expected = panel.geometry().steering_weights(60.0, 90.0);
        assert_eq!(w, expected);

        panel.set_omni();
        assert!(panel.current_beam().beam.is_omni());
    }

    #[test]
    #[should_panic(expected = "empty weight vector")]
    fn test_zero_element_panel_panics() {
        let mut panel = SteeredPanel::new(PanelGeometry::new(0, 0), 30.0);
        panel.set_beam(0, 90.0);
    }
}
