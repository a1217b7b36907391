//! Power spectral density construction
//!
//! Builds the transmit and noise power spectral densities the search engine
//! evaluates candidate beams against. A [`Psd`] holds one density value per
//! spectral band in W/Hz; the band layout comes from a [`SpectrumModel`].

use serde::{Deserialize, Serialize};

/// Boltzmann constant in J/K
const BOLTZMANN: f64 = 1.380_649e-23;

/// Reference noise temperature in K
const T0_KELVIN: f64 = 290.0;

/// Speed of light in m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Spectral layout of one component carrier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumModel {
    /// Number of spectral bands.
    pub num_bands: usize,
    /// Width of each band in Hz.
    pub band_width_hz: f64,
    /// Carrier centre frequency in Hz.
    pub center_frequency_hz: f64,
}

impl SpectrumModel {
    pub fn new(num_bands: usize, band_width_hz: f64, center_frequency_hz: f64) -> Self {
        Self {
            num_bands,
            band_width_hz,
            center_frequency_hz,
        }
    }

    /// Total occupied bandwidth in Hz
    pub fn bandwidth_hz(&self) -> f64 {
        self.num_bands as f64 * self.band_width_hz
    }

    /// Carrier wavelength in metres
    pub fn wavelength_m(&self) -> f64 {
        SPEED_OF_LIGHT / self.center_frequency_hz
    }
}

/// Per-band power spectral density in W/Hz
#[derive(Debug, Clone, PartialEq)]
pub struct Psd {
    values: Vec<f64>,
}

impl Psd {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Density values per band, W/Hz
    pub fn bands(&self) -> &[f64] {
        &self.values
    }

    /// A copy of this PSD with every band scaled by a linear gain
    pub fn scaled(&self, gain: f64) -> Psd {
        Psd::new(self.values.iter().map(|v| v * gain).collect())
    }
}

/// Spread the given total radiated power uniformly across every band.
pub fn tx_power_spectral_density(power_dbm: f64, model: &SpectrumModel) -> Psd {
    let power_w = 10.0_f64.powf((power_dbm - 30.0) / 10.0);
    let density = power_w / model.bandwidth_hz();
    Psd::new(vec![density; model.num_bands])
}

/// Thermal noise floor `kT0` raised by the receiver noise figure.
pub fn noise_power_spectral_density(noise_figure_db: f64, model: &SpectrumModel) -> Psd {
    let noise_factor = 10.0_f64.powf(noise_figure_db / 10.0);
    Psd::new(vec![BOLTZMANN * T0_KELVIN * noise_factor; model.num_bands])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> SpectrumModel {
        SpectrumModel::new(4, 1.0e6, 28.0e9)
    }

    #[test]
    fn test_tx_psd_recovers_total_power() {
        // 30 dBm = 1 W spread over 4 MHz
        let psd = tx_power_spectral_density(30.0, &model());
        assert_eq!(psd.bands().len(), 4);
        for &v in psd.bands() {
            assert_relative_eq!(v, 2.5e-7, epsilon = 1e-18);
        }
        let total: f64 = psd.bands().iter().map(|v| v * 1.0e6).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_noise_psd_is_kt0_at_zero_noise_figure() {
        let psd = noise_power_spectral_density(0.0, &model());
        for &v in psd.bands() {
            assert_relative_eq!(v, 4.003_882_1e-21, epsilon = 1e-26);
        }
    }

    #[test]
    fn test_noise_psd_scales_with_noise_figure() {
        let floor = noise_power_spectral_density(0.0, &model());
        let raised = noise_power_spectral_density(10.0, &model());
        assert_relative_eq!(raised.bands()[0], floor.bands()[0] * 10.0, epsilon = 1e-30);
    }

    #[test]
    fn test_wavelength() {
        assert_relative_eq!(model().wavelength_m(), 0.010_706_873_5, epsilon = 1e-9);
    }

    #[test]
    fn test_scaled() {
        let psd = Psd::new(vec![1.0, 2.0]);
        assert_eq!(psd.scaled(0.5).bands(), &[0.5, 1.0]);
    }
}
