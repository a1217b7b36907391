//! Exhaustive cell-scan beam selection
//!
//! The cell scan walks every (sector, elevation) combination on both link
//! ends, commands the endpoint steerers to each candidate pair, evaluates
//! the channel, and keeps the pair with the highest band-averaged received
//! power. Candidates that tie the running maximum within exact
//! floating-point equality are collected and, when the channel knows the
//! true path geometry, resolved by a 4-D angular distance to the geometric
//! bearing.
//!
//! The quasi-omni variant fixes the receive end to an omnidirectional beam
//! and searches the transmit side only, keeping the first-seen maximum with
//! no tie handling.
//!
//! Both scans mutate the endpoints' beam state as a side effect of probing;
//! taking `&mut dyn BeamSteerer` per endpoint gives one selection exclusive
//! use of that state for the whole call.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::channel::{ChannelEvaluator, LinkEnd};
use crate::grid::SearchGrid;
use crate::panel::BeamSteerer;
use crate::policy::BeamformingConfig;
use crate::psd::{noise_power_spectral_density, tx_power_spectral_density, Psd, SpectrumModel};
use crate::types::{BeamId, BeamformingVector, Position, SteeringVector};

/// Reference transmit power used for probing, dBm (1 W total)
const REFERENCE_TX_POWER_DBM: f64 = 30.0;

/// Degenerate near-zero power floor.
///
/// Tie-break refinement is suppressed when the running maximum sits exactly
/// on this value. The intent of the original constant is unconfirmed, so it
/// is kept bit-exact rather than folded into a tolerance.
const DEGENERATE_POWER_FLOOR: f64 = 1.000_000_000_000_002_6e-22;

/// Transmit elevation row sampled into the per-sector SNR trace
const DIAGNOSTIC_ELEVATION_DEG: f64 = 105.0;

/// Elevation span of the quasi-omni transmit-side scan, degrees.
/// The upper bound is exclusive.
const QUASI_OMNI_ELEVATION_MIN_DEG: f64 = 60.0;
const QUASI_OMNI_ELEVATION_MAX_DEG: f64 = 120.0;

/// One endpoint of a beamforming request
pub struct Endpoint<'a> {
    pub position: Position,
    pub steerer: &'a mut dyn BeamSteerer,
}

/// Spectral layout and receiver noise figure for one component carrier
#[derive(Debug, Clone, Copy)]
pub struct LinkBudget {
    pub spectrum: SpectrumModel,
    pub noise_figure_db: f64,
}

/// Outcome of one beam selection
#[derive(Debug, Clone)]
pub struct BeamSelection {
    pub tx: BeamformingVector,
    pub rx: BeamformingVector,
    /// Estimated link SNR, scaled by the configured offset. `None` for the
    /// closed-form policies, which never evaluate the channel.
    pub snr: Option<f64>,
    /// Per-transmit-sector SNR samples taken on the 105 degree elevation
    /// row. Diagnostic only, never consulted during selection.
    pub sector_snr_trace: BTreeMap<u16, Vec<f64>>,
}

/// A candidate tied with the running maximum power
#[derive(Debug, Clone, Copy, PartialEq)]
struct TieCandidate {
    tx_sector: u16,
    tx_theta_deg: f64,
    rx_sector: u16,
    rx_theta_deg: f64,
}

/// Running best candidate over a scan
#[derive(Debug, Clone, Default)]
struct BestRecord {
    power: f64,
    snr_avg: f64,
    tx_sector: u16,
    tx_theta_deg: f64,
    rx_sector: u16,
    rx_theta_deg: f64,
    tx_weights: SteeringVector,
    rx_weights: SteeringVector,
}

/// Mean over bands of the per-band ratio between two PSDs
fn mean_band_ratio(numerator: &Psd, denominator: &Psd) -> f64 {
    let n = numerator.bands().len() as f64;
    numerator
        .bands()
        .iter()
        .zip(denominator.bands().iter())
        .map(|(a, b)| a / b)
        .sum::<f64>()
        / n
}

/// Exhaustive double grid scan with geometric tie-break refinement.
///
/// Evaluates every transmit (sector, elevation) against every receive
/// (sector, elevation), both ranges endpoint-inclusive, and returns the
/// pair maximising band-averaged received power.
pub fn cell_scan(
    tx: Endpoint<'_>,
    rx: Endpoint<'_>,
    grid: &SearchGrid,
    channel: &dyn ChannelEvaluator,
    budget: &LinkBudget,
    cfg: &BeamformingConfig,
) -> BeamSelection {
    assert!(
        tx.position.distance_to(&rx.position) > 0.0,
        "beam selection requires distinct endpoint positions"
    );

    let ref_psd = tx_power_spectral_density(REFERENCE_TX_POWER_DBM, &budget.spectrum);
    let noise_psd = noise_power_spectral_density(budget.noise_figure_db, &budget.spectrum);
    let tx_panel = *tx.steerer.geometry();
    let rx_panel = *rx.steerer.geometry();

    let mut best = BestRecord::default();
    let mut ties: Vec<TieCandidate> = Vec::new();
    let mut max_tie_power = 0.0_f64;
    let mut sector_snr_trace: BTreeMap<u16, Vec<f64>> = BTreeMap::new();

    let mut tx_theta = grid.tx.elevation_min_deg;
    while tx_theta <= grid.tx.elevation_max_deg {
        for tx_sector in 0..=grid.tx.sectors {
            let tx_weights = tx.steerer.set_beam(tx_sector, tx_theta);
            assert!(
                !tx_weights.is_empty(),
                "transmit steerer returned an empty weight vector"
            );

            let mut rx_theta = grid.rx.elevation_min_deg;
            while rx_theta <= grid.rx.elevation_max_deg {
                for rx_sector in 0..=grid.rx.sectors {
                    let rx_weights = rx.steerer.set_beam(rx_sector, rx_theta);
                    assert!(
                        !rx_weights.is_empty(),
                        "receive steerer returned an empty weight vector"
                    );

                    let rx_psd = channel.rx_power_spectral_density(
                        &ref_psd,
                        &LinkEnd {
                            position: tx.position,
                            weights: &tx_weights,
                            panel: tx_panel,
                        },
                        &LinkEnd {
                            position: rx.position,
                            weights: &rx_weights,
                            panel: rx_panel,
                        },
                    );
                    let power = mean_band_ratio(&rx_psd, &ref_psd);
                    let snr_avg = mean_band_ratio(&rx_psd, &noise_psd);
                    trace!(tx_sector, tx_theta, rx_sector, rx_theta, power, "cell probed");

                    if tx_theta == DIAGNOSTIC_ELEVATION_DEG {
                        sector_snr_trace
                            .entry(tx_sector)
                            .or_default()
                            .push(snr_avg);
                    }

                    if power > best.power {
                        best = BestRecord {
                            power,
                            snr_avg,
                            tx_sector,
                            tx_theta_deg: tx_theta,
                            rx_sector,
                            rx_theta_deg: rx_theta,
                            tx_weights: tx_weights.clone(),
                            rx_weights: rx_weights.clone(),
                        };
                    } else if power == best.power {
                        // exact equality on purpose: ties at the running
                        // maximum are resolved by the refinement below
                        if power > max_tie_power {
                            ties.clear();
                            max_tie_power = power;
                        }
                        ties.push(TieCandidate {
                            tx_sector,
                            tx_theta_deg: tx_theta,
                            rx_sector,
                            rx_theta_deg: rx_theta,
                        });
                    }
                }
                rx_theta += grid.rx.elevation_step_deg;
            }
        }
        tx_theta += grid.tx.elevation_step_deg;
    }

    assert!(
        !best.tx_weights.is_empty() && !best.rx_weights.is_empty(),
        "cell scan found no candidate with positive received power"
    );

    let refine = !ties.is_empty()
        && best.power == max_tie_power
        && best.power != DEGENERATE_POWER_FLOOR;
    if refine {
        if let Some(bearing) = channel.path_bearing(tx.position, rx.position) {
            let mut candidates = ties;
            candidates.push(TieCandidate {
                tx_sector: best.tx_sector,
                tx_theta_deg: best.tx_theta_deg,
                rx_sector: best.rx_sector,
                rx_theta_deg: best.rx_theta_deg,
            });

            // the true bearing expressed in sector/elevation grid units
            let target_tx_sector = bearing.departure_azimuth_deg / grid.tx.azimuth_step_deg;
            let target_rx_sector = bearing.arrival_azimuth_deg / grid.rx.azimuth_step_deg;

            let mut chosen = candidates[0];
            let mut min_distance = f64::INFINITY;
            for candidate in &candidates {
                let d_tx_az = (candidate.tx_sector as f64 - target_tx_sector).abs();
                let d_tx_el = (candidate.tx_theta_deg - bearing.departure_zenith_deg).abs();
                let d_rx_az = (candidate.rx_sector as f64 - target_rx_sector).abs();
                let d_rx_el = (candidate.rx_theta_deg - bearing.arrival_zenith_deg).abs();
                let distance =
                    (d_tx_az * d_tx_az + d_tx_el * d_tx_el + d_rx_az * d_rx_az + d_rx_el * d_rx_el)
                        .sqrt();
                if distance < min_distance {
                    min_distance = distance;
                    chosen = *candidate;
                }
            }

            best.tx_sector = chosen.tx_sector;
            best.tx_theta_deg = chosen.tx_theta_deg;
            best.rx_sector = chosen.rx_sector;
            best.rx_theta_deg = chosen.rx_theta_deg;
            // re-command both ends so the returned weights match the finally
            // chosen angles, not the transient state they were probed under
            best.tx_weights = tx.steerer.set_beam(chosen.tx_sector, chosen.tx_theta_deg);
            best.rx_weights = rx.steerer.set_beam(chosen.rx_sector, chosen.rx_theta_deg);
        }
    }

    debug!(
        tx_sector = best.tx_sector,
        tx_theta = best.tx_theta_deg,
        rx_sector = best.rx_sector,
        rx_theta = best.rx_theta_deg,
        snr = best.snr_avg,
        "cell scan selected beam pair"
    );

    BeamSelection {
        tx: BeamformingVector {
            weights: best.tx_weights,
            beam: BeamId::new(best.tx_sector, best.tx_theta_deg),
        },
        rx: BeamformingVector {
            weights: best.rx_weights,
            beam: BeamId::new(best.rx_sector, best.rx_theta_deg),
        },
        snr: Some(best.snr_avg * cfg.ideal_snr_offset),
        sector_snr_trace,
    }
}

/// Transmit-side scan against a fixed omnidirectional receive beam.
///
/// The receive end is commanded omni once before any probing. The transmit
/// elevation runs over `[60, 120)` degrees stepped by the configured angle
/// step, and only the strict first-seen maximum is kept.
pub fn quasi_omni_scan(
    tx: Endpoint<'_>,
    rx: Endpoint<'_>,
    grid: &SearchGrid,
    channel: &dyn ChannelEvaluator,
    budget: &LinkBudget,
    cfg: &BeamformingConfig,
) -> BeamSelection {
    assert!(
        tx.position.distance_to(&rx.position) > 0.0,
        "beam selection requires distinct endpoint positions"
    );

    let ref_psd = tx_power_spectral_density(REFERENCE_TX_POWER_DBM, &budget.spectrum);
    let noise_psd = noise_power_spectral_density(budget.noise_figure_db, &budget.spectrum);
    let tx_panel = *tx.steerer.geometry();
    let rx_panel = *rx.steerer.geometry();

    let rx_weights = rx.steerer.set_omni();
    assert!(
        !rx_weights.is_empty(),
        "receive steerer returned an empty weight vector"
    );

    let mut best = BestRecord::default();
    let mut tx_theta = QUASI_OMNI_ELEVATION_MIN_DEG;
    while tx_theta < QUASI_OMNI_ELEVATION_MAX_DEG {
        for tx_sector in 0..=grid.tx.sectors {
            let tx_weights = tx.steerer.set_beam(tx_sector, tx_theta);
            assert!(
                !tx_weights.is_empty(),
                "transmit steerer returned an empty weight vector"
            );

            let rx_psd = channel.rx_power_spectral_density(
                &ref_psd,
                &LinkEnd {
                    position: tx.position,
                    weights: &tx_weights,
                    panel: tx_panel,
                },
                &LinkEnd {
                    position: rx.position,
                    weights: &rx_weights,
                    panel: rx_panel,
                },
            );
            let power = mean_band_ratio(&rx_psd, &ref_psd);
            let snr_avg = mean_band_ratio(&rx_psd, &noise_psd);
            trace!(tx_sector, tx_theta, power, "cell probed");

            if power > best.power {
                best = BestRecord {
                    power,
                    snr_avg,
                    tx_sector,
                    tx_theta_deg: tx_theta,
                    rx_sector: 0,
                    rx_theta_deg: 0.0,
                    tx_weights: tx_weights.clone(),
                    rx_weights: rx_weights.clone(),
                };
            }
        }
        tx_theta += cfg.beam_search_angle_step_deg;
    }

    assert!(
        !best.tx_weights.is_empty(),
        "quasi-omni scan found no candidate with positive received power"
    );

    debug!(
        tx_sector = best.tx_sector,
        tx_theta = best.tx_theta_deg,
        snr = best.snr_avg,
        "quasi-omni scan selected transmit beam"
    );

    BeamSelection {
        tx: BeamformingVector {
            weights: best.tx_weights,
            beam: BeamId::new(best.tx_sector, best.tx_theta_deg),
        },
        rx: BeamformingVector {
            weights: best.rx_weights,
            beam: BeamId::OMNI,
        },
        snr: Some(best.snr_avg * cfg.ideal_snr_offset),
        sector_snr_trace: BTreeMap::new(),
    }
}
