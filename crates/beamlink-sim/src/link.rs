//! Link-level beam-selection driver
//!
//! Checks the experiment preconditions, derives the search grid from the
//! transmit device's antenna profile, runs the configured policy, and
//! commits the outcome into device state. A malformed experiment aborts
//! here rather than producing silently wrong physical results.

use std::sync::Arc;

use beamlink_core::grid::SearchGrid;
use beamlink_core::policy::{self, BeamformingConfig};
use beamlink_core::search::{Endpoint, LinkBudget};
use beamlink_core::types::BeamResult;
use tracing::debug;

use crate::device::PhyDevice;

/// Run one beam selection between a transmit and a receive device.
///
/// Mutable access to both devices gives the selection exclusive use of
/// their beam state for the whole call; no other computation can observe a
/// device mid-search.
pub fn select_beams(
    tx: &mut PhyDevice,
    rx: &mut PhyDevice,
    cfg: &BeamformingConfig,
) -> BeamResult<()> {
    assert!(
        tx.position.distance_to(&rx.position) > 0.0,
        "endpoints must not occupy the same position"
    );
    assert!(
        Arc::as_ptr(tx.channel()) as *const () == Arc::as_ptr(rx.channel()) as *const (),
        "endpoints are attached to different channel instances"
    );

    let grid = SearchGrid::derive(
        tx.config().profile,
        tx.config().rows,
        rx.config().rows,
        tx.config().vertical_step_deg,
        rx.config().vertical_step_deg,
    );
    let budget = LinkBudget {
        spectrum: tx.spectrum,
        noise_figure_db: rx.config().noise_figure_db,
    };
    let channel = Arc::clone(tx.channel());

    let selection = policy::select(
        cfg,
        Endpoint {
            position: tx.position,
            steerer: &mut tx.panel,
        },
        Endpoint {
            position: rx.position,
            steerer: &mut rx.panel,
        },
        &grid,
        channel.as_ref(),
        &budget,
    )?;

    debug!(
        tx_cell = tx.cell_id,
        rx_cell = rx.cell_id,
        tx_beam = ?selection.tx.beam,
        rx_beam = ?selection.rx.beam,
        snr = selection.snr,
        "beam selection committed"
    );

    if let Some(snr) = selection.snr {
        rx.record_snr(tx.cell_id, snr, selection.rx.beam);
    }
    tx.current_beam = selection.tx;
    rx.current_beam = selection.rx;
    Ok(())
}
