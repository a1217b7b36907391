//! End-to-end selection over a real line-of-sight channel: two devices, one
//! channel instance, every policy driven through the link driver.

use std::sync::Arc;

use beamlink_core::channel::ChannelEvaluator;
use beamlink_core::policy::{BeamformingConfig, BeamformingMethod};
use beamlink_core::psd::SpectrumModel;
use beamlink_core::types::{BeamError, BeamId, Position};
use beamlink_sim::channel::{LosChannel, LosChannelConfig};
use beamlink_sim::device::{PhyConfig, PhyDevice};
use beamlink_sim::link::select_beams;

fn spectrum() -> SpectrumModel {
    SpectrumModel::new(100, 180.0e3, 28.0e9)
}

/// Base station at 10 m height, mobile 100 m away along +x at street level.
fn link() -> (PhyDevice, PhyDevice) {
    let channel: Arc<dyn ChannelEvaluator> =
        Arc::new(LosChannel::new(spectrum(), LosChannelConfig::default()));
    let gnb = PhyDevice::new(
        1,
        Position::new(0.0, 0.0, 10.0),
        PhyConfig::base_station(8, 8),
        spectrum(),
        Arc::clone(&channel),
    );
    let ue = PhyDevice::new(
        2,
        Position::new(100.0, 0.0, 1.5),
        PhyConfig::mobile_station(4, 4),
        spectrum(),
        channel,
    );
    (gnb, ue)
}

fn cfg(method: BeamformingMethod) -> BeamformingConfig {
    BeamformingConfig {
        method,
        ..BeamformingConfig::default()
    }
}

#[test]
fn cell_scan_picks_the_beams_facing_the_peer() {
    let (mut gnb, mut ue) = link();
    select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::CellScan)).unwrap();

    // the mobile sits along +x barely below the base station, so the beam
    // pair nearest the true bearing is sector 0 at the horizon on both ends
    assert_eq!(gnb.current_beam.beam, BeamId::new(0, 90.0));
    assert_eq!(ue.current_beam.beam, BeamId::new(0, 90.0));
    assert_eq!(gnb.current_beam.weights.len(), 64);
    assert_eq!(ue.current_beam.weights.len(), 16);
}

#[test]
fn cell_scan_delivers_the_snr_report_to_the_receiver() {
    let (mut gnb, mut ue) = link();
    select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::CellScan)).unwrap();

    let report = ue.snr_report(gnb.cell_id).expect("report for serving cell");
    assert!(report.snr > 0.0);
    assert_eq!(report.beam, ue.current_beam.beam);
    // nothing is reported back to the transmitter
    assert!(gnb.snr_report(ue.cell_id).is_none());
}

#[test]
fn snr_offset_scales_the_delivered_report() {
    let (mut gnb, mut ue) = link();
    select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::CellScan)).unwrap();
    let baseline = ue.snr_report(gnb.cell_id).unwrap().snr;

    let (mut gnb, mut ue) = link();
    let scaled_cfg = BeamformingConfig {
        ideal_snr_offset: 0.5,
        ..cfg(BeamformingMethod::CellScan)
    };
    select_beams(&mut gnb, &mut ue, &scaled_cfg).unwrap();
    let scaled = ue.snr_report(gnb.cell_id).unwrap().snr;

    assert!((scaled - baseline * 0.5).abs() <= baseline * 1e-12);
}

#[test]
fn quasi_omni_scan_leaves_the_receiver_omnidirectional() {
    let (mut gnb, mut ue) = link();
    select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::QuasiOmniCellScan)).unwrap();

    assert_eq!(gnb.current_beam.beam, BeamId::new(0, 90.0));
    assert!(ue.current_beam.beam.is_omni());
    assert!(ue.snr_report(gnb.cell_id).is_some());
}

#[test]
fn direct_path_commits_empty_beam_ids_and_no_report() {
    let (mut gnb, mut ue) = link();
    select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::DirectPath)).unwrap();

    assert!(gnb.current_beam.beam.is_empty());
    assert!(ue.current_beam.beam.is_empty());
    assert_eq!(gnb.current_beam.weights.len(), 64);
    assert!(ue.snr_report(gnb.cell_id).is_none());
}

#[test]
fn optimal_cov_matrix_propagates_not_implemented() {
    let (mut gnb, mut ue) = link();
    let result = select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::OptimalCovMatrix));
    assert!(matches!(result, Err(BeamError::NotImplemented(_))));
    // nothing was committed
    assert!(gnb.current_beam.beam.is_empty());
    assert!(gnb.current_beam.weights.is_empty());
}

#[test]
#[should_panic(expected = "different channel instances")]
fn cross_channel_pairing_aborts() {
    let (mut gnb, _) = link();
    let other_channel: Arc<dyn ChannelEvaluator> =
        Arc::new(LosChannel::new(spectrum(), LosChannelConfig::default()));
    let mut ue = PhyDevice::new(
        2,
        Position::new(100.0, 0.0, 1.5),
        PhyConfig::mobile_station(4, 4),
        spectrum(),
        other_channel,
    );
    let _ = select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::CellScan));
}

#[test]
#[should_panic(expected = "same position")]
fn coincident_endpoints_abort() {
    let (mut gnb, mut ue) = link();
    ue.position = gnb.position;
    let _ = select_beams(&mut gnb, &mut ue, &cfg(BeamformingMethod::CellScan));
}
