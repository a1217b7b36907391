//! Closed-form direct-path beamforming
//!
//! Points each array straight at the geometric bearing toward the other
//! endpoint, with no search and no channel evaluation. These are pure
//! functions: identical inputs produce bit-identical steering vectors.
//!
//! Directional results carry [`BeamId::EMPTY`] because no grid cell was
//! selected; the quasi-omni variants replace one side with the flat
//! omnidirectional weighting tagged [`BeamId::OMNI`].

use crate::panel::PanelGeometry;
use crate::types::{BeamId, BeamformingVector, Position};

/// Point both arrays along the geometric bearing toward each other.
pub fn direct_path(
    tx_position: Position,
    rx_position: Position,
    tx_panel: &PanelGeometry,
    rx_panel: &PanelGeometry,
) -> (BeamformingVector, BeamformingVector) {
    assert!(
        tx_position.distance_to(&rx_position) > 0.0,
        "direct-path beamforming requires distinct endpoint positions"
    );
    let (tx_azimuth, tx_zenith) = tx_position.bearing_to(&rx_position);
    let (rx_azimuth, rx_zenith) = rx_position.bearing_to(&tx_position);
    (
        BeamformingVector {
            weights: tx_panel.steering_weights(tx_azimuth, tx_zenith),
            beam: BeamId::EMPTY,
        },
        BeamformingVector {
            weights: rx_panel.steering_weights(rx_azimuth, rx_zenith),
            beam: BeamId::EMPTY,
        },
    )
}

/// Omnidirectional transmit weighting, direct-path receive.
pub fn quasi_omni_direct_path(
    tx_position: Position,
    rx_position: Position,
    tx_panel: &PanelGeometry,
    rx_panel: &PanelGeometry,
) -> (BeamformingVector, BeamformingVector) {
    let (_, rx) = direct_path(tx_position, rx_position, tx_panel, rx_panel);
    (
        BeamformingVector {
            weights: tx_panel.omni_weights(),
            beam: BeamId::OMNI,
        },
        rx,
    )
}

/// Direct-path transmit, omnidirectional receive weighting.
pub fn direct_path_quasi_omni(
    tx_position: Position,
    rx_position: Position,
    tx_panel: &PanelGeometry,
    rx_panel: &PanelGeometry,
) -> (BeamformingVector, BeamformingVector) {
    let (tx, _) = direct_path(tx_position, rx_position, tx_panel, rx_panel);
    (
        tx,
        BeamformingVector {
            weights: rx_panel.omni_weights(),
            beam: BeamId::OMNI,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn endpoints() -> (Position, Position) {
        (Position::new(0.0, 0.0, 10.0), Position::new(80.0, 60.0, 1.5))
    }

    #[test]
    fn test_direct_path_is_deterministic() {
        let (tx_pos, rx_pos) = endpoints();
        let tx_panel = PanelGeometry::new(8, 8);
        let rx_panel = PanelGeometry::new(4, 4);
        let first = direct_path(tx_pos, rx_pos, &tx_panel, &rx_panel);
        let second = direct_path(tx_pos, rx_pos, &tx_panel, &rx_panel);
        assert_eq!(first, second);
    }

    #[test]
    fn test_direct_path_tags_and_lengths() {
        let (tx_pos, rx_pos) = endpoints();
        let (tx, rx) = direct_path(tx_pos, rx_pos, &PanelGeometry::new(8, 8), &PanelGeometry::new(4, 4));
        assert!(tx.beam.is_empty());
        assert!(rx.beam.is_empty());
        assert_eq!(tx.weights.len(), 64);
        assert_eq!(rx.weights.len(), 16);
    }

    #[test]
    fn test_direct_path_points_at_peer() {
        let (tx_pos, rx_pos) = endpoints();
        let panel = PanelGeometry::new(8, 8);
        let (tx, _) = direct_path(tx_pos, rx_pos, &panel, &panel);
        let (azimuth, zenith) = tx_pos.bearing_to(&rx_pos);
        let gain = panel.array_gain(&tx.weights, azimuth, zenith);
        assert_relative_eq!(gain, 64.0, epsilon = 1e-9);
    }

    #[test]
    #[should_panic(expected = "distinct endpoint positions")]
    fn test_coincident_positions_panic() {
        let p = Position::new(1.0, 1.0, 1.0);
        let panel = PanelGeometry::new(4, 4);
        direct_path(p, p, &panel, &panel);
    }

    #[test]
    fn test_quasi_omni_direct_path_structure() {
        let (tx_pos, rx_pos) = endpoints();
        let panel = PanelGeometry::new(4, 4);
        let (tx, rx) = quasi_omni_direct_path(tx_pos, rx_pos, &panel, &panel);
        assert!(tx.beam.is_omni());
        assert!(rx.beam.is_empty());
        // omni side is a flat weighting
        for w in &tx.weights {
            assert_relative_eq!(w.norm(), 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_direct_path_quasi_omni_is_the_mirror() {
        let (tx_pos, rx_pos) = endpoints();
        let panel = PanelGeometry::new(4, 4);
        let (tx, rx) = direct_path_quasi_omni(tx_pos, rx_pos, &panel, &panel);
        assert!(tx.beam.is_empty());
        assert!(rx.beam.is_omni());
        for w in &rx.weights {
            assert_relative_eq!(w.norm(), 0.25, epsilon = 1e-12);
        }
    }
}
