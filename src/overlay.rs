//! Debug readout shown over the canvas

use crate::sim::{MotionTelemetry, OrientationSample};

/// Overlay text for the latest sensor state
///
/// The displacement line is only present when motion telemetry is on.
pub fn readout(orientation: &OrientationSample, motion: Option<&MotionTelemetry>) -> String {
    let mut text = format!(
        "alpha: {:.1}  beta: {:.1}  gamma: {:.1}",
        orientation.alpha, orientation.beta, orientation.gamma
    );
    if let Some(m) = motion {
        text.push_str(&format!("\nx: {:.3} m  z: {:.3} m", m.x, m.z));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_only() {
        let sample = OrientationSample {
            alpha: 12.345,
            beta: 90.0,
            gamma: -3.06,
        };
        assert_eq!(
            readout(&sample, None),
            "alpha: 12.3  beta: 90.0  gamma: -3.1"
        );
    }

    #[test]
    fn test_with_displacement() {
        let mut motion = MotionTelemetry::default();
        motion.sample(0.0, Some(1.0), Some(0.0));
        motion.sample(100.0, Some(1.0), Some(0.0));
        let text = readout(&OrientationSample::default(), Some(&motion));
        assert!(text.ends_with("\nx: 0.010 m  z: 0.000 m"), "{text}");
    }
}
