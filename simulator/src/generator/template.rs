use crate::generator::profile::{SweepProfile, TargetSpec};

/// Names accepted by [`template`].
pub const TEMPLATE_NAMES: &[&str] = &["default", "empty", "wall", "corridor", "far"];

/// Built-in scenes for the emulated sensor.
pub fn template(name: &str) -> Option<SweepProfile> {
    let targets = match name {
        "default" => return Some(SweepProfile::default()),
        "empty" => Vec::new(),
        "wall" => vec![TargetSpec {
            from_angle: -90,
            to_angle: 90,
            distance_cm: 40,
        }],
        "corridor" => vec![
            TargetSpec {
                from_angle: -90,
                to_angle: -45,
                distance_cm: 15,
            },
            TargetSpec {
                from_angle: 45,
                to_angle: 90,
                distance_cm: 15,
            },
        ],
        // beyond the default 50 cm display range
        "far" => vec![TargetSpec {
            from_angle: -20,
            to_angle: 20,
            distance_cm: 180,
        }],
        _ => return None,
    };
    Some(SweepProfile {
        targets,
        description: Some(name.to_string()),
        ..Default::default()
    })
}
