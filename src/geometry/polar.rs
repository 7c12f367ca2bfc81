use eframe::egui::{Pos2, pos2};

pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Angles are in degrees, 0° at the top of the circle, increasing clockwise
/// in screen space (y grows downward).
pub fn polar_to_cartesian(center: Pos2, radius: f32, angle_degrees: f32) -> Pos2 {
    let radians = angle_degrees.to_radians();
    pos2(
        center.x + radius * radians.sin(),
        center.y - radius * radians.cos(),
    )
}

/// Inverse of [`polar_to_cartesian`]. Returns `(radius, angle)` with the angle
/// in `[0, 360)`. The center itself maps to `(0, 0)`.
pub fn cartesian_to_polar(center: Pos2, point: Pos2) -> (f32, f32) {
    let dx = point.x - center.x;
    let dy = center.y - point.y;
    let radius = dx.hypot(dy);
    if radius <= f32::EPSILON {
        return (0.0, 0.0);
    }

    (radius, normalize_degrees(dx.atan2(dy).to_degrees()))
}

pub fn angular_distance(a: f32, b: f32) -> f32 {
    let delta = normalize_degrees(a - b);
    delta.min(360.0 - delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-3;

    #[test]
    fn zero_degrees_is_top_and_ninety_is_right() {
        let center = pos2(100.0, 100.0);

        let top = polar_to_cartesian(center, 10.0, 0.0);
        assert!((top.x - 100.0).abs() < TOLERANCE);
        assert!((top.y - 90.0).abs() < TOLERANCE);

        let right = polar_to_cartesian(center, 10.0, 90.0);
        assert!((right.x - 110.0).abs() < TOLERANCE);
        assert!((right.y - 100.0).abs() < TOLERANCE);

        let bottom = polar_to_cartesian(center, 10.0, 180.0);
        assert!((bottom.y - 110.0).abs() < TOLERANCE);

        let left = polar_to_cartesian(center, 10.0, 270.0);
        assert!((left.x - 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn round_trip_recovers_radius_and_wrapped_angle() {
        let center = pos2(-40.0, 250.0);
        let radii = [0.5_f32, 1.0, 37.0, 150.0, 900.0];
        let mut angle = -720.0_f32;

        while angle <= 720.0 {
            for radius in radii {
                let point = polar_to_cartesian(center, radius, angle);
                let (back_radius, back_angle) = cartesian_to_polar(center, point);

                assert!(
                    (back_radius - radius).abs() < radius * 1e-4 + TOLERANCE,
                    "radius {radius} angle {angle}: got {back_radius}"
                );
                let expected = normalize_degrees(angle);
                assert!(
                    angular_distance(back_angle, expected) < 0.01,
                    "radius {radius} angle {angle}: got {back_angle}, expected {expected}"
                );
                assert!((0.0..360.0).contains(&back_angle));
            }
            angle += 13.7;
        }
    }

    #[test]
    fn center_point_has_zero_radius() {
        let center = pos2(5.0, 5.0);
        assert_eq!(cartesian_to_polar(center, center), (0.0, 0.0));
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn angular_distance_crosses_zero() {
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < TOLERANCE);
        assert!((angular_distance(10.0, 350.0) - 20.0).abs() < TOLERANCE);
    }
}
