//! Urgency model: pure scoring of time pressure plus the derived display
//! color.
//!
//! Urgency rises as the deadline approaches relative to the estimated
//! effort, and rises with importance and remaining workload. The mapping to
//! a color runs a fixed hue ramp from a calm blue to an alarm red, darkening
//! as urgency climbs. No wall clock in here; callers pass remaining hours.

/// Hue of urgency 0 (calm blue) and urgency 1 (alarm red), degrees.
const CALM_HUE: f64 = 210.0;
const ALARM_HUE: f64 = 0.0;
const SATURATION: f64 = 0.65;
/// Lightness at urgency 0; drops to `CALM_LIGHTNESS - LIGHTNESS_DROP` at 1.
const CALM_LIGHTNESS: f64 = 0.70;
const LIGHTNESS_DROP: f64 = 0.18;

/// Derived urgency in [0, 1].
///
/// Edge cases:
/// - `remaining_hours <= 0`: deadline passed or now → 1.
/// - `estimated_hours <= 0`: degenerate estimate, treated as immediate → 1.
/// - `remaining_workload <= 0`: nothing left to do → 0.
pub fn urgency(
    importance: f64,
    remaining_workload: f64,
    remaining_hours: f64,
    estimated_hours: f64,
) -> f64 {
    if remaining_workload <= 0.0 {
        return 0.0;
    }
    if remaining_hours <= 0.0 || estimated_hours <= 0.0 {
        return 1.0;
    }
    let raw = importance * (remaining_workload / 100.0) * (estimated_hours / remaining_hours);
    raw.clamp(0.0, 1.0)
}

/// Map urgency to a display hex color. Deterministic; clamps its input.
pub fn color(urgency: f64) -> String {
    let u = urgency.clamp(0.0, 1.0);
    let hue = CALM_HUE + (ALARM_HUE - CALM_HUE) * u;
    let lightness = CALM_LIGHTNESS - LIGHTNESS_DROP * u;
    hsl_to_hex(hue, SATURATION, lightness)
}

/// Standard HSL → RGB conversion, emitted as `#rrggbb`.
fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h_prime = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", to_byte(r1), to_byte(g1), to_byte(b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_stays_in_unit_range() {
        let samples = [0.0, 0.1, 0.5, 0.9, 1.0];
        for &imp in &samples {
            for &work in &[0.0, 10.0, 50.0, 100.0] {
                for &remaining in &[0.0, 0.5, 4.0, 100.0] {
                    for &estimate in &[0.0, 0.5, 2.0, 40.0] {
                        let u = urgency(imp, work, remaining, estimate);
                        assert!((0.0..=1.0).contains(&u), "urgency {u} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn zero_remaining_hours_is_maximally_urgent() {
        assert_eq!(urgency(0.1, 5.0, 0.0, 1.0), 1.0);
        assert_eq!(urgency(0.9, 80.0, -3.0, 1.0), 1.0);
    }

    #[test]
    fn degenerate_estimate_is_maximally_urgent() {
        assert_eq!(urgency(0.5, 50.0, 10.0, 0.0), 1.0);
    }

    #[test]
    fn zero_workload_is_never_urgent() {
        assert_eq!(urgency(1.0, 0.0, 5.0, 2.0), 0.0);
        // Nothing-left-to-do wins even over a passed deadline.
        assert_eq!(urgency(1.0, 0.0, 0.0, 2.0), 0.0);
    }

    #[test]
    fn urgency_grows_as_deadline_nears() {
        let far = urgency(0.8, 60.0, 48.0, 4.0);
        let near = urgency(0.8, 60.0, 6.0, 4.0);
        assert!(near > far);
    }

    #[test]
    fn color_is_deterministic_and_ramps() {
        assert_eq!(color(0.0), color(0.0));
        assert_ne!(color(0.0), color(1.0));
        // Alarm end is a red: strong R channel, hue 0.
        let alarm = color(1.0);
        let r = u8::from_str_radix(&alarm[1..3], 16).unwrap();
        let b = u8::from_str_radix(&alarm[5..7], 16).unwrap();
        assert!(r > b);
        // Calm end leans blue.
        let calm = color(0.0);
        let r = u8::from_str_radix(&calm[1..3], 16).unwrap();
        let b = u8::from_str_radix(&calm[5..7], 16).unwrap();
        assert!(b > r);
    }

    #[test]
    fn color_clamps_out_of_range_input() {
        assert_eq!(color(-0.5), color(0.0));
        assert_eq!(color(1.7), color(1.0));
    }
}
