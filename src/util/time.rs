// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time display and identifier helpers.

use rand::Rng;

/// Format elapsed seconds as `MM:SS.ff`.
///
/// The fractional part is truncated, not rounded, so hundredths never carry
/// into the seconds field. Zero, negative and non-finite input render as
/// `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }

    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let hundredths = ((seconds % 1.0) * 100.0).floor() as u64;

    format!("{:02}:{:02}.{:02}", minutes, secs, hundredths)
}

/// Generate a short random identifier.
///
/// Only unique enough for list keys within one session.
pub fn generate_id() -> String {
    let random: u64 = rand::thread_rng().gen();
    format!("{:09x}", random & 0xF_FFFF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_zero_and_invalid() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
        assert_eq!(format_time(-3.0), "00:00");
    }

    #[test]
    fn test_format_time_fields() {
        assert_eq!(format_time(65.5), "01:05.50");
        assert_eq!(format_time(600.25), "10:00.25");
        assert_eq!(format_time(3.0), "00:03.00");
    }

    #[test]
    fn test_format_time_truncates_fraction() {
        assert_eq!(format_time(59.999), "00:59.99");
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), 9);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_id(), generate_id());
    }
}
