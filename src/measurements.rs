//! Measurement values as the submission wants them.
//!
//! Nothing here is measured. The caller supplies the numbers; this module
//! validates them, clamps throughput to what the service accepts, and
//! derives the kbps strings that feed both the payload and its signature.

use crate::errors::SubmitError;

/// Upper bound the result service accepts for either direction, in Mbps.
pub const MAX_THROUGHPUT_MBPS: f64 = 9999.0;

/// Validated measurement inputs, immutable once captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Upload throughput as a kbps decimal string.
    pub upload_kbps: String,
    /// Download throughput as a kbps decimal string.
    pub download_kbps: String,
    /// Loaded latency during upload, in milliseconds, passed through verbatim.
    pub upload_latency: String,
    /// Loaded latency during download, in milliseconds, passed through verbatim.
    pub download_latency: String,
    /// Idle latency in milliseconds, passed through verbatim.
    pub idle_latency: String,
    /// Identifier of the server the result claims to have used.
    pub server_id: i64,
    /// Secret the signature scheme mixes in.
    pub api_key: String,
}

impl Measurement {
    /// Validate raw inputs and derive the wire-format throughput strings.
    ///
    /// Throughput values above [`MAX_THROUGHPUT_MBPS`] are clamped silently,
    /// matching the service's own cap. Latency strings are only checked for
    /// being sane millisecond values; the original text is what ends up in
    /// the payload.
    pub fn new(
        upload_mbps: &str,
        download_mbps: &str,
        upload_latency: &str,
        download_latency: &str,
        idle_latency: &str,
        server_id: i64,
        api_key: &str,
    ) -> Result<Self, SubmitError> {
        let upload = parse_throughput("upload", upload_mbps)?;
        let download = parse_throughput("download", download_mbps)?;

        validate_latency("upload latency", upload_latency)?;
        validate_latency("download latency", download_latency)?;
        validate_latency("idle latency", idle_latency)?;

        Ok(Self {
            upload_kbps: format_kbps(upload * 1000.0),
            download_kbps: format_kbps(download * 1000.0),
            upload_latency: upload_latency.to_string(),
            download_latency: download_latency.to_string(),
            idle_latency: idle_latency.to_string(),
            server_id,
            api_key: api_key.to_string(),
        })
    }
}

fn parse_throughput(name: &str, value: &str) -> Result<f64, SubmitError> {
    let mbps: f64 = value.trim().parse().map_err(|_| {
        SubmitError::input(format!("{} speed {:?} is not a number", name, value))
            .with_suggestion("Pass a decimal Mbps value, e.g. 100 or 93.7.")
    })?;

    if !mbps.is_finite() || mbps < 0.0 {
        return Err(SubmitError::input(format!(
            "{} speed must be a non-negative finite number, got {:?}",
            name, value
        )));
    }

    Ok(mbps.min(MAX_THROUGHPUT_MBPS))
}

fn validate_latency(name: &str, value: &str) -> Result<(), SubmitError> {
    let ms: f64 = value.trim().parse().map_err(|_| {
        SubmitError::input(format!("{} {:?} is not a number", name, value))
            .with_suggestion("Pass a millisecond value, e.g. 12 or 8.5.")
    })?;

    if !ms.is_finite() || ms < 0.0 {
        return Err(SubmitError::input(format!(
            "{} must be a non-negative finite number, got {:?}",
            name, value
        )));
    }

    Ok(())
}

/// Render a kbps value the way the service's own client does.
///
/// The signature is recomputed server-side from this exact text, so the
/// rule is pinned: shortest round-trip decimal, at least one fractional
/// digit, never exponent notation. `50000` renders as `"50000.0"`.
fn format_kbps(kbps: f64) -> String {
    if kbps.fract() == 0.0 {
        format!("{:.1}", kbps)
    } else {
        kbps.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use proptest::prelude::*;

    fn measurement(upload: &str, download: &str) -> Result<Measurement, SubmitError> {
        Measurement::new(upload, download, "6", "10", "8", 27961, "key")
    }

    #[test]
    fn test_throughput_scaled_to_kbps_strings() {
        let m = measurement("50.0", "100").unwrap();

        assert_eq!(m.upload_kbps, "50000.0");
        assert_eq!(m.download_kbps, "100000.0");
    }

    #[test]
    fn test_throughput_clamped_to_service_cap() {
        let m = measurement("10000", "99999.5").unwrap();

        assert_eq!(m.upload_kbps, "9999000.0");
        assert_eq!(m.download_kbps, "9999000.0");
    }

    #[test]
    fn test_throughput_at_cap_passes_through() {
        let m = measurement("9999", "9998.5").unwrap();

        assert_eq!(m.upload_kbps, "9999000.0");
        assert_eq!(m.download_kbps, "9998500.0");
    }

    #[test]
    fn test_latency_strings_pass_through_verbatim() {
        let m = Measurement::new("10", "20", "6.5", "12", "8", 27961, "key")
            .unwrap();

        assert_eq!(m.upload_latency, "6.5");
        assert_eq!(m.download_latency, "12");
        assert_eq!(m.idle_latency, "8");
    }

    #[test]
    fn test_non_numeric_throughput_is_input_error() {
        let error = measurement("fast", "100").unwrap_err();

        assert_eq!(error.kind, ErrorKind::Input);
        assert!(error.message.contains("upload"));
    }

    #[test]
    fn test_negative_throughput_is_input_error() {
        let error = measurement("-1", "100").unwrap_err();

        assert_eq!(error.kind, ErrorKind::Input);
    }

    #[test]
    fn test_nan_throughput_is_input_error() {
        let error = measurement("NaN", "100").unwrap_err();

        assert_eq!(error.kind, ErrorKind::Input);
    }

    #[test]
    fn test_non_numeric_latency_is_input_error() {
        let error = Measurement::new("10", "20", "low", "10", "8", 27961, "key")
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Input);
        assert!(error.message.contains("upload latency"));
    }

    #[test]
    fn test_format_kbps_integral_keeps_one_fractional_digit() {
        assert_eq!(format_kbps(50000.0), "50000.0");
        assert_eq!(format_kbps(0.0), "0.0");
        assert_eq!(format_kbps(9999000.0), "9999000.0");
    }

    #[test]
    fn test_format_kbps_fractional_uses_shortest_rendering() {
        assert_eq!(format_kbps(1234567.8), "1234567.8");
        assert_eq!(format_kbps(100.25), "100.25");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_clamp_never_exceeds_cap(mbps in 0.0f64..1_000_000.0) {
            let clamped = parse_throughput("upload", &mbps.to_string()).unwrap();
            prop_assert!(clamped <= MAX_THROUGHPUT_MBPS);
        }

        #[test]
        fn prop_values_below_cap_unchanged(mbps in 0.0f64..9999.0) {
            let parsed = parse_throughput("download", &mbps.to_string()).unwrap();
            prop_assert_eq!(parsed, mbps);
        }

        #[test]
        fn prop_kbps_string_is_plain_decimal(mbps in 0.0f64..9999.0) {
            let rendered = format_kbps(mbps * 1000.0);
            prop_assert!(!rendered.contains('e') && !rendered.contains('E'));
            prop_assert!(rendered.contains('.'));
        }
    }
}
