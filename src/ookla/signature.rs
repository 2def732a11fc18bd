//! Integrity signature for result submissions.
//!
//! The service recomputes an MD5 digest over four fields of the payload
//! and rejects anything that does not match. The digest binds the ping
//! label, both throughput strings, and the API key; everything else in
//! the payload is unsigned.

/// Ping token the signature scheme expects.
///
/// The reference client always sends `"10"` here. Whether the service
/// wants this exact value or merely the same value on both ends is
/// unknown, so it stays an opaque constant.
pub(crate) static PING_LABEL: &str = "10";

/// Default API key baked into the reference client.
pub(crate) static DEFAULT_API_KEY: &str = "817d699764d33f89c";

/// Compute the submission signature.
///
/// The digest covers `{ping}-{upload_kbps}-{download_kbps}-{key}` with
/// literal hyphens, in that order, and is rendered as lowercase hex.
pub(crate) fn sign(
    ping: &str,
    upload_kbps: &str,
    download_kbps: &str,
    key: &str,
) -> String {
    let presignature =
        [ping, upload_kbps, download_kbps, key].join("-");

    format!("{:x}", md5::compute(presignature.as_bytes()))
}
