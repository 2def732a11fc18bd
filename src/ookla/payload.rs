//! The submission payload.
//!
//! This is the JSON document the speedtest.net web client uploads at the
//! end of a run. Most of it is configuration the service's own engine
//! echoes back unchanged, reproduced here literally; the measurement
//! fields, the session guid, and the signature are filled in per
//! submission. The structure is built once, sent once, and dropped.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::measurements::Measurement;
use crate::ookla::signature::{self, PING_LABEL};

static SDK_COMMIT: &str = "f6b050be7bf06ca243f95e60eafff740cc401b9a";
static SDK_VERSION: &str = "2.8.17";
static TEST_METHOD: &str = "wss,xhrs,xhrs";
static SOURCE: &str = "st4-js";
static STAGES: [&str; 4] = ["latency", "download", "upload", "save"];
static SERVER_HOST: &str = "perf.keyyo.net";
const SERVER_PORT: u16 = 8080;
static SERVER_VERSION: &str = "2.11.0";
static SERVER_BUILD: &str = "2023-11-29.2207.3251a05";
static CLIENT_IP: &str = "1.1.1.1";

/// An always-empty JSON object.
///
/// Several payload slots carry data in a real run (per-connection speed
/// samples, candidate server lists) but are sent empty by this client,
/// exactly as the reference does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Empty {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Sdk {
    pub commit: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct App {
    pub sdk: Sdk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LatencyConfig {
    pub max_servers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsEngineConfig {
    pub save_content_type: String,
    pub save_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LoadedLatencyConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SwfConfig {
    pub engine: String,
    pub express: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConnectionsConfig {
    pub is_vpn: bool,
    pub selection_method: String,
    pub mode: String,
}

/// The engine configuration block the web client reports having run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Configs {
    pub remote_debugging: bool,
    pub max_display_servers: u32,
    pub request_web_location: bool,
    pub short_tests: bool,
    pub automatic_stage_progression: bool,
    pub event_skip_interval: u32,
    pub latency: LatencyConfig,
    pub js_engine: JsEngineConfig,
    pub stages_list: Vec<String>,
    pub loaded_latency: LoadedLatencyConfig,
    pub swf: SwfConfig,
    pub vpn_detected: bool,
    pub log_errors_to_server: bool,
    pub connections: ConnectionsConfig,
    pub experiments: Empty,
    pub latency_protocol: String,
    pub download_protocol: String,
    pub upload_protocol: String,
    pub host: String,
    pub port: u16,
    pub server_version: String,
    pub server_build: String,
}

/// Latency distribution summary. A real client derives these from many
/// samples; here every slot repeats the single caller-supplied value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Rtt {
    pub iqm: String,
    pub mean: String,
    pub median: String,
    pub min: String,
    pub max: String,
}

impl Rtt {
    fn repeated(latency: &str) -> Self {
        Self {
            iqm: latency.to_string(),
            mean: latency.to_string(),
            median: latency.to_string(),
            min: latency.to_string(),
            max: latency.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct IdleTcp {
    pub jitter: u32,
    pub rtt: Rtt,
    pub count: u32,
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdleLatency {
    pub connection_protocol: String,
    pub tcp: IdleTcp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LoadedTcp {
    pub jitter: u32,
    pub rtt: Rtt,
    pub count: u32,
    pub elapsed: u32,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LoadedLatency {
    pub tcp: LoadedTcp,
}

/// Complete result submission, mirroring the web client's save payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Payload {
    pub app: App,
    pub serverid: i64,
    pub testmethod: String,
    pub source: String,
    pub configs: Configs,
    pub ping: String,
    pub pings: Vec<f64>,
    pub jitter: u32,
    pub latency: IdleLatency,
    pub guid: String,
    pub server_selection_method: String,
    pub upload_measurement_method: String,
    pub upload: String,
    pub upload_speeds: Empty,
    pub download: String,
    pub download_speeds: Empty,
    pub download_latency: LoadedLatency,
    pub upload_latency: LoadedLatency,
    pub servers: Empty,
    pub connections: Empty,
    pub hash: String,
    pub clientip: String,
}

impl Payload {
    /// Build a submission from a validated measurement.
    ///
    /// Deterministic except for `guid`, which is freshly random per
    /// submission. The signature is computed here so a payload can never
    /// exist with a hash that disagrees with its own fields.
    pub fn new(measurement: &Measurement) -> Self {
        let hash = signature::sign(
            PING_LABEL,
            &measurement.upload_kbps,
            &measurement.download_kbps,
            &measurement.api_key,
        );

        Self {
            app: App {
                sdk: Sdk {
                    commit: SDK_COMMIT.to_string(),
                    version: SDK_VERSION.to_string(),
                },
            },
            serverid: measurement.server_id,
            testmethod: TEST_METHOD.to_string(),
            source: SOURCE.to_string(),
            configs: Configs::default(),
            ping: PING_LABEL.to_string(),
            pings: vec![],
            jitter: 0,
            latency: IdleLatency {
                connection_protocol: "wss".to_string(),
                tcp: IdleTcp {
                    jitter: 0,
                    rtt: Rtt::repeated(&measurement.idle_latency),
                    count: 0,
                    samples: vec![],
                },
            },
            guid: Uuid::new_v4().to_string(),
            server_selection_method: "auto".to_string(),
            upload_measurement_method: "remote".to_string(),
            upload: measurement.upload_kbps.clone(),
            upload_speeds: Empty {},
            download: measurement.download_kbps.clone(),
            download_speeds: Empty {},
            download_latency: LoadedLatency {
                tcp: LoadedTcp {
                    jitter: 0,
                    rtt: Rtt::repeated(&measurement.download_latency),
                    count: 0,
                    elapsed: 0,
                    timestamp: 0,
                },
            },
            upload_latency: LoadedLatency {
                tcp: LoadedTcp {
                    jitter: 0,
                    rtt: Rtt::repeated(&measurement.upload_latency),
                    count: 0,
                    elapsed: 0,
                    timestamp: 0,
                },
            },
            servers: Empty {},
            connections: Empty {},
            hash,
            clientip: CLIENT_IP.to_string(),
        }
    }
}

impl Default for Configs {
    fn default() -> Self {
        Self {
            remote_debugging: false,
            max_display_servers: 20,
            request_web_location: true,
            short_tests: false,
            automatic_stage_progression: false,
            event_skip_interval: 2,
            latency: LatencyConfig { max_servers: 10 },
            js_engine: JsEngineConfig {
                save_content_type: "application/json".to_string(),
                save_type: SOURCE.to_string(),
            },
            stages_list: STAGES.iter().map(|s| s.to_string()).collect(),
            loaded_latency: LoadedLatencyConfig { enabled: true },
            swf: SwfConfig {
                engine: "/engine.swf".to_string(),
                express: "/expressInstall.swf".to_string(),
            },
            vpn_detected: false,
            log_errors_to_server: false,
            connections: ConnectionsConfig {
                is_vpn: false,
                selection_method: "auto".to_string(),
                mode: "multi".to_string(),
            },
            experiments: Empty {},
            latency_protocol: "ws".to_string(),
            download_protocol: "xhr".to_string(),
            upload_protocol: "xhr".to_string(),
            host: SERVER_HOST.to_string(),
            port: SERVER_PORT,
            server_version: SERVER_VERSION.to_string(),
            server_build: SERVER_BUILD.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ookla::signature::DEFAULT_API_KEY;
    use serde_json::json;

    fn measurement() -> Measurement {
        Measurement::new("50.0", "100.0", "6", "10", "8", 27961, DEFAULT_API_KEY)
            .unwrap()
    }

    #[test]
    fn test_payload_signs_its_own_fields() {
        let payload = Payload::new(&measurement());

        // Reference digest for "10-50000.0-100000.0-817d699764d33f89c".
        assert_eq!(payload.hash, "7bfe8582d85012342d4a965acab1d8b9");
        assert_eq!(payload.upload, "50000.0");
        assert_eq!(payload.download, "100000.0");
    }

    #[test]
    fn test_payload_carries_measurement_fields() {
        let payload = Payload::new(&measurement());

        assert_eq!(payload.serverid, 27961);
        assert_eq!(payload.ping, "10");
        assert_eq!(payload.latency.tcp.rtt.iqm, "8");
        assert_eq!(payload.download_latency.tcp.rtt.iqm, "10");
        assert_eq!(payload.upload_latency.tcp.rtt.iqm, "6");
    }

    #[test]
    fn test_latency_value_repeats_across_all_rtt_slots() {
        let payload = Payload::new(&measurement());
        let rtt = &payload.download_latency.tcp.rtt;

        for slot in [&rtt.iqm, &rtt.mean, &rtt.median, &rtt.min, &rtt.max] {
            assert_eq!(slot, "10");
        }
    }

    #[test]
    fn test_timestamp_like_fields_are_zero() {
        let payload = Payload::new(&measurement());

        assert_eq!(payload.jitter, 0);
        assert_eq!(payload.download_latency.tcp.elapsed, 0);
        assert_eq!(payload.download_latency.tcp.timestamp, 0);
        assert_eq!(payload.upload_latency.tcp.elapsed, 0);
        assert_eq!(payload.upload_latency.tcp.timestamp, 0);
    }

    #[test]
    fn test_constant_fields_serialize_to_reference_literals() {
        let payload = Payload::new(&measurement());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value["app"]["sdk"]["commit"],
            json!("f6b050be7bf06ca243f95e60eafff740cc401b9a")
        );
        assert_eq!(value["app"]["sdk"]["version"], json!("2.8.17"));
        assert_eq!(value["testmethod"], json!("wss,xhrs,xhrs"));
        assert_eq!(value["source"], json!("st4-js"));
        assert_eq!(
            value["configs"]["stagesList"],
            json!(["latency", "download", "upload", "save"])
        );
        assert_eq!(value["configs"]["host"], json!("perf.keyyo.net"));
        assert_eq!(value["configs"]["port"], json!(8080));
        assert_eq!(value["configs"]["serverVersion"], json!("2.11.0"));
        assert_eq!(
            value["configs"]["serverBuild"],
            json!("2023-11-29.2207.3251a05")
        );
        assert_eq!(value["configs"]["jsEngine"]["saveType"], json!("st4-js"));
        assert_eq!(value["configs"]["swf"]["engine"], json!("/engine.swf"));
        assert_eq!(value["latency"]["connectionProtocol"], json!("wss"));
        assert_eq!(value["serverSelectionMethod"], json!("auto"));
        assert_eq!(value["uploadMeasurementMethod"], json!("remote"));
        assert_eq!(value["clientip"], json!("1.1.1.1"));
    }

    #[test]
    fn test_empty_collections_serialize_as_reference_shapes() {
        let payload = Payload::new(&measurement());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["pings"], json!([]));
        assert_eq!(value["latency"]["tcp"]["samples"], json!([]));
        assert_eq!(value["uploadSpeeds"], json!({}));
        assert_eq!(value["downloadSpeeds"], json!({}));
        assert_eq!(value["servers"], json!({}));
        assert_eq!(value["connections"], json!({}));
        assert_eq!(value["configs"]["experiments"], json!({}));
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        let payload = Payload::new(&measurement());

        let text = serde_json::to_string(&payload).unwrap();
        let parsed: Payload = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, payload);
        assert!(Uuid::parse_str(&parsed.guid).is_ok());
    }

    #[test]
    fn test_guid_is_fresh_per_payload() {
        let m = measurement();

        let first = Payload::new(&m);
        let second = Payload::new(&m);

        assert_ne!(first.guid, second.guid);
        assert_eq!(first.hash, second.hash);
    }
}
