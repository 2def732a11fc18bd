//! The save request: trades a signed payload for a result id.
//!
//! This is the `save` stage of the web client's run, issued on its own.
//! The header set mimics the browser the payload claims to come from;
//! the service filters submissions that do not look like its own client.

use crate::errors::SubmitError;
use crate::measurements::Measurement;
use crate::ookla::client::BASE_URL;
use crate::ookla::payload::Payload;
use crate::ookla::requests::Request;
use reqwest::header::{
    HeaderMap, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER,
    USER_AGENT,
};
use reqwest::Method;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use url::Url;

static UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                   AppleWebKit/537.36 (KHTML, like Gecko) \
                   Chrome/127.0.0.0 Safari/537.36";

static SEC_CH_UA: &str =
    "\"Not)A;Brand\";v=\"99\", \"Google Chrome\";v=\"127\", \"Chromium\";v=\"127\"";

pub(crate) struct SaveResult {
    payload: Payload,
}

impl SaveResult {
    pub fn new(measurement: &Measurement) -> Self {
        Self { payload: Payload::new(measurement) }
    }
}

impl Request for SaveResult {
    type Body = Payload;

    type Response = SaveResponse;

    const METHOD: Method = Method::POST;

    fn endpoint(&'_ self) -> Cow<'_, str> {
        "api/results.php".into()
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers
            .insert(ACCEPT, "application/json, text/plain, */*".parse().unwrap());
        headers.insert(ACCEPT_LANGUAGE, "fr".parse().unwrap());
        headers.insert(
            CONTENT_TYPE,
            "application/json;charset=UTF-8".parse().unwrap(),
        );
        headers.insert(ORIGIN, BASE_URL.parse().unwrap());
        headers.insert("priority", "u=1, i".parse().unwrap());
        headers.insert(REFERER, format!("{}/", BASE_URL).parse().unwrap());
        headers.insert("sec-ch-ua", SEC_CH_UA.parse().unwrap());
        headers.insert("sec-ch-ua-mobile", "?0".parse().unwrap());
        headers.insert("sec-ch-ua-platform", "\"Windows\"".parse().unwrap());
        headers.insert("sec-fetch-dest", "empty".parse().unwrap());
        headers.insert("sec-fetch-mode", "cors".parse().unwrap());
        headers.insert("sec-fetch-site", "same-origin".parse().unwrap());
        headers.insert(USER_AGENT, UA.parse().unwrap());

        headers
    }

    fn body(&self) -> Option<&Payload> {
        Some(&self.payload)
    }
}

/// Opaque identifier the service hands back for a saved result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResultId {
    Text(String),
    Number(u64),
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultId::Text(id) => f.write_str(id),
            ResultId::Number(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SavedResult {
    pub resultid: ResultId,
}

/// Body of the save response.
///
/// The service signals rejection by answering with a bare JSON array
/// instead of an object. An object without `resultid` is neither shape;
/// it is kept apart from rejection for diagnostics.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SaveResponse {
    Rejected(Vec<serde_json::Value>),
    Saved(SavedResult),
    Other(serde_json::Value),
}

impl SaveResponse {
    /// Extract the result identifier, or the failure the shape implies.
    pub fn result_id(self) -> Result<ResultId, SubmitError> {
        match self {
            SaveResponse::Rejected(_) => Err(SubmitError::rejected()),
            SaveResponse::Saved(saved) => Ok(saved.resultid),
            SaveResponse::Other(body) => Err(SubmitError::unexpected_response(
                format!("response carried no resultid field: {}", body),
            )),
        }
    }
}

/// Shareable link for a saved result.
pub(crate) fn share_url(id: &ResultId) -> Url {
    let base = Url::parse(BASE_URL).expect("base url is valid");

    base.join(&format!("result/{}", id))
        .expect("result id forms a valid url path")
}
