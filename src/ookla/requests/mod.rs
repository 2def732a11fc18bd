pub(crate) mod save;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single HTTP exchange with the result service.
pub(crate) trait Request {
    type Body: Serialize;

    type Response: for<'de> Deserialize<'de>;

    const METHOD: Method = Method::GET;

    fn endpoint(&'_ self) -> Cow<'_, str>;

    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}
