use crate::errors::SubmitError;
use crate::ookla::requests::Request;
use log::debug;
use reqwest::Client as ReqwestClient;

pub(crate) static BASE_URL: &str = "https://www.speedtest.net";

#[derive(Debug, Clone)]
pub struct Client {
    client: ReqwestClient,
}

impl Client {
    pub fn new() -> Self {
        Client { client: ReqwestClient::new() }
    }

    /// Send one request and deserialize its response body.
    ///
    /// The body is parsed regardless of HTTP status: the service reports
    /// rejection through the body shape, not the status line.
    pub async fn send<R: Request>(
        &self,
        request: R,
    ) -> Result<R::Response, SubmitError> {
        let endpoint = request.endpoint();
        let endpoint = endpoint.trim_matches('/');
        let url = format!("{}/{}", BASE_URL, endpoint);

        debug!("{} {}", R::METHOD, url);

        let mut builder =
            self.client.request(R::METHOD, &url).headers(request.headers());

        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response =
            builder.send().await.map_err(SubmitError::transport)?;

        let status = response.status();
        let text =
            response.text().await.map_err(SubmitError::transport)?;

        debug!("{} responded {} with {} bytes", url, status, text.len());

        serde_json::from_str(&text).map_err(|error| {
            let message = format!("response was not valid JSON: {}", error);
            SubmitError::unexpected_response(message).with_source(error)
        })
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
