use futures_util::StreamExt;

use crate::{ApiResponse, FailureKind, FetchError, PrinterConfig};

pub const JOB_PATH: &str = "/api/job";
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Transport seam: one authenticated GET of the job endpoint.
#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    async fn fetch_job(&self) -> Result<ApiResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    max_bytes: u64,
}

impl ReqwestJobClient {
    pub fn new(config: &PrinterConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.poll.connect_timeout())
            .timeout(config.poll.request_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}{}", config.base_url(), JOB_PATH),
            api_key: config.api_key.clone(),
            max_bytes: config.poll.max_body_bytes,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl JobClient for ReqwestJobClient {
    async fn fetch_job(&self) -> Result<ApiResponse, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ApiResponse::new(status.as_u16(), Vec::new()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(next_len));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_connect() {
        return FetchError::new(FailureKind::Connect, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
