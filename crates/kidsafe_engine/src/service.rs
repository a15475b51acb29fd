use std::time::Duration;

use futures_util::StreamExt;
use kidsafe_core::{AnalyzeOutcome, CatalogEntry, ChatOutcome, ChatRequest, SearchOutcome};
use kidsafe_logging::kidsafe_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

use crate::decode::{
    decode_analyze, decode_catalog, decode_chat, decode_search, decode_status, RawReply,
};
use crate::{FailureKind, ServiceError};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// The external analysis service, one method per endpoint.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn catalog(&self) -> Result<Vec<CatalogEntry>, ServiceError>;

    async fn search_product(&self, product_name: &str) -> Result<SearchOutcome, ServiceError>;

    async fn analyze(
        &self,
        product_name: &str,
        ingredients: &str,
    ) -> Result<AnalyzeOutcome, ServiceError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatOutcome, ServiceError>;

    /// Whether the service reports itself initialized.
    async fn status(&self) -> Result<bool, ServiceError>;
}

#[derive(Serialize)]
struct SearchBody<'a> {
    product_name: &'a str,
}

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    cereal_name: &'a str,
    ingredients: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    settings: ServiceSettings,
    base: Url,
    client: reqwest::Client,
}

impl HttpAnalysisService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let base = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base
            .join(path)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get(&self, path: &str) -> Result<RawReply, ServiceError> {
        let url = self.endpoint(path)?;
        kidsafe_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read(response).await
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<RawReply, ServiceError> {
        let url = self.endpoint(path)?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;
        kidsafe_debug!("POST {} ({} bytes)", url, payload.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read(response).await
    }

    async fn read(&self, response: reqwest::Response) -> Result<RawReply, ServiceError> {
        let status = response.status().as_u16();
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(RawReply { status, body })
    }
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn catalog(&self) -> Result<Vec<CatalogEntry>, ServiceError> {
        decode_catalog(&self.get("api/cereals").await?)
    }

    async fn search_product(&self, product_name: &str) -> Result<SearchOutcome, ServiceError> {
        let reply = self
            .post("api/search-product", &SearchBody { product_name })
            .await?;
        decode_search(&reply)
    }

    async fn analyze(
        &self,
        product_name: &str,
        ingredients: &str,
    ) -> Result<AnalyzeOutcome, ServiceError> {
        let body = AnalyzeBody {
            cereal_name: product_name,
            ingredients,
        };
        let reply = self.post("api/analyze", &body).await?;
        decode_analyze(&reply, product_name, ingredients)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatOutcome, ServiceError> {
        decode_chat(&self.post("api/chat", request).await?)
    }

    async fn status(&self) -> Result<bool, ServiceError> {
        decode_status(&self.get("api/status").await?)
    }
}

/// Parses the base URL so relative endpoint paths join beneath it.
fn parse_base_url(raw: &str) -> Result<Url, ServiceError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ServiceError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(url)
}

fn too_large(max_bytes: u64, actual: u64) -> ServiceError {
    ServiceError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
