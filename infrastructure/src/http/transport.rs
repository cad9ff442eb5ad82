//! reqwest-based chat transport.

use super::sse::SseDecoder;
use async_trait::async_trait;
use futures::{StreamExt, future, stream};
use hiremate_application::{
    AskReply, AskRequest, ChatTransport, EventStream, StreamRequest, TransportError,
};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const STREAM_PATH: &str = "api/chat/stream";
const ASK_PATH: &str = "api/chat/ask";

/// Maximum length of an error body quoted in a [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Deserialize)]
struct AskResponseBody {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Chat transport speaking HTTP to the HireMate backend.
#[derive(Clone)]
pub struct HttpChatTransport {
    client: reqwest::Client,
}

impl HttpChatTransport {
    /// Create a transport with its own connection pool.
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("hiremate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a transport sharing an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn endpoint(base_url: &Url, path: &str) -> String {
    format!("{}/{}", base_url.as_str().trim_end_matches('/'), path)
}

fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::TimedOut
    } else {
        TransportError::Connect(e.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    } else {
        hiremate_domain::util::truncate_str(body.trim(), MAX_ERROR_BODY).to_string()
    };
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn open_stream(
        &self,
        base_url: &Url,
        request: &StreamRequest,
    ) -> Result<EventStream, TransportError> {
        let url = endpoint(base_url, STREAM_PATH);
        debug!("GET {}", url);

        let history = request.history_json();
        let mut query = vec![
            ("question", request.question.as_str()),
            ("history", history.as_str()),
        ];
        if let Some(token) = &request.token {
            query.push(("token", token.as_str()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let events = response
            .bytes_stream()
            .scan(SseDecoder::new(), |decoder, chunk| {
                let items: Vec<Result<String, TransportError>> = match chunk {
                    Ok(bytes) => match decoder.push(&bytes) {
                        Ok(payloads) => payloads.into_iter().map(Ok).collect(),
                        Err(e) => vec![Err(e)],
                    },
                    Err(e) => vec![Err(TransportError::Dropped(e.to_string()))],
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten()
            .boxed();

        Ok(events)
    }

    async fn ask(&self, base_url: &Url, request: &AskRequest) -> Result<AskReply, TransportError> {
        let url = endpoint(base_url, ASK_PATH);
        debug!("POST {}", url);

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let body: AskResponseBody = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        body.response
            .or(body.message)
            .filter(|text| !text.trim().is_empty())
            .map(|text| AskReply { text })
            .ok_or_else(|| {
                TransportError::InvalidResponse("reply has no response or message".to_string())
            })
    }
}
