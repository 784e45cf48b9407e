use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("Generation request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Generation response contained no text")]
    EmptyResponse,
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

// Request URLs never reach error messages.
impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Http(err.without_url())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
}

/// Boundary to the text-generation service: one prompt in, one text out.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self) -> Result<url::Url, GenerationError> {
        let base = url::Url::parse(&self.api_base)?;
        Ok(base.join(&format!("v1beta/models/{}:generateContent", self.model))?)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: options
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        };

        log::debug!("Sending generation request to model {}", self.model);

        let response = self
            .client
            .post(self.endpoint()?)
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.into_text().ok_or(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            server.uri(),
            DEFAULT_GEMINI_MODEL,
            "AIzaTestKey",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "AIzaTestKey"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Suggest a fort"}]}],
                "generationConfig": {"temperature": 0.5}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Rai"}, {"text": "gad"}]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server)
            .generate(
                "Suggest a fort",
                GenerationOptions {
                    temperature: Some(0.5),
                },
            )
            .await
            .unwrap();

        assert_eq!(text, "Raigad");
    }

    #[actix_rt::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate("Suggest a fort", GenerationOptions::default())
            .await
            .unwrap_err();

        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate("Suggest a fort", GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[actix_rt::test]
    async fn test_transport_error_hides_api_key() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            DEFAULT_GEMINI_MODEL,
            "AIzaSECRET123",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client
            .generate("Suggest a fort", GenerationOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Http(_)));
        assert!(!err.to_string().contains("AIzaSECRET123"));
        assert!(!format!("{:?}", err).contains("AIzaSECRET123"));
    }

    #[actix_rt::test]
    async fn test_api_key_stays_out_of_the_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Torna"}]}}]
            })))
            .mount(&server)
            .await;

        client(&server)
            .generate("Suggest a fort", GenerationOptions::default())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.query().is_none());
    }
}
