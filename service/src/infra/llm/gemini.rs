//! Google Gemini [`Llm`] implementation.

use std::{sync::Arc, time::Duration};

use common::operations::Perform;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::infra::{
    llm::{self, Prompt},
    Llm,
};

/// Name of the HTTP header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// [`Gemini`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// API key to authorize requests with.
    ///
    /// Every request fails with [`llm::Error::Unconfigured`] if [`None`].
    pub api_key: Option<SecretString>,

    /// Base URL of the models API.
    #[default("https://generativelanguage.googleapis.com/v1beta/models".into())]
    pub endpoint: String,

    /// Name of the model to generate content with.
    #[default("gemini-2.5-pro".into())]
    pub model: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(30))]
    pub timeout: Duration,
}

/// Google Gemini [`Llm`] client.
#[derive(Clone, Debug)]
pub struct Gemini {
    /// HTTP client performing requests.
    client: reqwest::Client,

    /// [`Config`] of this [`Gemini`] client.
    config: Arc<Config>,
}

impl Gemini {
    /// Creates a new [`Gemini`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to build an HTTP client.
    pub fn new(config: Config) -> Result<Self, Traced<llm::Error>> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> llm::Error))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Returns the URL to generate content with the configured model.
    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
        )
    }
}

impl Llm<Perform<Prompt>> for Gemini {
    type Ok = String;
    type Err = Traced<llm::Error>;

    async fn execute(
        &self,
        Perform(prompt): Perform<Prompt>,
    ) -> Result<Self::Ok, Self::Err> {
        use llm::Error as E;

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| tracerr::new!(E::Unconfigured))?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.text().to_owned()),
                }],
            }],
        };

        log::debug!(model = %self.config.model, "generating content");
        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)
            .map_err(tracerr::from_and_wrap!(=> E))?
            .json::<GenerateContentResponse>()
            .await
            .map_err(reqwest::Error::without_url)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| tracerr::new!(E::NoCandidates))?;

        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| tracerr::new!(E::EmptyText))
    }
}

/// Body of a `generateContent` request.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// Conversation turns to generate content for.
    contents: Vec<Content>,
}

/// Body of a `generateContent` response.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Single generated candidate.
#[derive(Debug, Deserialize)]
struct Candidate {
    /// Generated [`Content`], if any.
    content: Option<Content>,
}

/// Content of a conversation turn.
#[derive(Debug, Deserialize, Serialize)]
struct Content {
    /// [`Part`]s of this [`Content`].
    #[serde(default)]
    parts: Vec<Part>,
}

/// Part of a [`Content`].
#[derive(Debug, Deserialize, Serialize)]
struct Part {
    /// Text of this [`Part`], if it's a textual one.
    text: Option<String>,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::Perform;
    use secrecy::SecretString;

    use crate::infra::Llm as _;

    use super::{Config, Gemini};

    #[tokio::test]
    async fn request_failure_does_not_mention_api_key() {
        let gemini = Gemini::new(Config {
            api_key: Some(SecretString::from("SUPER-SECRET-KEY".to_owned())),
            endpoint: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(5),
            ..Config::default()
        })
        .expect("client built");

        let err = gemini
            .execute(Perform("5 kg onions".into()))
            .await
            .expect_err("nothing listens there");

        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
        assert!(!format!("{err:?}").contains("SUPER-SECRET-KEY"));
    }
}
