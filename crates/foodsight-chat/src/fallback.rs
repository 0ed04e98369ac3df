//! Last-resort answers from an external LLM, grounded in the dataset JSON.
//!
//! A single attempt per question with a caller-supplied timeout. Failures are
//! logged and surface to the user as a fixed apology in their language.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;
use tracing::{info, warn};

use foodsight_core::{Error, Result};
use foodsight_data::FixtureDataset;

use crate::config::LLMConfig;
use crate::providers::{self, Sampling};
use crate::types::ChatMessage;

pub const CONFIG_APOLOGY_ES: &str = "Lo siento, no puedo responder esa pregunta porque el \
     asistente de IA no está configurado. Pregúntame sobre ventas, inventario, clientes, \
     regiones o promociones.";
pub const CONFIG_APOLOGY_EN: &str = "Sorry, I can't answer that because the AI assistant \
     is not configured. Ask me about sales, inventory, clients, regions or promotions.";
pub const GENERIC_APOLOGY_ES: &str =
    "Lo siento, tuve un problema al generar la respuesta. Intenta de nuevo en unos momentos.";
pub const GENERIC_APOLOGY_EN: &str =
    "Sorry, I ran into a problem generating that answer. Please try again shortly.";

/// Apology for a failed fallback call.
pub fn apology(error: &Error, spanish: bool) -> &'static str {
    match (error, spanish) {
        (Error::Config(_), true) => CONFIG_APOLOGY_ES,
        (Error::Config(_), false) => CONFIG_APOLOGY_EN,
        (_, true) => GENERIC_APOLOGY_ES,
        (_, false) => GENERIC_APOLOGY_EN,
    }
}

/// Builds the system prompt: analyst persona plus the full dataset.
pub fn system_prompt(dataset: &FixtureDataset) -> Result<String> {
    let data = serde_json::to_string(dataset)?;
    Ok(format!(
        "You are a business analyst assistant for {company}, a Mexican food manufacturer. \
         Answer in the same language as the user's question (Spanish or English). \
         Use only the figures in the JSON dataset below; if the data does not cover the \
         question, say so. Keep answers concise, format currency as $1,234,567 and \
         percentages with one decimal.\n\nDATASET:\n{data}",
        company = dataset.company,
        data = data
    ))
}

/// Client for open-ended questions the templates cannot answer.
#[derive(Clone)]
pub struct FallbackClient {
    config: Arc<RwLock<LLMConfig>>,
    http: Client,
    timeout: Duration,
    sampling: Sampling,
}

impl FallbackClient {
    pub fn new(config: Arc<RwLock<LLMConfig>>, timeout: Duration) -> Self {
        Self {
            config,
            http: Client::new(),
            timeout,
            sampling: Sampling::default(),
        }
    }

    /// Replace the HTTP client (proxy settings, custom TLS).
    pub fn with_http(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Shared handle to the live configuration.
    pub fn config(&self) -> &Arc<RwLock<LLMConfig>> {
        &self.config
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn is_configured(&self) -> bool {
        self.config.read().is_configured()
    }

    /// Ask the configured provider. No retry.
    pub async fn try_answer(&self, question: &str, dataset: &FixtureDataset) -> Result<String> {
        let target = self
            .config
            .read()
            .resolve_provider()
            .ok_or_else(|| Error::Config("no LLM provider API key configured".into()))?;

        let messages = vec![
            ChatMessage::system(system_prompt(dataset)?),
            ChatMessage::user(question),
        ];
        info!(provider = %target.provider, model = %target.model, "Fallback LLM call");

        let call = providers::complete(&self.http, &target, messages, self.sampling);
        let text = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| Error::Llm("timeout".into()))??;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::Llm("empty completion".into()));
        }
        Ok(text)
    }

    /// Like [`FallbackClient::try_answer`] but never fails: errors become an
    /// apology in the requested language.
    pub async fn answer(&self, question: &str, dataset: &FixtureDataset, spanish: bool) -> String {
        match self.try_answer(question, dataset).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    Error::Config(_) => info!("Fallback skipped: {}", e),
                    _ => warn!("Fallback LLM call failed: {}", e),
                }
                apology(&e, spanish).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::header;
    use axum::routing::post;
    use axum::Router;

    /// Serves a canned OpenAI-style SSE body at `/chat/completions`.
    async fn mock_provider(body: &'static str, delay: Duration, status: u16) -> String {
        let app = Router::new().route(
            "/chat/completions",
            post(move || async move {
                tokio::time::sleep(delay).await;
                (
                    axum::http::StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "text/event-stream")],
                    body,
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: Option<String>, timeout: Duration) -> FallbackClient {
        let config = LLMConfig {
            preferred_provider: "openai".into(),
            openai_api_key: base_url.as_ref().map(|_| "test-key".to_string()),
            base_url,
            ..Default::default()
        };
        let http = Client::builder().no_proxy().build().unwrap();
        FallbackClient::new(Arc::new(RwLock::new(config)), timeout).with_http(http)
    }

    const TWO_TOKENS: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Las ventas \"}}]}\n\n\
                              data: {\"choices\":[{\"delta\":{\"content\":\"suben.\"}}]}\n\n\
                              data: [DONE]\n\n";

    #[test]
    fn test_system_prompt_embeds_dataset() {
        let ds = FixtureDataset::standard();
        let prompt = system_prompt(&ds).unwrap();
        assert!(prompt.contains("Alimentos del Valle"));
        assert!(prompt.contains("Mole Poblano 250g"));
        assert!(prompt.contains("\"monthlyRevenue\""));
    }

    #[tokio::test]
    async fn test_unconfigured_returns_config_apology() {
        let client = client_for(None, Duration::from_secs(5));
        let ds = FixtureDataset::standard();
        assert!(matches!(
            client.try_answer("¿Qué opinas del clima?", &ds).await,
            Err(Error::Config(_))
        ));
        assert_eq!(client.answer("¿Qué opinas del clima?", &ds, true).await, CONFIG_APOLOGY_ES);
        assert_eq!(client.answer("what about the weather", &ds, false).await, CONFIG_APOLOGY_EN);
    }

    #[tokio::test]
    async fn test_streamed_tokens_are_concatenated() {
        let base = mock_provider(TWO_TOKENS, Duration::ZERO, 200).await;
        let client = client_for(Some(base), Duration::from_secs(5));
        let text = client
            .try_answer("¿Qué debo vigilar?", &FixtureDataset::standard())
            .await
            .unwrap();
        assert_eq!(text, "Las ventas suben.");
    }

    #[tokio::test]
    async fn test_provider_error_returns_generic_apology() {
        let base = mock_provider("{\"error\":\"boom\"}", Duration::ZERO, 500).await;
        let client = client_for(Some(base), Duration::from_secs(5));
        let ds = FixtureDataset::standard();
        assert!(matches!(client.try_answer("q", &ds).await, Err(Error::Llm(_))));
        assert_eq!(client.answer("q", &ds, false).await, GENERIC_APOLOGY_EN);
    }

    #[tokio::test]
    async fn test_timeout_is_an_llm_error() {
        let base = mock_provider(TWO_TOKENS, Duration::from_secs(5), 200).await;
        let client = client_for(Some(base), Duration::from_millis(100));
        let err = client
            .try_answer("q", &FixtureDataset::standard())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(ref m) if m == "timeout"));
    }
}
