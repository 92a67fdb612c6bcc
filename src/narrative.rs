// src/narrative.rs

use crate::config::{LlmBackend, LlmSection};
use crate::declaration::Ed01Draft;
use crate::error::DraftError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Instructs the model to write the explanatory block in formal Thai,
/// using only the JSON it is given.
const SYSTEM_PROMPT: &str = "คุณเป็นเจ้าหน้าที่ศุลกากรไทยระดับเชี่ยวชาญ \
ทำหน้าที่จัดทำคำอธิบายประกอบใบขนสินค้านำเข้า (ED01) \
ให้เขียนเป็นภาษาไทยทางการ แบ่งหัวข้อชัดเจน \
และยึดข้อมูลจาก JSON เท่านั้น ห้ามดัดแปลง.";

const DEMO_PREFIX: &str = "[DEMO MODE]";

/// Produces the free-text notes shown under the declaration.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, draft: &Ed01Draft) -> Result<String, DraftError>;
}

/// No model: echoes the draft payload.
pub struct DemoNarrator;

#[async_trait]
impl Narrator for DemoNarrator {
    async fn narrate(&self, draft: &Ed01Draft) -> Result<String, DraftError> {
        Ok(demo_text(draft)?)
    }
}

fn demo_text(draft: &Ed01Draft) -> Result<String, serde_json::Error> {
    Ok(format!("{DEMO_PREFIX}\n\n{}", serde_json::to_string_pretty(draft)?))
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Any OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatNarrator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ChatNarrator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Narrator for ChatNarrator {
    async fn narrate(&self, draft: &Ed01Draft) -> Result<String, DraftError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: serde_json::to_string_pretty(draft)?,
                },
            ],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        info!(url = %url, model = %self.model, "Requesting ED01 narrative");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| DraftError::Llm(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DraftError::Llm(format!("API error {status}: {body}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| DraftError::Llm(e.to_string()))?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| DraftError::Llm("Empty response from LLM".to_string()))
    }
}

/// Resolves the configured backend. A remote backend without `LLM_API_KEY`
/// degrades to demo mode.
pub fn narrator_for(llm: &LlmSection) -> Box<dyn Narrator> {
    match llm.backend {
        LlmBackend::Demo => Box::new(DemoNarrator),
        LlmBackend::Ollama => {
            info!(url = %llm.ollama.base_url, model = %llm.ollama.model, "Using Ollama (local) backend");
            // required by the API shape but ignored by Ollama
            Box::new(ChatNarrator::new(&llm.ollama.base_url, &llm.ollama.model, "ollama"))
        }
        LlmBackend::Remote => match std::env::var("LLM_API_KEY") {
            Ok(key) => {
                info!(url = %llm.remote.base_url, model = %llm.remote.model, "Using remote API backend");
                Box::new(ChatNarrator::new(&llm.remote.base_url, &llm.remote.model, key))
            }
            Err(_) => {
                warn!("LLM_API_KEY not set — narrative falls back to demo mode");
                Box::new(DemoNarrator)
            }
        },
    }
}

/// Runs `narrator`; a failed call is logged and replaced by the demo text so
/// the draft itself is never lost.
pub async fn narrate_or_demo(narrator: &dyn Narrator, draft: &Ed01Draft) -> Result<String, DraftError> {
    match narrator.narrate(draft).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(error = %e, "Narrative generation failed, using demo text");
            Ok(demo_text(draft)?)
        }
    }
}
