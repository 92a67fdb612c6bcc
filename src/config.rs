use crate::allocation::{DEFAULT_PRECISION, ValidationMode};
use crate::error::DraftError;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub declaration: DeclarationDefaults,
    #[serde(default)]
    pub allocation: AllocationSection,
    #[serde(default)]
    pub llm: LlmSection,
}

/// Values the draft falls back to when the documents don't supply them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeclarationDefaults {
    pub fallback_total_weight_kg: f64,
    pub duty_rate: f64,
    pub vat_rate: f64,
    pub currency: String,
    /// Catalog parts carry no invoice price.
    pub demo_unit_price: f64,
    pub importer_name: String,
    pub consignee_name: String,
    pub shipper_name: String,
    pub port_loading: String,
    pub port_discharge: String,
}

impl Default for DeclarationDefaults {
    fn default() -> Self {
        Self {
            fallback_total_weight_kg: 500.0,
            duty_rate: 0.05,
            vat_rate: 0.07,
            currency: "USD".to_string(),
            demo_unit_price: 100.0,
            importer_name: "Demo Importer Co., Ltd.".to_string(),
            consignee_name: "Demo Consignee Thailand Co., Ltd.".to_string(),
            shipper_name: "Demo Exporter International Ltd.".to_string(),
            port_loading: "SHANGHAI, CN".to_string(),
            port_discharge: "LAEM CHABANG, TH".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllocationSection {
    #[serde(default = "default_precision")]
    pub precision: u32,
    #[serde(default)]
    pub validation: ValidationMode,
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

impl Default for AllocationSection {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            validation: ValidationMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// No model call; the narrative is the draft JSON.
    #[default]
    Demo,
    Ollama,
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "LlmFile")]
pub struct LlmSection {
    pub backend: LlmBackend,
    pub ollama: EndpointConfig,
    pub remote: EndpointConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_url: String,
    pub model: String,
}

fn default_ollama() -> EndpointConfig {
    EndpointConfig {
        base_url: "http://localhost:11434/v1".to_string(),
        model: "qwen3:8b".to_string(),
    }
}

fn default_remote() -> EndpointConfig {
    EndpointConfig {
        base_url: "https://api.openai.com/v1".to_string(),
        model: "gpt-4.1-mini".to_string(),
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            ollama: default_ollama(),
            remote: default_remote(),
        }
    }
}

/// `[llm]` as written in the file; each endpoint key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LlmFile {
    backend: LlmBackend,
    ollama: EndpointFile,
    remote: EndpointFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EndpointFile {
    base_url: Option<String>,
    model: Option<String>,
}

impl EndpointFile {
    fn or(self, fallback: EndpointConfig) -> EndpointConfig {
        EndpointConfig {
            base_url: self.base_url.unwrap_or(fallback.base_url),
            model: self.model.unwrap_or(fallback.model),
        }
    }
}

impl From<LlmFile> for LlmSection {
    fn from(file: LlmFile) -> Self {
        Self {
            backend: file.backend,
            ollama: file.ollama.or(default_ollama()),
            remote: file.remote.or(default_remote()),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DraftError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
