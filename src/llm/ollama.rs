use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::llm::Generator;

/// Client for a local Ollama server's /api/generate endpoint
pub struct OllamaClient {
    host: String,
    model: String,
}

impl OllamaClient {
    pub fn new(host: &str, model: &str) -> Self {
        OllamaClient {
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.host)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Generator for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            // Near-deterministic output keeps the reply format parseable
            options: GenerateOptions { temperature: 0.01 },
        };

        let response: GenerateResponse = ureq::post(&self.endpoint())
            .send_json(&request)?
            .into_json()?;

        Ok(response.response.trim().to_string())
    }
}
