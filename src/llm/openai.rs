use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::Generator;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You create educational flashcards for studying.";

/// OpenAI chat completions client
pub struct OpenAiClient {
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// The API key is taken from the OPENAI_API_KEY environment variable
    pub fn from_env(model: &str) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config(
                "OpenAI API key not found. Set the OPENAI_API_KEY environment variable."
                    .to_string(),
            )
        })?;
        Ok(OpenAiClient {
            api_key,
            model: model.to_string(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

impl Generator for OpenAiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: 1500,
            temperature: 0.7,
        };

        let response: ChatResponse = ureq::post(COMPLETIONS_URL)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)?
            .into_json()?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::ApiResponse("completion reply contained no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: "prompt text",
                },
            ],
            max_tokens: 1500,
            temperature: 0.7,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "prompt text");
        assert_eq!(value["max_tokens"], 1500);
    }

    #[test]
    fn test_response_shape() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Question: Q?\nAnswer: A."}}
            ],
            "usage": {"total_tokens": 42}
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.choices[0].message.content,
            "Question: Q?\nAnswer: A."
        );
    }

    #[test]
    fn test_from_env_requires_key() {
        // The test runner may or may not have the variable set; only the
        // missing-key path is deterministic to assert.
        std::env::remove_var("OPENAI_API_KEY");
        assert!(OpenAiClient::from_env("gpt-4").is_err());
    }
}
