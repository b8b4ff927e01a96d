pub mod ollama;
pub mod openai;
pub mod prompt;

use crate::error::Result;

/// Which completion backend to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelKind {
    /// OpenAI chat completions API (cloud, needs OPENAI_API_KEY)
    Openai,
    /// Local Ollama server
    Ollama,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Openai => write!(f, "openai"),
            ModelKind::Ollama => write!(f, "ollama"),
        }
    }
}

/// A completion backend: prompt in, free-form text reply out
pub trait Generator {
    fn generate(&self, prompt: &str) -> Result<String>;
}
