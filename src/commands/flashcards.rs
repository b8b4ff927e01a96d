use log::error;
use std::fs;
use std::path::PathBuf;

use crate::cards::{anki, parse_flashcards};
use crate::error::{Error, Result};
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::{prompt, Generator, ModelKind};

#[derive(Debug, Clone)]
pub struct FlashcardOptions {
    pub transcript: PathBuf,
    pub output: PathBuf,
    pub model_kind: ModelKind,
    pub model_name: String,
    pub tags: String,
    pub ollama_host: String,
}

pub fn run(options: FlashcardOptions) -> Result<()> {
    // 1. Transcript
    let transcript = fs::read_to_string(&options.transcript)?;

    // 2. Generation prompt
    let prompt_text = prompt::build_prompt(&transcript);

    // 3. Call the selected backend
    let reply = match options.model_kind {
        ModelKind::Openai => {
            let client = OpenAiClient::from_env(&options.model_name)?;

            // Refuse transcripts that clearly exceed the context window
            // before spending API tokens on a truncated prompt
            let total = prompt::estimate_tokens(&prompt_text);
            let limit = prompt::context_limit(&options.model_name);
            if total > limit {
                return Err(Error::InvalidInput(format!(
                    "Transcript is too long (about {} tokens) for the model \
                     context limit ({} tokens). Shorten the transcript or use \
                     a model with a larger context window.",
                    total, limit
                )));
            }

            println!(
                "Processing the transcript using OpenAI model '{}'...",
                options.model_name
            );
            generate(&client, &prompt_text)
        }
        ModelKind::Ollama => {
            let client = OllamaClient::new(&options.ollama_host, &options.model_name);
            println!(
                "Processing the transcript using Ollama model '{}'...",
                options.model_name
            );
            let reply = generate(&client, &prompt_text);
            // Echo the raw local-model reply so bad output is easy to debug
            if let Some(text) = &reply {
                println!("{}", text);
            }
            reply
        }
    };

    // 4. Parse the reply. A failed API call was logged above and parses
    //    to zero cards, which is not fatal (best-effort run).
    let cards = match reply {
        Some(text) => parse_flashcards(&text),
        None => Vec::new(),
    };

    if cards.is_empty() {
        println!("No flashcards were generated.");
        return Ok(());
    }

    // 5. Write the Anki import file
    anki::write_deck(&options.output, &cards, &options.tags)?;
    println!(
        "Generated {} flashcards. Saved to '{}'.",
        cards.len(),
        options.output.display()
    );
    Ok(())
}

/// Best-effort call: API errors are logged, not fatal
fn generate(client: &dyn Generator, prompt: &str) -> Option<String> {
    match client.generate(prompt) {
        Ok(reply) => Some(reply),
        Err(e) => {
            error!("Flashcard generation failed: {}", e);
            None
        }
    }
}
