use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cards;
mod commands;
mod error;
mod llm;
mod podcast;
mod utils;

use llm::ModelKind;

const LONG_ABOUT: &str = "\
Earmark turns a personal podcast archive into study material.

It reads a Podcast Addict database export together with an OPML subscription
list, re-downloads the episodes you have already listened to from their
original RSS feeds, and can turn an episode transcript into Anki flashcards
by calling an LLM completion API (OpenAI in the cloud, or a local Ollama
server).

Every command is a one-shot batch run: read input, transform, write output,
exit. Nothing is kept between runs apart from the files on disk.";

const AFTER_HELP: &str = "\
EXAMPLES:
    Archive every listened episode next to the database export:
        $ earmark download

    Use explicit paths:
        $ earmark download --database backup.db --opml podcasts.opml --out-dir archive

    Generate flashcards with a local Ollama model:
        $ earmark flashcards --transcript ep1.txt --output ep1_cards.txt

    Generate flashcards with OpenAI (needs OPENAI_API_KEY):
        $ earmark flashcards --model-type openai --model-name gpt-4 --transcript ep1.txt

    Check what a database export contains:
        $ earmark inspect --database backup.db

WORKFLOW:
    1. Export the database and OPML list from Podcast Addict
    2. Run 'earmark inspect' to confirm the export looks sane
    3. Run 'earmark download' to archive the listened episodes
    4. Transcribe an episode, then run 'earmark flashcards' on the transcript
    5. Import the resulting file into Anki (File > Import, tab-separated)

LOGGING:
    Diagnostics go to stderr; set the RUST_LOG environment variable to
    change verbosity (default: info).";

#[derive(Parser)]
#[command(name = "earmark")]
#[command(version)]
#[command(about = "Archive listened podcast episodes and turn transcripts into Anki flashcards")]
#[command(long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download listened episodes from their original RSS feeds
    #[command(
        long_about = "\
Download listened episodes from their original RSS feeds.

Reads the episodes marked as listened (seen_status = 1) from the database
export, keeps those whose podcast also appears in the OPML subscription
list, fetches each podcast's RSS feed once, and downloads the matching
audio enclosures into one directory per podcast.

Episodes already present on disk are skipped, so the command can be re-run
after an interrupted session. A failing feed or episode is logged and the
run continues with the next one.",
        after_help = "\
EXAMPLES:
    $ earmark download
    $ earmark download --database backup.db --out-dir archive

OUTPUT:
    Processing podcast: History Pod
    Downloading: Rome Falls (2024-12-02)
    Downloaded: Rome Falls
    Episode already downloaded: Rome Rises
    Done: 1 downloaded, 1 already present, 0 failed."
    )]
    Download {
        /// Podcast Addict database export
        #[arg(long, default_value = "database.db")]
        database: PathBuf,

        /// OPML subscription list export
        #[arg(long, default_value = "podcasts.opml")]
        opml: PathBuf,

        /// Directory receiving one subdirectory per podcast
        #[arg(long, default_value = "downloaded_podcasts")]
        out_dir: PathBuf,
    },

    /// Turn a transcript into Anki flashcards via an LLM
    #[command(
        long_about = "\
Turn a transcript into Anki flashcards via an LLM.

Reads the transcript, asks the selected model for Question/Answer pairs,
parses the free-form reply into flashcard records, and writes them as a
tab-separated file Anki can import directly. Preamble, enumeration, and
multi-line answers in the model reply are handled.

With --model-type openai the OPENAI_API_KEY environment variable must be
set, and the transcript is rejected up front when it clearly exceeds the
model's context window. With --model-type ollama a local Ollama server is
called; the raw model reply is echoed so bad output is easy to debug.",
        after_help = "\
EXAMPLES:
    $ earmark flashcards --transcript ep1.txt
    $ earmark flashcards --model-type openai --model-name gpt-4 \\
          --transcript ep1.txt --output ep1_cards.txt --tags \"history rome\"

OUTPUT:
    Processing the transcript using Ollama model 'llama3.1:8b'...
    Generated 24 flashcards. Saved to 'flashcards.txt'."
    )]
    Flashcards {
        /// Transcript text file to generate cards from
        #[arg(long, default_value = "transcript.txt")]
        transcript: PathBuf,

        /// Output file for Anki import (tab-separated)
        #[arg(long, default_value = "flashcards.txt")]
        output: PathBuf,

        /// Completion backend to use
        #[arg(long, value_enum, default_value_t = ModelKind::Ollama)]
        model_type: ModelKind,

        /// Model to ask for flashcards
        #[arg(long, default_value = "llama3.1:8b")]
        model_name: String,

        /// Space-separated tags written as the first line of the deck
        #[arg(long, default_value = "")]
        tags: String,

        /// Base URL of the local Ollama server
        #[arg(long, default_value = "http://localhost:11434")]
        ollama_host: String,
    },

    /// Dump database schema and the listened-episode listing
    #[command(
        long_about = "\
Dump database schema and the listened-episode listing.

Prints the columns of the 'podcasts' and 'episodes' tables as reported by
PRAGMA table_info, then every listened episode grouped under its podcast.
Useful when a new Podcast Addict version changes the export schema.",
        after_help = "\
EXAMPLES:
    $ earmark inspect
    $ earmark inspect --database backup.db

OUTPUT:
    Columns in 'podcasts' table:
     - _id (INTEGER)
     - name (TEXT)
     - rssUrl (TEXT)
    ...
    Podcast: History Pod
     - Rome Falls"
    )]
    Inspect {
        /// Podcast Addict database export
        #[arg(long, default_value = "database.db")]
        database: PathBuf,
    },
}

fn main() {
    // Keep the handle alive for the whole run; dropping it stops logging
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.start())
        .ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Download {
            database,
            opml,
            out_dir,
        } => {
            let options = commands::download::DownloadOptions {
                database,
                opml,
                out_dir,
            };
            commands::download::run(options)
        }
        Commands::Flashcards {
            transcript,
            output,
            model_type,
            model_name,
            tags,
            ollama_host,
        } => {
            let options = commands::flashcards::FlashcardOptions {
                transcript,
                output,
                model_kind: model_type,
                model_name,
                tags,
                ollama_host,
            };
            commands::flashcards::run(options)
        }
        Commands::Inspect { database } => commands::inspect::run(&database),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
