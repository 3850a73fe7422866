mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use trag_ai::answer::synthesize_answer;
use trag_ai::embeddings::ollama_embed::OllamaEmbedder;
use trag_ai::index::{IndexBuildInput, IndexStore};
use trag_ai::llm::gemini::{GeminiClient, DEFAULT_GENERATION_MODEL};
use trag_ai::ollama::OllamaClient;
use trag_ai::retrieve::retrieve;
use trag_core::chunk::{chunk_text, DEFAULT_CHUNK_SIZE};
use trag_core::corpus::CorpusStore;
use trag_core::normalize::{clean_text, NormalizeOptions};

#[derive(Parser)]
#[command(name = "trag", about = "Textbook RAG pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract raw text from a textbook PDF
    Extract {
        /// Path to the PDF
        pdf: PathBuf,
        /// Where to write the raw extracted text
        #[arg(long)]
        output: PathBuf,
    },

    /// Strip boilerplate lines from raw extracted text
    Clean {
        /// Raw text file (from `extract`)
        input: PathBuf,
        /// Where to write the cleaned text
        #[arg(long)]
        output: PathBuf,
        /// Minimum kept line length in characters
        #[arg(long, default_value_t = 3)]
        min_line_len: usize,
    },

    /// Split cleaned text into sentence-window chunks and persist the corpus
    Chunk {
        /// Cleaned text file (from `clean`)
        input: PathBuf,
        /// Directory holding the persisted corpus and index
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Sentences per chunk
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Embed every chunk and build the vector index
    Index {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Embedding model served by the local Ollama instance
        #[arg(long, default_value = "nomic-embed-text")]
        embed_model: String,
        #[arg(long, default_value = "http://127.0.0.1:11434")]
        ollama_url: String,
    },

    /// Retrieve the nearest chunks for a question (no generation)
    Search {
        question: String,
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Number of chunks to retrieve
        #[arg(long, default_value_t = 5)]
        top_k: u32,
        #[arg(long, default_value = "http://127.0.0.1:11434")]
        ollama_url: String,
    },

    /// Retrieve context and ask the generation service for an answer
    Ask {
        question: String,
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Number of context chunks to retrieve
        #[arg(long, default_value_t = 5)]
        top_k: u32,
        #[arg(long, default_value = "http://127.0.0.1:11434")]
        ollama_url: String,
        /// Hosted generation model (credential from GEMINI_API_KEY)
        #[arg(long, default_value = DEFAULT_GENERATION_MODEL)]
        generation_model: String,
        /// Also print the retrieved chunks before the answer
        #[arg(long)]
        show_chunks: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { pdf, output } => {
            let text = extract::extract_pdf_text(&pdf)?;
            write_text(&output, &text)?;
            log::info!("extracted {} bytes to {}", text.len(), output.display());
        }

        Command::Clean {
            input,
            output,
            min_line_len,
        } => {
            let raw = read_text(&input)?;
            let cleaned = clean_text(&raw, &NormalizeOptions { min_line_len });
            write_text(&output, &cleaned)?;
            log::info!(
                "kept {} lines, wrote {}",
                cleaned.lines().count(),
                output.display()
            );
        }

        Command::Chunk {
            input,
            data_dir,
            chunk_size,
        } => {
            let text = read_text(&input)?;
            let chunks = chunk_text(&text, chunk_size)?;
            let corpus = CorpusStore::open(data_dir);
            let records = corpus.write_chunks(&chunks)?;
            log::info!(
                "wrote {} chunks ({} sentences per chunk) to {}",
                records.len(),
                chunk_size,
                corpus.root().display()
            );
        }

        Command::Index {
            data_dir,
            embed_model,
            ollama_url,
        } => {
            let client = OllamaClient::new(&ollama_url)?;
            client.health_check()?;
            let embedder = OllamaEmbedder::new(client);

            let corpus = CorpusStore::open(data_dir.clone());
            let index = IndexStore::open(data_dir);
            let status = index.build_with_embedder(
                &corpus,
                &embedder,
                IndexBuildInput {
                    model: embed_model,
                    updated_at: now_rfc3339_utc()?,
                },
            )?;
            log::info!(
                "indexed {} chunks ({} dims, model {})",
                status.chunk_count,
                status.dims.unwrap_or(0),
                status.model.as_deref().unwrap_or("?")
            );
        }

        Command::Search {
            question,
            data_dir,
            top_k,
            ollama_url,
        } => {
            let hits = retrieve_chunks(&data_dir, &ollama_url, &question, top_k)?;
            for hit in hits {
                println!("[{}] distance={:.4}\n{}\n", hit.ordinal, hit.distance, hit.text);
            }
        }

        Command::Ask {
            question,
            data_dir,
            top_k,
            ollama_url,
            generation_model,
            show_chunks,
        } => {
            // Fail on a missing credential before any retrieval work.
            let llm = GeminiClient::from_env(&generation_model)?;

            let hits = retrieve_chunks(&data_dir, &ollama_url, &question, top_k)?;
            if show_chunks {
                for hit in hits.iter() {
                    println!("[{}] distance={:.4}\n{}\n", hit.ordinal, hit.distance, hit.text);
                }
            }

            let context: Vec<String> = hits.into_iter().map(|h| h.text).collect();
            let answer = synthesize_answer(&llm, &question, &context)?;
            println!("{answer}");
        }
    }

    Ok(())
}

fn retrieve_chunks(
    data_dir: &Path,
    ollama_url: &str,
    question: &str,
    top_k: u32,
) -> anyhow::Result<Vec<trag_ai::retrieve::RetrievedChunk>> {
    let client = OllamaClient::new(ollama_url)?;
    let embedder = OllamaEmbedder::new(client);
    let corpus = CorpusStore::open(data_dir.to_path_buf());
    let index = IndexStore::open(data_dir.to_path_buf());
    Ok(retrieve(&corpus, &index, &embedder, question, top_k)?)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    fs::write(path, text.as_bytes()).with_context(|| format!("failed to write {}", path.display()))
}

fn now_rfc3339_utc() -> anyhow::Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("failed to format current time")
}
