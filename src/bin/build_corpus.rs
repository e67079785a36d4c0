//! Turns a plain-text guide into the retrieval corpus the mentor chat reads.

use std::{fs, io, path::PathBuf};

use clap::Parser;
use tracing::info;

use creative_network::rag::{chunk_text, WORDS_PER_CHUNK};

#[derive(Parser)]
#[command(name = "build-corpus")]
#[command(about = "Split extracted guide text into retrieval chunks")]
struct Cli {
    /// Plain-text input, e.g. text extracted from a PDF
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "rag_pdf_chunks.json")]
    output: PathBuf,

    /// Words per chunk
    #[arg(short, long, default_value_t = WORDS_PER_CHUNK)]
    words: usize,
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.input)?;
    let chunks = chunk_text(&text, cli.words);
    let json = serde_json::to_string_pretty(&chunks).map_err(io::Error::from)?;
    fs::write(&cli.output, json)?;

    info!("Wrote {} chunks to {}", chunks.len(), cli.output.display());
    Ok(())
}
