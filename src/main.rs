use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;

use wordtok::commands::{self, DecodeConfig, EncodeConfig, TrainConfig, DEFAULT_TOKENIZER_PATH};
use wordtok::output;
use wordtok::tokenizer::DEFAULT_MIN_FREQUENCY;

/// Custom word-level tokenizer
#[derive(Parser)]
#[command(name = "wordtok", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train tokenizer on text file
    Train {
        /// Input text file (defaults to a built-in sample)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output tokenizer file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_TOKENIZER_PATH)]
        output: PathBuf,

        /// Minimum token frequency
        #[arg(short, long = "min-freq", value_name = "NUMBER", default_value_t = DEFAULT_MIN_FREQUENCY)]
        min_freq: usize,
    },
    /// Encode text to token IDs
    Encode {
        /// Tokenizer file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_TOKENIZER_PATH)]
        tokenizer: PathBuf,

        /// Add special tokens
        #[arg(short, long)]
        special: bool,

        /// Text to encode
        text: String,
    },
    /// Decode token IDs to text
    Decode {
        /// Tokenizer file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_TOKENIZER_PATH)]
        tokenizer: PathBuf,

        /// Keep special tokens in output
        #[arg(short, long)]
        keep_special: bool,

        /// Comma-separated token IDs
        ids: String,
    },
    /// Show tokenizer statistics
    Stats {
        /// Tokenizer file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_TOKENIZER_PATH)]
        tokenizer: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Train {
            input,
            output,
            min_freq,
        } => commands::train(&TrainConfig::new(input, output, min_freq)).map(drop),
        Commands::Encode {
            tokenizer,
            special,
            text,
        } => commands::encode(&EncodeConfig::new(tokenizer, text, special)).map(drop),
        Commands::Decode {
            tokenizer,
            keep_special,
            ids,
        } => commands::decode(&DecodeConfig::new(tokenizer, ids, keep_special)).map(drop),
        Commands::Stats { tokenizer } => commands::stats(&tokenizer).map(drop),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::FAILURE
        }
    }
}
