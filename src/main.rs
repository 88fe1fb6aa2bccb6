use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use docintegrity::config::Config;
use docintegrity::corpus::extract::extractor_for;
use docintegrity::corpus::loader::list_files;
use docintegrity::embedding::registry;
use docintegrity::embedding::vectors::WordVectors;
use docintegrity::output::terminal;
use docintegrity::pipeline::{self, CheckOptions};

/// docintegrity: find near-duplicate sentences across a folder of documents.
///
/// Every sentence of every document is compared with every sentence of every
/// other document using Word Mover's Distance over pretrained word vectors.
#[derive(Parser)]
#[command(name = "docintegrity", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the documents in a folder and report near-duplicate sentences
    Check {
        /// Folder containing the documents to compare
        folder: PathBuf,

        /// Folder to save the CSV results in (results are not saved if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Maximum distance for a match; lower is stricter (default: 0.2)
        #[arg(long)]
        threshold: Option<f64>,

        /// Embedding model to use (default: glove-wiki-gigaword-100)
        #[arg(long)]
        model: Option<String>,

        /// Use a local word2vec text file instead of a downloaded model
        #[arg(long, conflicts_with = "model")]
        model_path: Option<PathBuf>,

        /// Minimum sentence length in characters (default: 20)
        #[arg(long)]
        min_length: Option<usize>,

        /// Extension of the documents to compare (default: .docx)
        #[arg(long)]
        extension: Option<String>,

        /// Only load the first N words of the model
        #[arg(long)]
        vocab_limit: Option<usize>,

        /// Number of matches to show in the terminal (default: 20)
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Download an embedding model into the local cache
    DownloadModel {
        /// Model to download (default: glove-wiki-gigaword-100)
        #[arg(long)]
        model: Option<String>,
    },

    /// List the available embedding models
    Models,

    /// List the documents a check would compare
    Files {
        /// Folder containing the documents
        folder: PathBuf,

        /// Extension of the documents to list (default: .docx)
        #[arg(long)]
        extension: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("docintegrity=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            folder,
            output,
            threshold,
            model,
            model_path,
            min_length,
            extension,
            vocab_limit,
            top,
        } => {
            let mut config = Config::load()?;
            if let Some(threshold) = threshold {
                config.distance_threshold = threshold;
            }
            if let Some(model) = model {
                config.model_name = model;
            }
            if let Some(min_length) = min_length {
                config.min_sentence_length = min_length;
            }
            if let Some(extension) = extension {
                config.file_extension = extension;
            }
            config.require_valid_threshold()?;
            let extractor = extractor_for(&config.file_extension)?;

            // The model is resolved before any document is read, so a bad
            // model name fails the run without side effects.
            let vectors_file = match model_path {
                Some(path) => path,
                None => config.model_store().resolve(&config.model_name).await?,
            };
            let vectors = load_vectors(&vectors_file, vocab_limit)?;
            info!(
                words = vectors.len(),
                dimension = vectors.dimension(),
                "Word vectors loaded"
            );

            let options = CheckOptions {
                folder,
                output_dir: output,
                threshold: config.distance_threshold,
                load: config.load_options(),
                show_progress: true,
            };
            let report = pipeline::run(&options, extractor.as_ref(), &vectors)?;

            terminal::display_matches(&report.matches, top);

            println!("\n{}", "Check complete.".bold());
            println!("  Documents:        {}", report.documents);
            println!("  Sentences:        {}", report.sentences);
            println!("  Sentence pairs:   {}", report.comparisons);
            println!(
                "  Matches (< {}):  {}",
                config.distance_threshold,
                report.matches.len()
            );

            match &report.output_file {
                Some(path) => println!(
                    "\n{}",
                    format!("The output was saved in {}.", path.display()).bold()
                ),
                None => println!(
                    "\n{}",
                    "Results were not saved. Pass --output <DIR> to write a CSV.".dimmed()
                ),
            }
        }

        Commands::DownloadModel { model } => {
            let config = Config::load()?;
            let name = model.unwrap_or(config.model_name.clone());
            let info = registry::lookup(&name)?;
            let store = config.model_store();

            if store.is_cached(info) {
                println!("{} is already downloaded.", info.name);
                println!("  Location: {}", store.model_path(info).display());
                return Ok(());
            }

            println!("  Destination: {}", store.model_path(info).display());
            store.download(info).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `docintegrity check <FOLDER> --model {name}`.");
        }

        Commands::Models => {
            let config = Config::load()?;
            terminal::display_models(&config.model_store());
        }

        Commands::Files { folder, extension } => {
            let config = Config::load()?;
            let extension = extension.unwrap_or(config.file_extension);
            let files = list_files(&folder, &extension)?;
            terminal::display_files(&folder, &files);
        }
    }

    Ok(())
}

/// Parse a vector file behind a spinner; large models take a while.
fn load_vectors(path: &Path, limit: Option<usize>) -> Result<WordVectors> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(format!("Loading word vectors from {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = WordVectors::load(path, limit);
    spinner.finish_and_clear();
    result
}
