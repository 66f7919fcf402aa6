//! Transcribe text, a text file, an HTML file or a directory to spoken IPA.
//!
//! Usage:
//!   spoken_ipa "I want to go."
//!   spoken_ipa --file book.txt --output book.ipa.txt
//!   spoken_ipa --file --html page.html --output page.ipa.html --resume
//!   spoken_ipa --file books/ --output ipa_books/
//!
//! Set `RUST_LOG=debug` for per-batch logging.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use spoken_ipa::config::TranscriptionConfig;
use spoken_ipa::pipeline::plain::literal_lines;
use spoken_ipa::pipeline::{
    transcribe_directory, transcribe_file, transcribe_html, transcribe_lines, Transcriber,
};
use spoken_ipa::Result;

/// Convert English text into reduced, spoken-style IPA
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input text, or a file/directory path with --file
    data: String,

    /// Treat DATA as a file or directory path. A directory requires --output
    /// to name an output directory
    #[arg(short, long)]
    file: bool,

    /// Output file or directory; standard output if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Process an HTML file, transcribing only paragraph text
    #[arg(long)]
    html: bool,

    /// Resume from the last checkpoint
    #[arg(short, long, requires = "output")]
    resume: bool,

    /// Path to the flite binary
    #[arg(long, default_value = "flite/bin/flite")]
    flite: PathBuf,

    /// Utterances per phonemizer batch
    #[arg(long, default_value_t = TranscriptionConfig::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Concurrent phonemizer calls
    #[arg(long, default_value_t = TranscriptionConfig::DEFAULT_MAX_WORKERS)]
    workers: usize,

    /// Repair common OCR misreads before transcribing
    #[arg(long)]
    repair_ocr: bool,
}

impl Cli {
    fn config(&self) -> TranscriptionConfig {
        TranscriptionConfig::new()
            .with_phonemizer_path(self.flite.clone())
            .with_batch_size(self.batch_size)
            .with_max_workers(self.workers)
            .with_resume(self.resume)
            .with_repair_ocr(self.repair_ocr)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let transcriber = Transcriber::from_config(&config);
    let output = cli.output.as_deref();

    if cli.html {
        return transcribe_html(&transcriber, Path::new(&cli.data), output, &config);
    }
    if !cli.file {
        return transcribe_lines(&transcriber, literal_lines(&cli.data), output, &config);
    }

    let input = PathBuf::from(&cli.data);
    if input.is_dir() {
        let Some(output_dir) = output else {
            return Err(spoken_ipa::Error::InvalidInput(
                "when a directory is given, --output must name an output directory".to_string(),
            ));
        };
        return transcribe_directory(&transcriber, &input, output_dir, &config);
    }
    transcribe_file(&transcriber, &input, output, &config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
