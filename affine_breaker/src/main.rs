use std::error::Error;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use affine_digraph::{
    decrypt, encrypt, Alphabet, AffineKey, CandidateSearch, CrackerConfig, Digraph,
    PairingStrategy, PlausibilityThresholds, Recovery,
};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Symbols shown before asking whether to keep a candidate.
const PREVIEW_LENGTH: usize = 40;

/// Command-line arguments for the affine digraph breaker.
#[derive(Parser, Debug)]
#[command(version, about = "Recovers affine digraph cipher keys from ciphertext alone")]
struct Cli {
    /// Mode of operation
    #[arg(short, long, value_enum, default_value = "crack", help = "Mode of operation (crack/encrypt/decrypt)")]
    mode: OperationMode,

    /// Path to the input file
    #[arg(short, long, help = "Path to the input file")]
    file: String,

    /// Path to the output file
    #[arg(short, long, help = "Path to the output file (crack defaults to text_decrypted.in)")]
    output: Option<String>,

    /// Multiplicative key component (encrypt/decrypt)
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    key_a: Option<i64>,

    /// Additive key component (encrypt/decrypt)
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    key_b: Option<i64>,

    /// Show a preview of each plausible text and ask before saving it
    #[arg(short, long)]
    confirm: bool,

    /// Ordered alphabet symbols (defaults to the 31-letter Russian alphabet)
    #[arg(long)]
    alphabet: Option<String>,

    /// Comma-separated plaintext digraphs assumed to be most common
    #[arg(long, value_delimiter = ',')]
    reference: Vec<String>,

    /// Number of top ciphertext digraphs to pair against the references
    #[arg(long, default_value_t = affine_digraph::config::DEFAULT_TOP_DIGRAPHS)]
    top: usize,

    /// Symbol entropy bound in bits
    #[arg(long, default_value_t = PlausibilityThresholds::default().symbol_entropy)]
    symbol_entropy: f64,

    /// Digraph entropy bound in bits per symbol
    #[arg(long, default_value_t = PlausibilityThresholds::default().digraph_entropy)]
    digraph_entropy: f64,

    /// Which ranked ciphertext digraphs are paired
    #[arg(long, value_enum, default_value = "adjacent")]
    pairing: Pairing,

    /// Give up after this many candidate keys
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Enum representing the mode of operation.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OperationMode {
    /// Recover the key from ciphertext alone
    Crack,
    /// Encrypt with a known key
    Encrypt,
    /// Decrypt with a known key
    Decrypt,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pairing {
    Adjacent,
    AllPairs,
}

impl From<Pairing> for PairingStrategy {
    fn from(pairing: Pairing) -> Self {
        match pairing {
            Pairing::Adjacent => PairingStrategy::Adjacent,
            Pairing::AllPairs => PairingStrategy::AllPairs,
        }
    }
}

/// Main entry point for the affine digraph breaker.
fn main() -> Result<(), Box<dyn Error>> {
    let cli: Cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let start = Instant::now();
    let config = build_config(&cli)?;
    let text = read_text(&cli.file)?;
    tracing::info!(symbols = text.chars().count(), "read {}", cli.file);

    match cli.mode {
        OperationMode::Crack => crack(&cli, &config, &text)?,
        OperationMode::Encrypt | OperationMode::Decrypt => {
            let key = AffineKey::new(
                cli.key_a.ok_or("--key-a is required for encrypt/decrypt")?,
                cli.key_b.ok_or("--key-b is required for encrypt/decrypt")?,
            );
            let result = match cli.mode {
                OperationMode::Encrypt => encrypt(&text, key, &config.alphabet)?,
                _ => decrypt(&text, key, &config.alphabet)?,
            };
            write_or_print(cli.output.as_deref(), &result)?;
        }
    }

    println!("Work time: {:.5} s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Builds the search configuration from the command-line overrides.
fn build_config(cli: &Cli) -> Result<CrackerConfig, Box<dyn Error>> {
    let mut config = CrackerConfig::default();

    if let Some(symbols) = &cli.alphabet {
        config.alphabet = Alphabet::new(symbols)?;
    }

    if !cli.reference.is_empty() {
        config.reference_digraphs = cli
            .reference
            .iter()
            .map(|s| s.trim().parse::<Digraph>())
            .collect::<Result<Vec<Digraph>, _>>()?;
    }

    let config = config
        .with_top_digraphs(cli.top)
        .with_thresholds(PlausibilityThresholds {
            symbol_entropy: cli.symbol_entropy,
            digraph_entropy: cli.digraph_entropy,
        })
        .with_pairing(cli.pairing.into())
        .with_max_candidates(cli.max_candidates);

    config.validate()?;
    Ok(config)
}

/// Reads the input file with line separators stripped.
fn read_text(path: &str) -> Result<String, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read the input file {}: {}", path, e))?;

    Ok(content.chars().filter(|&c| c != '\n' && c != '\r').collect())
}

fn write_or_print(output: Option<&str>, text: &str) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .map_err(|e| format!("Failed to write the output file {}: {}", path, e))?;
            println!("Output saved to: {}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Searches for the key and saves the first accepted plaintext.
fn crack(cli: &Cli, config: &CrackerConfig, ciphertext: &str) -> Result<(), Box<dyn Error>> {
    let mut search = CandidateSearch::new(config, ciphertext)?;

    while let Some(recovery) = search.next_plausible() {
        if cli.confirm && !ask_to_save(&recovery)? {
            continue;
        }

        let path = cli.output.as_deref().unwrap_or("text_decrypted.in");
        write_or_print(Some(path), &recovery.plaintext)?;
        println!("Key = {}", recovery.key);
        return Ok(());
    }

    println!("No key found ({} candidates tried)", search.candidates_tried());
    Ok(())
}

/// Shows the start of a candidate plaintext and asks whether to keep it.
fn ask_to_save(recovery: &Recovery) -> Result<bool, Box<dyn Error>> {
    println!("{}", recovery.preview(PREVIEW_LENGTH));
    print!("Save text (yes/no)? ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim() == "yes")
}
