use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use serde_json::json;
use wordbpe::{CorpusItem, MergeConfig, VocabularyBuilder};

const DEFAULT_VOCAB_SIZE: usize = 1000;

#[derive(Parser, Debug)]
#[command(author, version, about = "BPE vocabulary builder", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a vocabulary from WORD:FREQ pairs
    Build(BuildArgs),
    /// Run the bundled sample corpora with progress output
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Corpus entries formatted as WORD:FREQ
    #[arg(required = true, value_name = "WORD:FREQ")]
    corpus: Vec<CorpusItem>,

    /// Target vocabulary size
    #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_VOCAB_SIZE)]
    vocab_size: usize,

    /// Weight bigram counts by word frequency
    #[arg(long)]
    weighted: bool,

    /// Minimum bigram count for a merge
    #[arg(long, value_name = "COUNT")]
    min_frequency: Option<u64>,

    /// Maximum merged symbol length in characters
    #[arg(long, value_name = "LEN")]
    max_symbol_len: Option<usize>,

    /// Maximum merge iterations
    #[arg(long, value_name = "COUNT")]
    max_merges: Option<usize>,

    /// Disable per-merge logging
    #[arg(long)]
    no_progress: bool,

    /// Emit a JSON report instead of one symbol per line
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Weight bigram counts by word frequency
    #[arg(long)]
    weighted: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Demo(args) => run_demo(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_build(args: BuildArgs) -> Result<()> {
    let mut cfg = MergeConfig::builder()
        .target_vocab_size(args.vocab_size)
        .weight_by_frequency(args.weighted)
        .max_symbol_len(args.max_symbol_len)
        .max_merges(args.max_merges)
        .show_progress(!args.no_progress);
    if let Some(min_frequency) = args.min_frequency {
        cfg = cfg.min_frequency(min_frequency);
    }
    let cfg = cfg.build().context("invalid build configuration")?;

    let mut builder = VocabularyBuilder::with_config(args.corpus, cfg)?;
    let vocabulary = builder
        .build_vocabulary()
        .context("vocabulary build failed")?;

    if args.json {
        let report = json!({
            "alphabet_size": builder.alphabet_len(),
            "vocabulary": vocabulary,
            "merges": builder.merges(),
            "stop_reason": builder.stop_reason(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for symbol in &vocabulary {
            println!("{symbol}");
        }
    }
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let samples: [&[(&str, u64)]; 2] = [
        &[("low", 5), ("lower", 2), ("newest", 6), ("widest", 3)],
        &[
            ("hug", 10),
            ("pug", 5),
            ("pun", 12),
            ("hugs", 5),
            ("pugs", 3),
            ("puns", 10),
        ],
    ];

    for (index, sample) in samples.iter().enumerate() {
        info!("sample {}", index + 1);
        let cfg = MergeConfig::builder()
            .target_vocab_size(DEFAULT_VOCAB_SIZE)
            .weight_by_frequency(args.weighted)
            .show_progress(true)
            .build()?;
        let corpus = sample.iter().copied().map(CorpusItem::from);
        let mut builder = VocabularyBuilder::with_config(corpus, cfg)?;
        let vocabulary = builder.build_vocabulary()?;
        println!("sample {}: {}", index + 1, vocabulary.join(" "));
    }
    Ok(())
}
