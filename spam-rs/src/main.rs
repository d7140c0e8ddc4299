//! spam-rs command line
//!
//! # Usage
//!
//! ```bash
//! # Train on one corpus, classify another, score it if it has a truth file
//! spam-rs run --train data/1 --test data/2
//!
//! # Show training statistics
//! spam-rs train data/1
//!
//! # Score an existing !prediction.txt against !truth.txt
//! spam-rs evaluate data/2
//!
//! # Train/test both ways between two corpora
//! spam-rs cross data/1 data/2
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use spam_rs::config::FilterConfig;
use spam_rs::quality::{self, Evaluation};
use spam_rs::{Label, SpamFilter, TestReport};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spam-rs")]
#[command(about = "Naive Bayes spam filter for mail corpora", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on one corpus and classify another
    Run {
        /// Corpus with a truth file
        #[arg(long)]
        train: PathBuf,
        /// Corpus to classify
        #[arg(long)]
        test: PathBuf,
    },
    /// Train and print model statistics
    Train {
        /// Corpus with a truth file
        dir: PathBuf,
    },
    /// Score a corpus prediction file against its truth file
    Evaluate {
        /// Corpus with truth and prediction files
        dir: PathBuf,
    },
    /// Train on each corpus and test on the other
    Cross {
        first: PathBuf,
        second: PathBuf,
    },
}

/// Report of one train/test round
#[derive(Serialize)]
struct RunReport {
    train: PathBuf,
    test: PathBuf,
    alpha: f64,
    spam: usize,
    ham: usize,
    mean_word_probability: Option<f64>,
    evaluation: Option<Evaluation>,
}

fn init_logging(config: &FilterConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("spam_rs={}", config.logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run_round(config: &FilterConfig, train: &Path, test: &Path) -> anyhow::Result<RunReport> {
    let mut filter = SpamFilter::new(config.clone())?;
    filter
        .train(train)
        .with_context(|| format!("training on {}", train.display()))?;

    let report: TestReport = filter
        .test(test)
        .with_context(|| format!("testing on {}", test.display()))?;

    let evaluation = if test.join(&config.corpus.truth_file).exists() {
        Some(quality::evaluate_with(test, config)?)
    } else {
        info!("No truth file in {}, skipping evaluation", test.display());
        None
    };

    Ok(RunReport {
        train: train.to_path_buf(),
        test: test.to_path_buf(),
        alpha: report.alpha,
        spam: report.count(Label::Spam),
        ham: report.count(Label::Ham),
        mean_word_probability: report.mean_word_probability,
        evaluation,
    })
}

fn print_round(report: &RunReport) {
    println!("Trained on: {}", report.train.display());
    println!("Tested on:  {}", report.test.display());
    println!("Alpha:      {:.4}", report.alpha);
    println!("Predicted:  {} spam, {} ham", report.spam, report.ham);
    if let Some(evaluation) = &report.evaluation {
        print_evaluation(evaluation);
    }
}

fn print_evaluation(evaluation: &Evaluation) {
    let counts = evaluation.counts;
    println!(
        "Confusion:  tp={} tn={} fp={} fn={}",
        counts.tp, counts.tn, counts.fp, counts.fn_
    );
    println!("Quality:    {:.4}", evaluation.quality);
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FilterConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => FilterConfig::default(),
    };

    init_logging(&config);
    info!("Starting spam-rs v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run { train, test } => {
            let report = run_round(&config, &train, &test)?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_round(&report);
            }
        }
        Commands::Train { dir } => {
            let mut filter = SpamFilter::new(config)?;
            let summary = filter.train(&dir)?.summary();
            if cli.json {
                print_json(&summary)?;
            } else {
                println!("Spam documents:  {}", summary.spam_documents);
                println!("Ham documents:   {}", summary.ham_documents);
                println!("Spam tokens:     {}", summary.spam_tokens);
                println!("Ham tokens:      {}", summary.ham_tokens);
                println!("Vocabulary size: {}", summary.vocabulary_size);
                println!("Spam fraction:   {:.4}", summary.spam_fraction);
            }
        }
        Commands::Evaluate { dir } => {
            let evaluation = quality::evaluate_with(&dir, &config)?;
            if cli.json {
                print_json(&evaluation)?;
            } else {
                print_evaluation(&evaluation);
            }
        }
        Commands::Cross { first, second } => {
            let rounds = vec![
                run_round(&config, &first, &second)?,
                run_round(&config, &second, &first)?,
            ];
            if cli.json {
                print_json(&rounds)?;
            } else {
                for (i, round) in rounds.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    print_round(round);
                }
            }
        }
    }

    Ok(())
}
