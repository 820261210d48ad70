use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use console::style;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use perplexity_guard::chart::{render_report, TerminalChart};
use perplexity_guard::config::{Config, ConfigLayer};
use perplexity_guard::{check_input, Analyzer, Error, FileCorpus, UnigramModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "perplexity-guard",
    about = "Estimate whether text was produced by a language model",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Read paragraphs from stdin, analyzing each one after a blank line
    #[arg(short, long, conflicts_with = "files")]
    interactive: bool,

    /// Plain-text reference corpus to train the unigram model on
    #[arg(long, env = "PERPLEXITY_GUARD_CORPUS")]
    corpus: Option<PathBuf>,

    /// Extra TOML config file, applied after the user and project configs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Perplexity must be below this for text to count as generated
    #[arg(long, env = "PERPLEXITY_GUARD_MAX_PERPLEXITY")]
    max_perplexity: Option<f64>,

    /// Burstiness must be below this for text to count as generated
    #[arg(long, env = "PERPLEXITY_GUARD_MAX_BURSTINESS")]
    max_burstiness: Option<f64>,

    /// Width in columns of the longest chart bar
    #[arg(long)]
    bar_width: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            max_perplexity: self.max_perplexity,
            max_burstiness: self.max_burstiness,
            corpus_path: self.corpus.clone(),
            bar_width: self.bar_width,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.merge(cli.overrides())?;

    let trained;
    let model = match &config.corpus_path {
        Some(path) => {
            let corpus = FileCorpus::new(path);
            trained = UnigramModel::train(&corpus).with_context(|| {
                format!("failed to train on corpus {}", corpus.path().display())
            })?;
            &trained
        }
        None => UnigramModel::shared(),
    };
    let analyzer = Analyzer::new(model, config.thresholds);

    if cli.interactive {
        run_interactive(&analyzer, cli.format, config.bar_width)?;
        return Ok(ExitCode::SUCCESS);
    }

    let inputs: Vec<(String, String)> = if cli.files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        vec![("<stdin>".to_string(), input)]
    } else {
        cli.files
            .iter()
            .map(|path| {
                std::fs::read_to_string(path)
                    .map(|text| (path.display().to_string(), text))
                    .with_context(|| format!("failed to read {}", path.display()))
            })
            .collect::<Result<_>>()?
    };

    let show_headers = inputs.len() > 1 && cli.format == Format::Text;
    let mut rejected = false;
    for (name, text) in &inputs {
        if show_headers {
            println!("{}", style(format!("==> {name} <==")).bold());
        }
        if !analyze_one(&analyzer, name, text, cli.format, config.bar_width)? {
            rejected = true;
        }
    }

    Ok(if rejected {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Returns false when the input was rejected as empty.
fn analyze_one(
    analyzer: &Analyzer<'_>,
    name: &str,
    text: &str,
    format: Format,
    bar_width: usize,
) -> Result<bool> {
    let text = match check_input(text) {
        Ok(text) => text,
        Err(err @ Error::EmptyInput) => {
            debug!(source = name, "rejected empty input");
            eprintln!("{} {err}", style("warning:").yellow().bold());
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    let analysis = analyzer.analyze(text);
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        Format::Text => {
            let mut renderer = TerminalChart::new(io::stdout(), bar_width);
            render_report(&analysis, &mut io::stdout(), &mut renderer)?;
        }
    }
    Ok(true)
}

fn run_interactive(analyzer: &Analyzer<'_>, format: Format, bar_width: usize) -> Result<()> {
    eprintln!(
        "{}",
        style("Enter text to analyze. A blank line runs the analysis; Ctrl-D quits.").dim()
    );
    let stdin = io::stdin();
    let mut paragraph = String::new();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            analyze_one(analyzer, "<interactive>", &paragraph, format, bar_width)?;
            paragraph.clear();
            io::stdout().flush()?;
        } else {
            paragraph.push_str(&line);
            paragraph.push('\n');
        }
    }
    if !paragraph.trim().is_empty() {
        analyze_one(analyzer, "<interactive>", &paragraph, format, bar_width)?;
    }
    Ok(())
}
