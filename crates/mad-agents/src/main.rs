use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use mad_agents::{
    build_strategy, BenchConfig, Dataset, DatasetSource, Evaluator, GatewayClient, HubClient,
    StrategyKind,
};
use scoring::{RunLog, StrategyComparison};

/// Benchmark multi-agent debate strategies on multiple-choice questions.
#[derive(Parser, Debug)]
#[command(name = "mad-bench", author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file. Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one strategy and print the summary report
    Run(RunArgs),
    /// Save a hub split as a local JSONL snapshot
    FetchDataset(FetchArgs),
    /// Print a cross-strategy comparison of saved run logs
    Compare {
        /// Run log JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the available strategies
    Strategies,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    #[arg(long, value_enum)]
    source: Option<DatasetSource>,

    /// Local snapshot (.jsonl, .json or a directory holding data.jsonl)
    #[arg(long)]
    local_path: Option<PathBuf>,

    /// Evaluate only the first N questions (0 = all)
    #[arg(long)]
    max_questions: Option<usize>,

    #[arg(long)]
    temperature: Option<f32>,

    #[arg(long)]
    max_tokens: Option<u32>,

    /// Seconds to wait between questions
    #[arg(long)]
    delay: Option<f64>,

    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Do not write the run log
    #[arg(long, default_value_t = false)]
    no_save: bool,

    /// Single agent reasons step by step before answering
    #[arg(long, default_value_t = false)]
    step_by_step: bool,

    /// Run each ChatEval judge round concurrently
    #[arg(long, default_value_t = false)]
    parallel_fanout: bool,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    base_url: Option<String>,
}

impl RunArgs {
    fn apply(self, config: &mut BenchConfig) {
        let eval = &mut config.evaluation;
        if let Some(strategy) = self.strategy {
            eval.strategy = strategy;
        }
        if let Some(temperature) = self.temperature {
            eval.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            eval.max_tokens = max_tokens;
        }
        if let Some(delay) = self.delay {
            eval.request_delay_secs = delay;
        }
        if let Some(dir) = self.results_dir {
            eval.results_dir = dir;
        }
        if self.no_save {
            eval.save_results = false;
        }
        if self.step_by_step {
            eval.single_agent_step_by_step = true;
        }
        if self.parallel_fanout {
            eval.parallel_fanout = true;
        }

        let dataset = &mut config.dataset;
        if let Some(source) = self.source {
            dataset.source = source;
        }
        if let Some(path) = self.local_path {
            dataset.local_path = path;
        }
        if self.max_questions.is_some() {
            dataset.max_questions = self.max_questions;
        }

        if let Some(model) = self.model {
            config.gateway.model = model;
        }
        if let Some(base_url) = self.base_url {
            config.gateway.base_url = base_url;
        }
    }
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Hub dataset name (defaults to the configured one)
    #[arg(long)]
    name: Option<String>,

    #[arg(long = "dataset-config")]
    dataset_config: Option<String>,

    #[arg(long)]
    split: Option<String>,

    /// Output file or directory
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    max_questions: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BenchConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BenchConfig::default(),
    };

    match cli.command {
        Command::Run(args) => run(config, args).await,
        Command::FetchDataset(args) => fetch_dataset(config, args).await,
        Command::Compare { files } => compare(&files),
        Command::Strategies => {
            list_strategies();
            Ok(())
        }
    }
}

async fn run(mut config: BenchConfig, args: RunArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let dataset = Dataset::load(&config.dataset)
        .await
        .context("loading dataset")?;

    let client = Arc::new(
        GatewayClient::from_settings(&config.gateway).context("building gateway client")?,
    );
    let kind = config.evaluation.strategy;
    info!(
        strategy = %kind,
        model = %config.gateway.model,
        questions = dataset.len(),
        "Benchmark starting"
    );

    let strategy = build_strategy(kind, client.clone(), &config.evaluation);
    let evaluator = Evaluator::from_settings(client, &config.evaluation)
        .with_max_questions(config.dataset.max_questions);
    let outcome = evaluator.run(strategy.as_ref(), &dataset).await;

    println!("{}", outcome.summary().format_report());
    if let Some(path) = &outcome.saved_to {
        println!("Run log: {}", path.display());
    }
    match outcome.save_error {
        Some(err) => Err(err).context("evaluation finished but the run log was not saved"),
        None => Ok(()),
    }
}

async fn fetch_dataset(config: BenchConfig, args: FetchArgs) -> Result<()> {
    let settings = config.dataset;
    let name = args.name.unwrap_or(settings.hub_name);
    let hub_config = args.dataset_config.unwrap_or(settings.hub_config);
    let split = args.split.unwrap_or(settings.hub_split);
    let out = args.out.unwrap_or(settings.local_path);

    let dataset = HubClient::new()?
        .fetch(&name, &hub_config, &split, args.max_questions)
        .await
        .with_context(|| format!("fetching {}", name))?;
    let path = dataset
        .save_jsonl(&out)
        .with_context(|| format!("saving snapshot to {}", out.display()))?;

    println!("Saved {} questions to {}", dataset.len(), path.display());
    Ok(())
}

fn compare(files: &[PathBuf]) -> Result<()> {
    let logs = files
        .iter()
        .map(|path| RunLog::load(path).with_context(|| format!("reading {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    println!("{}", StrategyComparison::from_logs(&logs).format_report());
    Ok(())
}

fn list_strategies() {
    for kind in StrategyKind::all() {
        println!(
            "{:<14} {} calls/question  {}",
            kind.as_str(),
            kind.calls_per_question(),
            kind.description()
        );
    }
}
