//! Train a fuzzy network on a pattern file.
//!
//! Usage: cargo run --bin train -- --patterns patterns.txt --hidden 4 --hidden 4

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use fuzzynet::data::{load_patterns, RealNumberParser, TriangularNumberParser};
use fuzzynet::fuzzy::{generate_little_number, FuzzyNumber, RealNumber};
use fuzzynet::learning::{
    GradientDescent, LearningPattern, LearningStrategy, QuasiNewton, Trainer, TrainingReport,
};
use fuzzynet::net::{ActivationType, Network, NetworkConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Online gradient back-propagation
    Gradient,
    /// Quasi-Newton with an inverse-Hessian approximation
    Newton,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NumberMode {
    /// Crisp doubles
    Real,
    /// Triangular fuzzy numbers, `left,mod,right` in the pattern file
    Fuzzy,
}

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train a fuzzy feed-forward network on a pattern file")]
struct Cli {
    /// Pattern file: `in;in;.. out;out;..`, one pattern per line
    #[arg(short, long)]
    patterns: String,

    /// Hidden layer sizes, repeat the flag per layer
    #[arg(long, default_values_t = [4])]
    hidden: Vec<usize>,

    /// Number representation in the pattern file
    #[arg(long, value_enum, default_value_t = NumberMode::Real)]
    numbers: NumberMode,

    /// Alpha-levels per fuzzy number
    #[arg(long, default_value_t = 11)]
    levels: usize,

    #[arg(long, value_enum, default_value_t = Algorithm::Gradient)]
    algorithm: Algorithm,

    #[arg(long, default_value_t = 0.7)]
    learning_rate: f64,

    #[arg(long, default_value_t = 0.5)]
    momentum: f64,

    /// Initial quasi-Newton step size
    #[arg(long, default_value_t = 10.0)]
    step: f64,

    #[arg(long, default_value_t = 1e-4)]
    error_threshold: f64,

    /// Stop after this many cycles even without convergence
    #[arg(long)]
    max_cycles: Option<usize>,

    /// RNG seed for weight initialization
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Where to store the trained network snapshot
    #[arg(short, long, default_value = "model.json")]
    model: String,

    /// Log every Nth cycle
    #[arg(long, default_value_t = 50)]
    log_every: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.numbers {
        NumberMode::Real => {
            let patterns = load_patterns(&cli.patterns, &RealNumberParser)?;
            let mut rng = StdRng::seed_from_u64(cli.seed);
            run(&cli, patterns, move || RealNumber::generate_little(&mut rng))
        }
        NumberMode::Fuzzy => {
            let parser = TriangularNumberParser::new(cli.levels);
            let patterns = load_patterns(&cli.patterns, &parser)?;
            let mut rng = StdRng::seed_from_u64(cli.seed);
            let levels = cli.levels;
            run(&cli, patterns, move || {
                generate_little_number(&mut rng, -0.5, 0.5, levels)
            })
        }
    }
}

fn run<F>(cli: &Cli, patterns: Vec<LearningPattern<F>>, init: impl FnMut() -> F) -> Result<()>
where
    F: FuzzyNumber + serde::Serialize,
{
    if patterns.is_empty() {
        bail!("pattern file {} holds no patterns", cli.patterns);
    }
    let input_count = patterns[0].input().len();
    let output_count = patterns[0].output().len();
    info!(
        patterns = patterns.len(),
        inputs = input_count,
        outputs = output_count,
        "loaded pattern file"
    );

    let mut config = NetworkConfig::new(input_count)
        .outputs(output_count)
        .activation(ActivationType::Sigmoid);
    for &h in &cli.hidden {
        config = config.hidden(h);
    }
    let mut net = Network::from_config(&config, init);
    info!(weights = net.weights_count(), hidden = ?cli.hidden, "built network");

    let report = match cli.algorithm {
        Algorithm::Gradient => {
            let strategy =
                GradientDescent::new(cli.learning_rate, cli.momentum, cli.error_threshold);
            train(cli, strategy, &mut net, &patterns)?
        }
        Algorithm::Newton => {
            let strategy = QuasiNewton::new(cli.step, cli.error_threshold);
            train(cli, strategy, &mut net, &patterns)?
        }
    };

    info!(
        outcome = ?report.outcome,
        cycles = report.cycles,
        error = report.final_error,
        "training finished"
    );

    net.save(&cli.model)?;
    info!(model = %cli.model, "snapshot saved");
    Ok(())
}

fn train<F, S>(
    cli: &Cli,
    strategy: S,
    net: &mut Network<F>,
    patterns: &[LearningPattern<F>],
) -> Result<TrainingReport>
where
    F: FuzzyNumber,
    S: LearningStrategy<F>,
{
    let log_every = cli.log_every.max(1);
    let mut trainer = Trainer::new(strategy).on_cycle(move |state| {
        if state.cycle % log_every == 0 {
            info!(cycle = state.cycle, error = state.error, "cycle done");
        }
    });
    if let Some(cap) = cli.max_cycles {
        trainer = trainer.max_cycles(cap);
    }
    Ok(trainer.train(net, patterns)?)
}
