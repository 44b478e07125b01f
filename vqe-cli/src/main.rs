mod report;

use std::{
    path::PathBuf,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use vqe_core::{
    config::BasisSetName,
    mapping::MapperKind,
    optimize::{Bfgs, NelderMead, OptimizerConfig, Spsa},
    vqe::InitialPoint,
    EstimationResult, EstimatorConfig, GroundStateEstimator,
};

use report::Report;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: VqeCommand,
}

#[derive(Subcommand, Debug)]
enum VqeCommand {
    /// Estimate the ground state energy of H2 at one separation
    Estimate {
        /// distance between the two hydrogen atoms, in angstrom unless the config says otherwise
        #[arg(long)]
        separation: f64,
        /// multiplier in (0, 1] applied to the hamiltonian
        #[arg(long, default_value_t = 1.0)]
        scaling: f64,
        #[command(flatten)]
        options: EstimatorOptions,
        /// give up on the estimate after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// length of the illustrative fluctuation series around the estimate
        #[arg(long, default_value_t = 50)]
        samples: usize,
        /// standard deviation of the fluctuation series, in hartree
        #[arg(long, default_value_t = 0.05, value_parser = parse_noise)]
        noise: f64,
    },
    /// Estimate a dissociation curve
    Scan {
        #[arg(long, default_value_t = 0.3)]
        from: f64,
        #[arg(long, default_value_t = 2.5)]
        to: f64,
        #[arg(long, default_value_t = 12)]
        steps: usize,
        #[arg(long, default_value_t = 1.0)]
        scaling: f64,
        #[command(flatten)]
        options: EstimatorOptions,
    },
}

#[derive(clap::Args, Debug)]
struct EstimatorOptions {
    /// A json file with estimator settings. Flags take precedence over it.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// A basis set exchange json file to use instead of STO-3G
    #[arg(long, short)]
    basis_set: Option<PathBuf>,
    #[arg(long, value_enum)]
    mapper: Option<Mapper>,
    #[arg(long, value_enum)]
    optimizer: Option<Optimizer>,
    /// iteration budget of the minimizer
    #[arg(long)]
    max_iterations: Option<usize>,
    /// seed of the random initial point
    #[arg(long)]
    seed: Option<u64>,
    /// how many random initial points to minimize from
    #[arg(long)]
    starting_points: Option<usize>,
    /// also diagonalize the hamiltonian exactly
    #[arg(long)]
    exact: bool,
    /// print json instead of text
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum Mapper {
    JordanWigner,
    Parity,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum Optimizer {
    Bfgs,
    NelderMead,
    Spsa,
}

impl EstimatorOptions {
    fn config(&self) -> anyhow::Result<EstimatorConfig> {
        let mut config = match &self.config {
            Some(path) => EstimatorConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => EstimatorConfig::default(),
        };

        if let Some(path) = &self.basis_set {
            config.basis = BasisSetName::File(path.clone());
        }
        if let Some(mapper) = self.mapper {
            config.mapper = match mapper {
                Mapper::JordanWigner => MapperKind::JordanWigner,
                Mapper::Parity => MapperKind::Parity,
            };
        }
        if let Some(optimizer) = self.optimizer {
            let same_kind = matches!(
                (optimizer, &config.optimizer),
                (Optimizer::Bfgs, OptimizerConfig::Bfgs(_))
                    | (Optimizer::NelderMead, OptimizerConfig::NelderMead(_))
                    | (Optimizer::Spsa, OptimizerConfig::Spsa(_))
            );
            if !same_kind {
                config.optimizer = match optimizer {
                    Optimizer::Bfgs => OptimizerConfig::Bfgs(Bfgs::default()),
                    Optimizer::NelderMead => OptimizerConfig::NelderMead(NelderMead::default()),
                    Optimizer::Spsa => OptimizerConfig::Spsa(Spsa::default()),
                };
            }
        }
        if let Some(max_iterations) = self.max_iterations {
            config.optimizer.set_max_iterations(max_iterations);
        }
        if let Some(seed) = self.seed {
            config.initial_point = InitialPoint::Uniform { seed };
        }
        if let Some(starting_points) = self.starting_points {
            config.starting_points = starting_points;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_noise(value: &str) -> Result<f64, String> {
    let noise: f64 = value.parse().map_err(|err| format!("{err}"))?;
    if noise >= 0.0 && noise.is_finite() {
        Ok(noise)
    } else {
        Err(format!("expected a finite, non-negative standard deviation, got {noise}"))
    }
}

/// Runs `job` on a worker thread and waits at most `timeout` for it. A job that misses the
/// deadline keeps running detached and its result is dropped.
fn run_with_deadline<T: Send + 'static>(
    timeout: Option<Duration>,
    job: impl FnOnce() -> T + Send + 'static,
) -> anyhow::Result<T> {
    let Some(timeout) = timeout else {
        return Ok(job());
    };

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        // the receiver is gone if the deadline already passed
        let _ = sender.send(job());
    });
    receiver
        .recv_timeout(timeout)
        .map_err(|_| anyhow!("estimate did not finish within {timeout:?}"))
}

fn estimate(
    estimator: &GroundStateEstimator,
    separation: f64,
    scaling: f64,
    exact: bool,
) -> anyhow::Result<(EstimationResult, Option<f64>)> {
    let result = estimator.estimate(separation, scaling)?;
    let exact = if exact {
        Some(estimator.exact_energy(separation, scaling)?)
    } else {
        None
    };
    Ok((result, exact))
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args: Args = Args::parse();

    match args.command {
        VqeCommand::Estimate {
            separation,
            scaling,
            options,
            timeout_secs,
            samples,
            noise,
        } => {
            let estimator = GroundStateEstimator::new(options.config()?)?;
            let exact = options.exact;

            let start = Instant::now();
            let (result, exact_energy) = run_with_deadline(
                timeout_secs.map(Duration::from_secs),
                move || estimate(&estimator, separation, scaling, exact),
            )??;
            log::info!("estimate took {:0.2?}", start.elapsed());

            let report = Report::new(separation, result, exact_energy)
                .with_fluctuations(samples, noise, &mut rand::thread_rng())?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }

        VqeCommand::Scan {
            from,
            to,
            steps,
            scaling,
            options,
        } => {
            if steps == 0 {
                bail!("a scan needs at least one step");
            }
            let estimator = GroundStateEstimator::new(options.config()?)?;

            let mut reports = Vec::with_capacity(steps);
            for step in 0..steps {
                let separation = if steps == 1 {
                    from
                } else {
                    from + (to - from) * step as f64 / (steps - 1) as f64
                };
                let (result, exact_energy) =
                    estimate(&estimator, separation, scaling, options.exact)?;
                let report = Report::new(separation, result, exact_energy);
                if !options.json {
                    println!("{}", report.scan_line());
                }
                reports.push(report);
            }

            if options.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }
    }

    Ok(())
}
