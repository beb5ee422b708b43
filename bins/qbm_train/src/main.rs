use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use quantum::{Ansatz, ParameterizedHamiltonian};
use varqite::{output::write_loss_csv, GibbsTrainer, TrainerConfig};

/// Train ZZ/ZI/IZ coefficients so the VarQITE Gibbs state matches a target distribution
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON trainer config (defaults are used when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Target distribution over the 4 system basis states
    #[arg(long, default_value = "0.5,0,0,0.5")]
    target: String,

    /// Initial coefficients of ZZ, ZI, IZ
    #[arg(long, default_value = "-2.0,0.2,0.5", allow_hyphen_values = true)]
    init: String,

    /// Optimizer iteration budget (overrides config)
    #[arg(long)]
    iterations: Option<usize>,

    /// Evaluate shifted states sequentially
    #[arg(long)]
    sequential: bool,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Output CSV path for the loss history
    #[arg(long, default_value = "qbm_loss.csv")]
    out: PathBuf,

    /// Write the effective configuration here
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_list(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("'{}': {}", v, e)))
        .collect()
}

fn fail(msg: impl std::fmt::Display) -> ! {
    error!("{}", msg);
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();

    let level = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    if args.threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
        {
            fail(format!("Failed to build Rayon thread pool: {}", e));
        }
    }

    let mut config = match args.config.as_deref() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            TrainerConfig::from_json(path).unwrap_or_else(|e| fail(format!("Failed to load configuration: {}", e)))
        }
        None => TrainerConfig::default(),
    };
    if let Some(n) = args.iterations {
        config.optimizer.max_iterations = n;
    }
    if args.sequential {
        config.varqite.parallel = false;
    }
    if let Err(e) = config.validate() {
        fail(format!("Configuration validation failed: {}", e));
    }
    if let Some(path) = &args.save_config {
        if let Err(e) = config.to_json(path) {
            fail(format!("Failed to save configuration: {}", e));
        }
    }

    let target = parse_list(&args.target).unwrap_or_else(|e| fail(format!("Bad --target {}", e)));
    let init = parse_list(&args.init).unwrap_or_else(|e| fail(format!("Bad --init {}", e)));
    let total: f64 = target.iter().sum();
    if target.iter().any(|&p| p < 0.0) || (total - 1.0).abs() > 1e-9 {
        fail("--target must be a probability vector summing to 1");
    }

    let family = ParameterizedHamiltonian::purified_zz_z().unwrap_or_else(|e| fail(e));
    let ansatz = Ansatz::thermal_purification().unwrap_or_else(|e| fail(e));
    let trainer = GibbsTrainer::new(
        family,
        ansatz,
        Ansatz::thermal_purification_init(),
        Ansatz::PURIFICATION_ANCILLAS.to_vec(),
        target,
        config,
    )
    .unwrap_or_else(|e| fail(e));

    let report = trainer.train(&init).unwrap_or_else(|e| fail(e));

    if let Err(e) = write_loss_csv(&args.out, &report.loss_history) {
        fail(format!("Failed to write CSV to {}: {}", args.out.display(), e));
    }

    println!("Coefficients (ZZ, ZI, IZ) = {:?}", report.coefficients);
    println!("Loss        {:.6} -> {:.6}", report.initial_loss, report.final_loss);
    println!("L1 distance {:.6} -> {:.6}", report.initial_l1, report.final_l1);
    println!("Fidelity    {:.6} -> {:.6}", report.initial_fidelity, report.final_fidelity);
    println!("Initial distribution {:?}", report.initial_distribution);
    println!("Trained distribution {:?}", report.final_distribution);
    println!("Evaluations = {}, iterations = {}", report.num_evaluations(), report.iterations);
}
