use clap::{Parser, ValueEnum};
use math_de_trajectory::{
    Boundary, DEConfig, DEConfigBuilder, differential_evolution,
    function_registry::{FunctionInfo, FunctionRegistry},
};
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "run_de",
    about = "Run DE/rand/1/bin on a benchmark function and record every agent's trajectory"
)]
struct Cli {
    /// Name of the benchmark function to optimize (use --list-functions to see available options)
    #[arg(long, default_value = "quadratic_bowl")]
    function: String,

    /// Dimensionality of the problem (defaults to the function's own dimension, or 2)
    #[arg(long)]
    dim: Option<usize>,

    /// JSON configuration file used as a base; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations
    #[arg(long)]
    maxiter: Option<usize>,

    /// Number of agents (>= 4)
    #[arg(long)]
    population: Option<usize>,

    /// Mutation factor F
    #[arg(long)]
    mutation_factor: Option<f64>,

    /// Crossover probability CR in [0, 1]
    #[arg(long)]
    recombination: Option<f64>,

    /// Bounds applied to every dimension, as 'min,max'
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<String>,

    /// What to do with trial coordinates outside the bounds
    #[arg(long, value_enum)]
    boundary: Option<BoundaryChoice>,

    /// Optional random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Write the trajectory as CSV to this file
    #[arg(long)]
    trajectory_csv: Option<PathBuf>,

    /// Write the trajectory as JSON to this file
    #[arg(long)]
    trajectory_json: Option<PathBuf>,

    /// List all available functions and exit
    #[arg(long)]
    list_functions: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BoundaryChoice {
    Free,
    Clip,
}

impl From<BoundaryChoice> for Boundary {
    fn from(choice: BoundaryChoice) -> Self {
        match choice {
            BoundaryChoice::Free => Boundary::Free,
            BoundaryChoice::Clip => Boundary::Clip,
        }
    }
}

fn main() {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let registry = FunctionRegistry::new();

    if args.list_functions {
        list_available_functions(&registry);
        return;
    }

    let (resolved_name, info) = match resolve_function(&registry, args.function.trim()) {
        Some(resolved) => resolved,
        None => {
            eprintln!(
                "Error: function '{}' not found. Use --list-functions to inspect available names.",
                args.function
            );
            process::exit(2);
        }
    };

    let config = build_config(&args, &info).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        process::exit(2);
    });

    println!(
        "Running DE/rand/1/bin on '{}' ({}D, population {}, {} generations)...",
        resolved_name,
        config.dimension(),
        config.popsize,
        config.maxiter
    );

    let start = Instant::now();
    let report = match differential_evolution(&info.func, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: optimization failed: {}", e);
            process::exit(2);
        }
    };

    println!("\nOptimization completed in {:.2?}", start.elapsed());
    println!("Seed: {}", report.seed);
    println!(
        "Iterations: {} | Evaluations: {}",
        report.nit, report.nfev
    );

    let mut best_vector = String::new();
    for (idx, value) in report.x.iter().enumerate() {
        if idx > 0 {
            best_vector.push_str(", ");
        }
        let _ = write!(&mut best_vector, "{value:.6}");
    }
    println!("Result: [{}]", best_vector);
    println!("Best Score: {:.6}", report.fun);

    if let Some(path) = &args.trajectory_csv {
        if let Err(e) = report.trajectory.write_csv(path) {
            eprintln!("Error: failed to write {}: {}", path.display(), e);
            process::exit(1);
        }
        println!("Trajectory CSV saved to: {}", path.display());
    }
    if let Some(path) = &args.trajectory_json {
        if let Err(e) = report.trajectory.write_json(path) {
            eprintln!("Error: failed to write {}: {}", path.display(), e);
            process::exit(1);
        }
        println!("Trajectory JSON saved to: {}", path.display());
    }
}

fn build_config(args: &Cli, info: &FunctionInfo) -> Result<DEConfig, Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => DEConfig::from_file(path)?,
        None => DEConfig::default(),
    };
    let from_file = args.config.is_some();

    let bounds = match &args.bounds {
        Some(text) => {
            let pair = parse_bounds(text)?;
            let dim = args
                .dim
                .or(info.dimension)
                .unwrap_or_else(|| if from_file { base.dimension() } else { 2 });
            vec![pair; dim]
        }
        None if args.dim.is_some() || !from_file => {
            info.bounds_for(args.dim.unwrap_or_else(|| info.default_dimension()))
        }
        None => base.bounds.clone(),
    };

    if let Some(required) = info.dimension
        && bounds.len() != required
    {
        return Err(format!(
            "this function requires {required} dimensions, got {}",
            bounds.len()
        )
        .into());
    }

    let mut builder = DEConfigBuilder::from_config(base).bounds(bounds);
    if let Some(v) = args.maxiter {
        builder = builder.maxiter(v);
    }
    if let Some(v) = args.population {
        builder = builder.popsize(v);
    }
    if let Some(v) = args.mutation_factor {
        builder = builder.mutation(v);
    }
    if let Some(v) = args.recombination {
        builder = builder.recombination(v);
    }
    if let Some(v) = args.boundary {
        builder = builder.boundary(v.into());
    }
    if let Some(v) = args.seed {
        builder = builder.seed(v);
    }

    Ok(builder.build()?)
}

fn list_available_functions(registry: &FunctionRegistry) {
    let names = registry.list_functions();
    println!("Available test functions ({}):", names.len());
    for name in names {
        if let Some(info) = registry.info(&name) {
            let dim = info
                .dimension
                .map_or_else(|| "any".to_string(), |d| format!("{d}D"));
            println!(
                "- {name} ({dim}, bounds [{}, {}], minimum {})",
                info.bounds.0, info.bounds.1, info.minimum
            );
        }
    }
}

fn resolve_function(registry: &FunctionRegistry, requested: &str) -> Option<(String, FunctionInfo)> {
    if let Some(info) = registry.info(requested) {
        return Some((requested.to_string(), *info));
    }

    let requested_lower = requested.to_lowercase();
    for name in registry.list_functions() {
        if name.to_lowercase() == requested_lower
            && let Some(info) = registry.info(&name)
        {
            return Some((name, *info));
        }
    }
    None
}

fn parse_bounds(bounds_str: &str) -> Result<(f64, f64), Box<dyn std::error::Error>> {
    let cleaned = bounds_str.trim_matches(|c| c == '\'' || c == '"');
    let parts: Vec<&str> = if cleaned.contains(',') {
        cleaned.split(',').collect()
    } else {
        cleaned.split_whitespace().collect()
    };

    if parts.len() != 2 {
        return Err("Bounds must be in format 'min,max' or 'min max'".into());
    }

    let min: f64 = parts[0].trim().parse()?;
    let max: f64 = parts[1].trim().parse()?;
    Ok((min, max))
}
