use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use simplex_solver::{Solution, Solver, as_dictionary, standardize};
use simplex_task::{LpTaskDto, LpTaskResult, solve_task};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "simplex")]
#[command(about = "Exact rational simplex solver for linear and integer programs", long_about = None)]
struct Cli {
    /// Increase log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a JSON task file
    Solve {
        /// The task file
        file: PathBuf,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Solve a JSON task file as an integer program
    SolveInteger {
        /// The task file
        file: PathBuf,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Check a JSON task file for format errors
    Check {
        /// The task file to check
        file: PathBuf,
    },
    /// Print the model of a task and its initial dictionary
    Show {
        /// The task file
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct SolveOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    format: Format,
    /// Print every pivot performed
    #[arg(long)]
    steps: bool,
    /// Maximum number of Gomory cuts
    #[arg(long, default_value_t = 500)]
    max_cuts: usize,
    /// Maximum number of pivots per simplex run
    #[arg(long, default_value_t = 10_000)]
    max_pivots: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve { file, options } => run_solve(&file, &options, false),
        Commands::SolveInteger { file, options } => run_solve(&file, &options, true),
        Commands::Check { file } => {
            let task = read_task(&file);
            match task.validate() {
                Ok(()) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} decision variables", task.number_of_decision_variables);
                    println!("  {} constraints", task.number_of_constraints);
                    let aim = if task.maximization { "maximization" } else { "minimization" };
                    let kind = if task.integer_programming { "integer" } else { "linear" };
                    println!("  {} {} problem", kind, aim);
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Show { file } => {
            let task = read_task(&file);
            let model = match task.to_model() {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            println!("Model:");
            print!("{}", model);
            println!();
            println!("Initial dictionary:");
            print!("{}", as_dictionary(standardize(model)));
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }
}

fn read_task(file: &Path) -> LpTaskDto {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&source) {
        Ok(task) => task,
        Err(e) => {
            eprintln!("Error parsing task: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_solve(file: &Path, options: &SolveOptions, integer: bool) {
    let mut task = read_task(file);
    task.integer_programming |= integer;

    let solver = Solver::new()
        .with_max_cuts(options.max_cuts)
        .with_max_pivots(options.max_pivots);
    let result = match solve_task(&task, &solver) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match options.format {
        Format::Json => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error writing result: {}", e);
                std::process::exit(1);
            }
        },
        Format::Pretty => print_pretty(&task, &result, options.steps),
    }

    if !result.solution_found {
        std::process::exit(1);
    }
}

fn print_pretty(task: &LpTaskDto, result: &LpTaskResult, steps: bool) {
    if let Some(ref name) = task.name {
        println!("Task: {}", name);
        println!();
    }

    let Some(ref solution) = result.solution else {
        println!("Status: NO SOLUTION");
        if let Some(ref message) = result.message {
            println!("{}", message);
        }
        return;
    };

    println!("Status: OPTIMAL");
    println!(
        "{}0 = {} (≈ {:.4})",
        task.function_variable_name,
        solution.objective_function_value,
        solution.objective_function_value.to_f64()
    );
    println!();
    println!("Decision variables:");
    for (variable, value) in &solution.decision_variables_and_values {
        println!("  {:6} {:>12} (≈ {:.4})", variable.to_string(), value.to_string(), value.to_f64());
    }

    if steps {
        print_steps(solution);
    }
}

fn print_steps(solution: &Solution) {
    println!();
    println!("Pivots:");
    for (i, step) in solution.steps.iter().enumerate() {
        println!(
            "  {:3}. [{}] {} enters, {} leaves, objective {}",
            i + 1,
            step.stage,
            step.entering,
            step.leaving,
            step.objective_value
        );
    }
}
