mod logging;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use af_app::{
    AppError, AppResult, BatchSummary, EvaluationProgressEvent, EvaluationStage, Evaluator,
    EvaluatorConfig, WorkspaceRetention, evaluate_batch, load_config, output_map, save_config,
};
use af_geometry::{ShapeParameters, generate_with_stations};
use af_xfoil::{PerformanceRecord, PolarTable, WorkspaceManager};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "af-cli")]
#[command(about = "Airfoil evaluation CLI - NACA 4-digit sections through XFOIL", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
struct ShapeArgs {
    /// Maximum camber, hundredths of chord (NACA first digit)
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    camber: f64,
    /// Position of maximum camber, tenths of chord (NACA second digit)
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    camber_pos: f64,
    /// Maximum thickness, hundredths of chord (NACA last two digits)
    #[arg(long, default_value_t = 15.0, allow_negative_numbers = true)]
    thickness: f64,
}

impl ShapeArgs {
    fn params(&self) -> ShapeParameters {
        ShapeParameters::new(self.camber, self.camber_pos, self.thickness)
    }
}

#[derive(Args, Debug, Clone)]
struct SolverArgs {
    /// Evaluator configuration YAML
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the XFOIL install directory
    #[arg(long)]
    install_dir: Option<PathBuf>,
    /// Keep every workspace after the run
    #[arg(long)]
    keep: bool,
}

impl SolverArgs {
    fn load(&self) -> AppResult<EvaluatorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => EvaluatorConfig::default(),
        };
        if let Some(dir) = &self.install_dir {
            config.solver.install_dir = dir.clone();
        }
        if self.keep {
            config.workspace.retention = WorkspaceRetention::Keep;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the contour of a NACA 4-digit section
    Geometry {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Chordwise stations per surface
        #[arg(long, default_value_t = af_geometry::DEFAULT_STATIONS)]
        stations: usize,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate one design point through XFOIL
    Evaluate {
        #[command(flatten)]
        shape: ShapeArgs,
        #[command(flatten)]
        solver: SolverArgs,
        /// Print the named output mapping as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a YAML list of design points in parallel
    Batch {
        /// YAML file with a list of {camber, camber_pos, thickness}
        points: PathBuf,
        #[command(flatten)]
        solver: SolverArgs,
        /// Worker threads (defaults to available cores)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Summarise an existing XFOIL polar file
    Polar {
        /// Path to the polar file
        polar_path: PathBuf,
    },
    /// Remove leftover runtime workspaces
    Purge {
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Write a configuration file with default values
    InitConfig {
        /// Destination YAML path
        path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;
    info!("af-cli v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Geometry {
            shape,
            stations,
            output,
        } => cmd_geometry(&shape, stations, output.as_deref()),
        Commands::Evaluate {
            shape,
            solver,
            json,
        } => cmd_evaluate(&shape, &solver, json),
        Commands::Batch {
            points,
            solver,
            threads,
        } => cmd_batch(&points, &solver, threads),
        Commands::Polar { polar_path } => cmd_polar(&polar_path),
        Commands::Purge { solver } => cmd_purge(&solver),
        Commands::InitConfig { path } => cmd_init_config(&path),
    }
}

fn cmd_geometry(shape: &ShapeArgs, stations: usize, output: Option<&Path>) -> AppResult<()> {
    let contour = generate_with_stations(&shape.params(), stations)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    if let Some(path) = output {
        std::fs::write(path, contour.to_dat_string())?;
        println!(
            "✓ Wrote {} ({} points) to {}",
            contour.name(),
            contour.len(),
            path.display()
        );
    } else {
        print!("{}", contour.to_dat_string());
    }
    Ok(())
}

fn cmd_evaluate(shape: &ShapeArgs, solver: &SolverArgs, json: bool) -> AppResult<()> {
    let config = solver.load()?;
    let evaluator = Evaluator::from_config(&config)?;
    let params = shape.params();

    let evaluation = if json {
        evaluator.evaluate(&params)?
    } else {
        println!("Evaluating {}", params.designation());
        let result = evaluator.evaluate_with_progress(
            &params,
            Some(&mut |event| {
                render_cli_progress(&event);
            }),
        );
        clear_progress_line();
        result?
    };

    if json {
        let outputs = output_map(&evaluation);
        let text = serde_json::to_string_pretty(&outputs)
            .map_err(|e| AppError::InvalidInput(format!("Failed to serialize outputs: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("✓ Evaluation completed: {}", evaluation.workspace);
    println!(
        "  Solver time: {:.2}s  Total: {:.2}s",
        evaluation.solver_time_s, evaluation.total_time_s
    );
    print_performance(&evaluation.performance);
    Ok(())
}

fn cmd_batch(points_path: &Path, solver: &SolverArgs, threads: Option<usize>) -> AppResult<()> {
    let content = std::fs::read_to_string(points_path)?;
    let points: Vec<ShapeParameters> = serde_yaml::from_str(&content)
        .map_err(|e| AppError::InvalidInput(format!("Failed to parse design points: {}", e)))?;
    if points.is_empty() {
        println!("No design points in {}", points_path.display());
        return Ok(());
    }

    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| AppError::InvalidInput(format!("Failed to build thread pool: {}", e)))?;
    }

    let config = solver.load()?;
    let evaluator = Evaluator::from_config(&config)?;
    println!("Evaluating {} design points", points.len());
    let results = evaluate_batch(&evaluator, &points);

    println!(
        "\n  {:<10} {:>8} {:>10}  {}",
        "section", "E_max", "alpha", "status"
    );
    for (params, result) in points.iter().zip(&results) {
        match result {
            Ok(eval) => println!(
                "  {:<10} {:>8.2} {:>10.2}  ok",
                params.designation().trim_start_matches("NACA "),
                eval.performance.max_efficiency,
                eval.performance.alpha_at_max_efficiency
            ),
            Err(e) => println!(
                "  {:<10} {:>8} {:>10}  failed ({:?} during {})",
                params.designation().trim_start_matches("NACA "),
                "-",
                "-",
                e.kind(),
                e.stage
            ),
        }
    }

    let summary = BatchSummary::from_results(&results);
    println!(
        "\n✓ {} evaluated, {} failed",
        summary.evaluated, summary.failed
    );
    if let Some((idx, e_max)) = summary.best {
        println!("  Best: {} (E_max = {:.2})", points[idx].designation(), e_max);
    }
    Ok(())
}

fn cmd_polar(polar_path: &Path) -> AppResult<()> {
    let text = std::fs::read_to_string(polar_path)?;
    let table = PolarTable::parse_str(&text).map_err(|e| {
        AppError::InvalidInput(format!("{}: {}", polar_path.display(), e))
    })?;
    let record = PerformanceRecord::from_table(&table);
    println!("Polar: {} ({} rows)", polar_path.display(), record.len());
    print_performance(&record);
    Ok(())
}

fn cmd_purge(solver: &SolverArgs) -> AppResult<()> {
    let config = solver.load()?;
    let manager = WorkspaceManager::new(&config.solver.install_dir);
    debug!(dir = %manager.base_dir().display(), "purging workspaces");
    let report = manager.purge_all();

    println!(
        "✓ Removed {} workspace(s) from {}",
        report.removed.len(),
        config.solver.install_dir.display()
    );
    for (name, err) in &report.failed {
        println!("  ! {}: {}", name, err);
    }
    Ok(())
}

fn cmd_init_config(path: &Path) -> AppResult<()> {
    save_config(path, &EvaluatorConfig::default())?;
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}

fn print_performance(record: &PerformanceRecord) {
    println!("\n  {:>8} {:>9} {:>10} {:>9}", "alpha", "CL", "CD", "E");
    for i in 0..record.len() {
        println!(
            "  {:>8.3} {:>9.4} {:>10.5} {:>9.2}",
            record.alpha[i], record.cl[i], record.cd[i], record.efficiency[i]
        );
    }
    println!(
        "\n  E_max = {:.2} at alpha = {:.2}",
        record.max_efficiency, record.alpha_at_max_efficiency
    );
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &EvaluationProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(ws) = &event.workspace {
        if event.stage == EvaluationStage::RunningSolver {
            line.push_str(&format!("  workspace={}", ws));
        }
    }
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}
