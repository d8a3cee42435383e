//! `jurisagi` -- solve ARC-style tasks from the command line.
//!
//! Usage:
//!   jurisagi solve <task.json> [--trace-dir DIR]
//!   jurisagi batch <dir> [--trace-dir DIR]
//!   jurisagi bench <task.json> --runs N

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use jurisagi::controller::refusal::Refusal;
use jurisagi::controller::{refusal_result, solve, ControllerConfig};
use jurisagi::dsl::PrimitiveRegistry;
use jurisagi::memory::{InMemoryStore, MacroLibrary};
use jurisagi::task::{ARCTaskJson, SolverResult};
use jurisagi::trace::solve_trace::{BatchSummary, TaskOutcome};
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "benchmark")]
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "jurisagi", version, about = "Neuro-symbolic program synthesizer for ARC-style grid puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory to write per-task trace JSON files into.
    #[arg(long, global = true)]
    trace_dir: Option<PathBuf>,

    /// Enable debug-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Total wall-clock budget per solve, in seconds.
    #[arg(long, global = true, default_value_t = 60.0)]
    time_budget_secs: f64,

    /// Total iteration budget per solve.
    #[arg(long, global = true, default_value_t = 10_000)]
    iteration_budget: usize,

    /// Consult the macro/memory library before synthesizing.
    #[arg(long, global = true)]
    use_mal: bool,

    /// Skip the post-synthesis robustness check.
    #[arg(long, global = true)]
    no_robustness: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a single task file and print the result as JSON.
    Solve { task_path: PathBuf },
    /// Solve every `*.json` task file in a directory, in filename order.
    Batch { dir: PathBuf },
    /// Run the solver repeatedly over one task for rough timing telemetry.
    #[cfg(feature = "benchmark")]
    Bench {
        task_path: PathBuf,
        #[arg(long, default_value_t = 10)]
        runs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    jurisagi::init_logging(cli.verbose);

    let config = build_config(&cli);
    let registry = PrimitiveRegistry::standard();
    let mut memory = InMemoryStore::new();
    let mut macros = MacroLibrary::new();

    match &cli.command {
        Command::Solve { task_path } => {
            let result = solve_one(task_path, &config, &registry, &mut memory, &mut macros, cli.trace_dir.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Batch { dir } => {
            let summary = solve_batch(dir, &config, &registry, &mut memory, &mut macros, cli.trace_dir.as_deref())?;
            print_batch_summary(&summary);
        }
        #[cfg(feature = "benchmark")]
        Command::Bench { task_path, runs } => {
            run_bench(task_path, *runs, &config, &registry)?;
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> ControllerConfig {
    let mut config = ControllerConfig::default();
    config.total_time_budget_secs = cli.time_budget_secs;
    config.total_iteration_budget = cli.iteration_budget;
    config.use_mal = cli.use_mal;
    config.enable_robustness = !cli.no_robustness;
    config
}

/// Reads and parses a task file. The outer `Result` is for I/O/JSON failures (fatal,
/// surfaced to the CLI user directly); the inner one carries a structured `Refusal`
/// when the JSON parsed but a grid inside it was ragged, alongside the task id the
/// refusal result should be reported under.
fn load_task(path: &Path) -> Result<std::result::Result<jurisagi::ARCTask, (String, Refusal)>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading task file {}", path.display()))?;
    let json: ARCTaskJson = serde_json::from_str(&raw).with_context(|| format!("parsing task JSON in {}", path.display()))?;
    let fallback_id = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "task".to_string());
    Ok(json.into_task(fallback_id.clone()).map_err(|refusal| (fallback_id, refusal)))
}

fn solve_one(
    task_path: &Path,
    config: &ControllerConfig,
    registry: &PrimitiveRegistry,
    memory: &mut InMemoryStore,
    macros: &mut MacroLibrary,
    trace_dir: Option<&Path>,
) -> Result<SolverResult> {
    let task = match load_task(task_path)? {
        Ok(task) => task,
        Err((task_id, refusal)) => {
            log::warn!("{} {}", "not certified:".red(), refusal.explanation);
            return Ok(refusal_result(task_id, &refusal, Vec::new()));
        }
    };
    log::info!("solving task {}", task.task_id);
    let outcome = solve(&task, config, registry, memory, macros);

    if outcome.result.success {
        log::info!("{} {}", "certified:".green(), outcome.result.audit.program_source);
    } else {
        log::warn!("{} {}", "not certified:".red(), outcome.result.error_message.as_deref().unwrap_or("unknown reason"));
    }

    if let Some(dir) = trace_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating trace directory {}", dir.display()))?;
        let trace_path = dir.join(format!("{}.trace.json", task.task_id));
        fs::write(&trace_path, outcome.trace.to_json()?).with_context(|| format!("writing trace file {}", trace_path.display()))?;
    }

    Ok(outcome.result)
}

fn solve_batch(
    dir: &Path,
    config: &ControllerConfig,
    registry: &PrimitiveRegistry,
    memory: &mut InMemoryStore,
    macros: &mut MacroLibrary,
    trace_dir: Option<&Path>,
) -> Result<BatchSummary> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading task directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut outcomes = Vec::with_capacity(paths.len());
    for path in &paths {
        let result = solve_one(path, config, registry, memory, macros, trace_dir)?;
        outcomes.push(TaskOutcome {
            task_id: result.task_id.clone(),
            success: result.success,
            program_source: result.audit.program_source.clone(),
        });
    }

    Ok(BatchSummary::from_outcomes(outcomes))
}

fn print_batch_summary(summary: &BatchSummary) {
    println!(
        "{} {}/{} solved ({:.1}%)",
        "batch complete:".bold(),
        summary.successful,
        summary.total,
        summary.success_rate * 100.0
    );
    for outcome in &summary.outcomes {
        let marker = if outcome.success { "OK".green() } else { "FAIL".red() };
        println!("  [{marker}] {} -- {}", outcome.task_id, outcome.program_source);
    }
}

#[cfg(feature = "benchmark")]
fn run_bench(task_path: &Path, runs: usize, config: &ControllerConfig, registry: &PrimitiveRegistry) -> Result<()> {
    let task = load_task(task_path)?.map_err(|(_, refusal)| anyhow::anyhow!("task refused: {}", refusal.explanation))?;
    let mut durations = Vec::with_capacity(runs);
    for run in 0..runs {
        let mut memory = InMemoryStore::new();
        let mut macros = MacroLibrary::new();
        let start = Instant::now();
        let outcome = solve(&task, config, registry, &mut memory, &mut macros);
        let elapsed = start.elapsed();
        durations.push(elapsed);
        log::debug!("run {run}: {:?} success={}", elapsed, outcome.result.success);
    }
    let total: std::time::Duration = durations.iter().sum();
    let avg = total / runs.max(1) as u32;
    println!("{runs} runs over {}: avg {avg:?}", task.task_id);
    Ok(())
}
