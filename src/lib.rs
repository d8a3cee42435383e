//! JURIS-AGI reasoning core: a neuro-symbolic program synthesizer for ARC-style
//! grid puzzles. An `ARCTask` enters `controller::solve` and a certified (or
//! refused) `SolverResult` leaves it, alongside a full `SolveTrace` for audit.

pub mod controller;
pub mod critic;
pub mod dsl;
pub mod error;
pub mod grid;
pub mod interp;
pub mod memory;
pub mod refine;
pub mod robustness;
pub mod synth;
pub mod task;
pub mod trace;

pub use controller::{solve, ControllerConfig, SolveOutcome};
pub use error::SolverError;
pub use task::{ARCTask, SolverResult};

/// Initializes terminal + file logging. Only meaningful with the `cli` feature;
/// a library consumer embedding this crate is expected to configure its own
/// `log` backend instead.
#[cfg(feature = "cli")]
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    let _ = simplelog::CombinedLogger::init(vec![term]);
}
