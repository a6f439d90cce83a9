mod approx;
mod engine;
pub mod exact;
mod lottery;
mod policy;
pub mod print;
pub mod render;
pub mod sweep;
mod util;

pub use approx::Approx;
pub use engine::{average_win_chance, single_trial_win_chance, win_chances};
pub use lottery::Lottery;
pub use policy::{BoundaryPolicy, UnknownPolicy};
pub use sweep::{Curve, SweepConfig};
pub use util::{Chance, Count, Error, Result};

const APPROX_SAMPLE_SIZE: u32 = 1_000_000;
const MAX_ADVERSARY_RATIO: f64 = 3.0 / 4.0;
const POSITION_FRACTIONS: [f64; 4] = [0.5, 0.75, 0.9, 0.95];
const HIGHLIGHTS: [Count; 3] = [3, 10, 30];
const PLOT_LIMIT: Count = 100;

/// Terminal logging: `Info`, or `Debug` when `verbose`.
pub fn log(verbose: bool) -> ::core::result::Result<(), log::SetLoggerError> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
}
