//! logging.rs — Initialisation `env_logger`
//!
//! Niveau fixé par `-v` (aucune variable d’env lue). Sortie sur stderr :
//! stdout ne porte que le programme émis.

use env_logger::{Builder, Target};
use log::LevelFilter;

/// 0 → warn, 1 → info, 2 → debug, 3+ → trace.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Idempotent : un second appel est ignoré.
pub fn init(verbose: u8) {
    let _ = Builder::new()
        .filter_level(level_for(verbose))
        .target(Target::Stderr)
        .try_init();
}
