//! error.rs — Erreurs de la CLI et codes de sortie
//!
//! Numérotation héritée de qcc : 1 trop d’arguments, 2 option vide,
//! 3 option inconnue, 4 stockage temporaire, errno pour l’ouverture.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub const EXIT_TOO_MANY_ARGUMENTS: u8 = 1;
pub const EXIT_EMPTY_OPTION: u8 = 2;
pub const EXIT_UNKNOWN_OPTION: u8 = 3;
pub const EXIT_SCRATCH: u8 = 4;
/// Toute autre erreur (usage clap, I/O sur stdout…).
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Too many arguments")]
    TooManyArguments,

    #[error("Empty option: {0}")]
    EmptyOption(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// Autre erreur d’arguments rapportée par clap
    #[error("{0}")]
    Usage(String),

    #[error("error opening source file: {}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Core(#[from] qcc_core::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::TooManyArguments => EXIT_TOO_MANY_ARGUMENTS,
            CliError::EmptyOption(_) => EXIT_EMPTY_OPTION,
            CliError::UnknownOption(_) => EXIT_UNKNOWN_OPTION,
            CliError::Usage(_) => EXIT_FAILURE,
            CliError::SourceOpen { source, .. } => os_code(source),
            CliError::Core(e) => core_exit_code(e),
        }
    }
}

/// Code de sortie pour une erreur du cœur.
pub fn core_exit_code(e: &qcc_core::Error) -> u8 {
    match e {
        qcc_core::Error::Scratch(_) => EXIT_SCRATCH,
        _ => EXIT_FAILURE,
    }
}

/// errno de l’OS, borné à l’octet de statut ; 1 si absent ou nul.
fn os_code(e: &io::Error) -> u8 {
    e.raw_os_error()
        .and_then(|c| u8::try_from(c).ok())
        .filter(|&c| c != 0)
        .unwrap_or(EXIT_FAILURE)
}
