//! qcc — émetteur de quines (variante complète)
//!
//! Voir `qcc_cli` pour le détail des options.

use std::process::ExitCode;

fn main() -> ExitCode {
    qcc_cli::main_with(std::env::args_os())
}
