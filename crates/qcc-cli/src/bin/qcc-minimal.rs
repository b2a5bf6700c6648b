//! qcc-minimal — variante sans options
//!
//! USAGE
//!   qcc-minimal <source file>
//!
//! Tous les blocs optionnels sont toujours inclus. Nombre d’arguments
//! incorrect → usage sur stdout, code 1.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use qcc_cli::{emit_file, logging};
use qcc_core::EmitConfig;

const USAGE: &str = "Usage: qcc <source file>\n";
const EXIT_USAGE: u8 = 1;

fn main() -> ExitCode {
    let mut args = std::env::args_os().skip(1).collect::<Vec<_>>();
    if args.len() != 1 {
        print!("{USAGE}");
        return ExitCode::from(EXIT_USAGE);
    }
    logging::init(0);

    let path = PathBuf::from(args.remove(0));
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = emit_file(&path, &EmitConfig::default(), &mut out);
    let flushed = out.flush();

    match (result, flushed) {
        (Ok(_), Ok(())) => ExitCode::SUCCESS,
        (Err(e), _) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
        (Ok(_), Err(e)) => {
            eprintln!("io: {e}");
            ExitCode::from(qcc_cli::error::EXIT_FAILURE)
        }
    }
}
