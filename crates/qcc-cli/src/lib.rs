//! qcc-cli/src/lib.rs — CLI lib pour qcc
//!
//! `qcc [options] <source file>` écrit sur stdout le source augmenté de
//! `get_self()`. Les options courtes se combinent (`-wip`).
//!
//! Conçu pour être testé en process : `parse` ne quitte jamais, `execute`
//! écrit dans n’importe quel `Write`.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};
use log::debug;

use qcc_core::{quine_source, EmitConfig, EmitReport};

pub mod error;
pub mod logging;
#[cfg(feature = "self-source")]
pub mod own_source;

pub use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "qcc", version, about = "Quine source emitter", long_about = None)]
#[command(override_usage = "qcc [options] <source file>")]
#[command(args_override_self = true)]
pub struct Cli {
    /// Suppress #include directives
    #[arg(short = 'i')]
    pub suppress_include: bool,

    /// Suppress function prototype
    #[arg(short = 'p')]
    pub suppress_prototype: bool,

    /// Suppress warning against modification
    #[arg(short = 'w')]
    pub suppress_warning: bool,

    /// Define macro for conditional compilation
    #[arg(short = 'd')]
    pub define_macro: bool,

    /// Output own source code
    #[cfg(feature = "self-source")]
    #[arg(short = 'q')]
    pub output_self: bool,

    /// Verbosité sur stderr (répéter pour plus de bruit)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Source file (at most one)
    #[arg(value_name = "source file")]
    pub sources: Vec<PathBuf>,
}

/// Ce que `parse` a compris de la ligne de commande.
#[derive(Debug)]
pub enum Parsed {
    Run(Cli),
    /// `--help` / `--version` : texte déjà rendu, à afficher sur stdout
    Info(String),
}

impl Cli {
    pub fn emit_config(&self) -> EmitConfig {
        EmitConfig::new()
            .with_suppress_include(self.suppress_include)
            .with_suppress_prototype(self.suppress_prototype)
            .with_suppress_warning(self.suppress_warning)
            .with_define_macro(self.define_macro)
    }

    /// Source unique, après validation par `parse`.
    pub fn source(&self) -> Option<&Path> {
        self.sources.first().map(PathBuf::as_path)
    }
}

/// Parse sans jamais quitter le process.
///
/// Une option répétée (`-ii`) est acceptée. `--` n’est pas un séparateur :
/// c’est une option inconnue, signalée après les arguments qui la précèdent.
pub fn parse<I, T>(args: I) -> Result<Parsed, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let head = match args.iter().skip(1).position(|a| a == "--") {
        Some(i) => &args[..=i],
        None => &args[..],
    };

    let cli = match Cli::try_parse_from(head) {
        Ok(c) => c,
        Err(e) => {
            return match map_clap(e, head) {
                ClapOutcome::Info(text) => Ok(Parsed::Info(text)),
                ClapOutcome::Fail(err) => Err(err),
            }
        }
    };
    if head.len() < args.len() {
        return Err(CliError::UnknownOption("--".into()));
    }
    if cli.sources.iter().any(|p| p.as_os_str() == "-") {
        return Err(CliError::EmptyOption("-".into()));
    }
    if cli.sources.len() > 1 {
        return Err(CliError::TooManyArguments);
    }
    Ok(Parsed::Run(cli))
}

enum ClapOutcome {
    Info(String),
    Fail(CliError),
}

fn map_clap(e: clap::Error, args: &[OsString]) -> ClapOutcome {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ClapOutcome::Info(e.render().to_string()),
        ErrorKind::UnknownArgument => {
            let arg = match e.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(s)) => offending_token(args, s),
                _ => String::from("?"),
            };
            ClapOutcome::Fail(CliError::UnknownOption(arg))
        }
        _ => ClapOutcome::Fail(CliError::Usage(e.render().to_string())),
    }
}

/// clap ne rapporte que le caractère fautif (`-z`) ; on rend le groupe entier (`-iz`).
fn offending_token(args: &[OsString], invalid: &str) -> String {
    let short = invalid
        .strip_prefix('-')
        .filter(|rest| !rest.starts_with('-'))
        .and_then(|rest| rest.chars().next());
    if let Some(c) = short {
        for arg in args.iter().skip(1) {
            let arg = arg.to_string_lossy();
            if arg.starts_with('-') && !arg.starts_with("--") && arg[1..].contains(c) {
                return arg.into_owned();
            }
        }
    }
    invalid.to_owned()
}

/// Texte d’usage affiché quand aucune source n’est donnée.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// Ouvre `path` et émet le programme quine sur `out`.
///
/// L’ouverture échoue avant toute écriture visible.
pub fn emit_file<W: Write>(path: &Path, cfg: &EmitConfig, out: W) -> Result<EmitReport, CliError> {
    let file = File::open(path).map_err(|source| CliError::SourceOpen { path: path.to_path_buf(), source })?;
    debug!(target: "qcc::cli", "source opened: {}", path.display());
    Ok(quine_source(io::BufReader::new(file), cfg, out)?)
}

/// Exécute une ligne de commande déjà parsée.
pub fn execute<W: Write>(cli: &Cli, mut out: W) -> Result<()> {
    #[cfg(feature = "self-source")]
    {
        if cli.output_self {
            out.write_all(own_source::own_source().as_bytes()).context("writing own source")?;
            return out.flush().context("flushing stdout");
        }
    }

    match cli.source() {
        Some(path) => {
            let report = emit_file(path, &cli.emit_config(), &mut out)?;
            debug!(target: "qcc::cli", "{report:?}");
        }
        None => out.write_all(usage().as_bytes()).context("writing usage")?,
    }
    out.flush().context("flushing stdout")?;
    Ok(())
}

/// Code de sortie d’une erreur : la première erreur typée de la chaîne décide.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<qcc_core::Error>() {
            return error::core_exit_code(e);
        }
    }
    error::EXIT_FAILURE
}

/// Point d’entrée du binaire `qcc`.
pub fn main_with<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match parse(args) {
        Ok(Parsed::Run(cli)) => cli,
        Ok(Parsed::Info(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };
    logging::init(cli.verbose);
    debug!(target: "qcc::cli", "{}", qcc_core::version());

    let stdout = io::stdout();
    match execute(&cli, BufWriter::new(stdout.lock())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
