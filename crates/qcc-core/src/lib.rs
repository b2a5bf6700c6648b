//! qcc-core — Cœur de l’émetteur de quines `qcc`
//!
//! À partir d’un source C quelconque (traité comme un blob d’octets opaque),
//! produit un programme C augmenté d’une routine `get_self()` qui reconstruit,
//! octet pour octet, le texte complet émis.
//!
//! ## Modules
//! - `hex`         : encodeur/décodeur hexadécimal (minuscules, 2 chiffres/octet).
//! - `blocks`      : blocs de texte C fixes (bannière, en-têtes, helper, selfref).
//! - `config`      : `EmitConfig`, immuable, passé explicitement à l’assembleur.
//! - `scratch`     : stockage d’accumulation (fichier temporaire ou mémoire).
//! - `dual`        : écriture double canal (stdout + tampon d’accumulation).
//! - `assemble`    : construction du prologue et rendu final.
//! - `reconstruct` : miroir Rust de `get_self()` (vérifie la propriété quine).
//!
//! ## Features
//! - **self-source** : expose `own_sources()` (les fichiers de ce crate).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

use thiserror::Error;

// ---------- Modules publics ----------
pub mod assemble;
pub mod blocks;
pub mod config;
pub mod dual;
pub mod hex;
pub mod reconstruct;
pub mod scratch;

// ---------- Reexports de confort ----------
pub use assemble::{assemble, quine_source, Assembly, EmitReport};
pub use config::{EmitConfig, ScratchKind};
pub use hex::{decode, encode, HexError};
pub use reconstruct::{reconstruct, EmbeddedLiterals, SelfImage};

// ---------- Version ----------
/// Version du crate (lisible, via Cargo).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renvoie une bannière de version (utile pour logs/outils).
pub fn version() -> String {
    format!("qcc-core {VERSION}")
}

// ---------- Erreurs & Résultat ----------
#[derive(Debug, Error)]
pub enum Error {
    /// I/O sur la source ou le flux visible
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Le stockage d’accumulation n’a pas pu être créé
    #[error("error creating temporary file: {}", .0.raw_os_error().unwrap_or(0))]
    Scratch(#[source] std::io::Error),

    /// Littéral hexadécimal invalide
    #[error("hex: {0}")]
    Hex(#[from] HexError),

    /// Configuration rejetée par `EmitConfig::validate`
    #[error("config: {0}")]
    Config(String),

    /// Programme émis dont on ne retrouve pas les littéraux
    #[error("malformed program: {0}")]
    Malformed(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

// ---------- Prelude ----------
pub mod prelude {
    pub use crate::{
        assemble, decode, encode, quine_source, reconstruct, Assembly, EmbeddedLiterals,
        EmitConfig, EmitReport, Error, Result, ScratchKind, SelfImage,
    };
}

// ---------- Sources embarquées ----------
/// Sources de ce crate, dans l’ordre de déclaration des modules.
#[cfg(feature = "self-source")]
pub fn own_sources() -> &'static [(&'static str, &'static str)] {
    &[
        ("crates/qcc-core/src/lib.rs", include_str!("lib.rs")),
        ("crates/qcc-core/src/assemble.rs", include_str!("assemble.rs")),
        ("crates/qcc-core/src/blocks.rs", include_str!("blocks.rs")),
        ("crates/qcc-core/src/config.rs", include_str!("config.rs")),
        ("crates/qcc-core/src/dual.rs", include_str!("dual.rs")),
        ("crates/qcc-core/src/hex.rs", include_str!("hex.rs")),
        ("crates/qcc-core/src/reconstruct.rs", include_str!("reconstruct.rs")),
        ("crates/qcc-core/src/scratch.rs", include_str!("scratch.rs")),
    ]
}
