//! config.rs — Configuration de l’émission
//!
//! Valeur immuable construite une fois (depuis la CLI) puis passée
//! explicitement à l’assembleur. Aucun état global, aucune variable d’env.
//!
//! - Defaults sûrs (`EmitConfig::default()`) : tous les blocs présents
//! - Builder `with_*` (même idiome que `EmitPlan`)
//! - `validate()` avant usage

#![forbid(unsafe_code)]

use crate::{Error, Result};

/// Taille de lecture par défaut de la source (octets).
pub const DEFAULT_CHUNK_SIZE: usize = 0x1000;

/// Où accumuler le prologue pendant la construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScratchKind {
    /// Fichier temporaire anonyme, supprimé à la fermeture
    #[default]
    TempFile,
    /// Tampon mémoire extensible
    Memory,
}

/// Bascules indépendantes, sans dépendance d’ordre entre elles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitConfig {
    /// `-w` : pas de bannière d’avertissement
    pub suppress_warning: bool,
    /// `-i` : pas d’`#include`
    pub suppress_include: bool,
    /// `-p` : pas de prototype `get_self()`
    pub suppress_prototype: bool,
    /// `-d` : ajoute `#define _QUINE_`
    pub define_macro: bool,
    /// Taille des blocs lus depuis la source
    pub chunk_size: usize,
    /// Stockage d’accumulation
    pub scratch: ScratchKind,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            suppress_warning: false,
            suppress_include: false,
            suppress_prototype: false,
            define_macro: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            scratch: ScratchKind::TempFile,
        }
    }
}

impl EmitConfig {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_suppress_warning(mut self, yes: bool) -> Self { self.suppress_warning = yes; self }
    #[must_use]
    pub fn with_suppress_include(mut self, yes: bool) -> Self { self.suppress_include = yes; self }
    #[must_use]
    pub fn with_suppress_prototype(mut self, yes: bool) -> Self { self.suppress_prototype = yes; self }
    #[must_use]
    pub fn with_define_macro(mut self, yes: bool) -> Self { self.define_macro = yes; self }
    #[must_use]
    pub fn with_chunk_size(mut self, n: usize) -> Self { self.chunk_size = n; self }
    #[must_use]
    pub fn with_scratch(mut self, kind: ScratchKind) -> Self { self.scratch = kind; self }

    /// Vérifie la cohérence (appelé par l’assembleur avant toute écriture).
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be > 0".into()));
        }
        Ok(())
    }

    /// Résumé court pour les logs.
    pub fn summary(&self) -> String {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        format!(
            "flags={}{}{}{} chunk={} scratch={:?}",
            flag(self.suppress_include, 'i'),
            flag(self.suppress_prototype, 'p'),
            flag(self.suppress_warning, 'w'),
            flag(self.define_macro, 'd'),
            self.chunk_size,
            self.scratch,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_includes_everything() {
        let c = EmitConfig::default();
        assert!(!c.suppress_warning && !c.suppress_include && !c.suppress_prototype);
        assert!(!c.define_macro);
        assert_eq!(c.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(c.scratch, ScratchKind::TempFile);
        c.validate().unwrap();
    }

    #[test]
    fn zero_chunk_rejected() {
        let err = EmitConfig::new().with_chunk_size(0).validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn summary_lists_flags() {
        let c = EmitConfig::new().with_suppress_include(true).with_define_macro(true);
        assert!(c.summary().starts_with("flags=i--d"));
    }
}
