//! scratch.rs — Stockage d’accumulation du prologue
//!
//! Cycle de vie : créé vide, uniquement des ajouts, rembobiné, relu une fois,
//! puis libéré au `drop` (le fichier temporaire disparaît avec lui).

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use log::debug;

use crate::config::ScratchKind;
use crate::{Error, Result};

/// Cible d’accumulation : un seul écrivain, un seul lecteur, en séquence.
pub trait Scratch: Read + Write + Seek {
    /// Repositionne au début avant la relecture.
    fn rewind_for_replay(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

impl Scratch for File {}
impl Scratch for Cursor<Vec<u8>> {}
impl<S: Scratch + ?Sized> Scratch for Box<S> {}

/// Ouvre un stockage neuf du type demandé.
///
/// L’échec de création est fatal (`Error::Scratch`).
pub fn open(kind: ScratchKind) -> Result<Box<dyn Scratch>> {
    match kind {
        ScratchKind::TempFile => {
            let f = tempfile::tempfile().map_err(Error::Scratch)?;
            debug!(target: "qcc::scratch", "temp file created");
            Ok(Box::new(f))
        }
        ScratchKind::Memory => Ok(Box::new(Cursor::new(Vec::new()))),
    }
}
