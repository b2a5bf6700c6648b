//! dual.rs — Écriture double canal
//!
//! Tout texte destiné au prologue passe par `emit` : il est ajouté au
//! stockage d’accumulation **puis** écrit sur le flux visible, dans cet ordre.
//! La relecture (`replay_hex`) rend ensuite l’accumulé en hex sur le flux
//! visible, sans seconde passe sur la source.
//!
//! Invariant : octets visibles pendant la phase `emit` == octets accumulés.

use std::io::{self, Read, Write};

use log::trace;

use crate::hex;
use crate::scratch::Scratch;

/// Écrivain double canal. Exclusivement possédé par l’assembleur.
pub struct DualWriter<S: Scratch, O: Write> {
    scratch: S,
    visible: O,
    staged: u64,
}

impl<S: Scratch, O: Write> DualWriter<S, O> {
    pub fn new(scratch: S, visible: O) -> Self {
        Self { scratch, visible, staged: 0 }
    }

    /// Ajoute `bytes` à l’accumulé puis les écrit sur le flux visible.
    pub fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.scratch.write_all(bytes)?;
        self.visible.write_all(bytes)?;
        self.staged += bytes.len() as u64;
        trace!(target: "qcc::dual", "emit {} bytes (staged={})", bytes.len(), self.staged);
        Ok(())
    }

    /// Raccourci texte.
    pub fn emit_str(&mut self, text: &str) -> io::Result<()> {
        self.emit(text.as_bytes())
    }

    /// Octets accumulés jusqu’ici.
    pub fn staged_len(&self) -> u64 { self.staged }

    /// Écrit sur le flux visible uniquement (rien n’est accumulé).
    pub fn write_visible(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.visible.write_all(bytes)
    }

    /// Rembobine l’accumulé et l’écrit en hex sur le flux visible, par blocs
    /// de `chunk` octets. Renvoie le nombre d’octets relus.
    pub fn replay_hex(&mut self, chunk: usize) -> io::Result<u64> {
        self.scratch.rewind_for_replay()?;
        let mut buf = vec![0u8; chunk.max(1)];
        let mut replayed = 0u64;
        loop {
            let n = match self.scratch.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hex::encode_to(&mut self.visible, &buf[..n])?;
            replayed += n as u64;
        }
        if replayed != self.staged {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("scratch replay short: {replayed} of {} bytes", self.staged),
            ));
        }
        Ok(replayed)
    }

    /// Libère le stockage d’accumulation et rend le flux visible.
    pub fn into_visible(self) -> O {
        self.visible
    }

    /// Rend les deux canaux (l’accumulé n’est pas rembobiné).
    pub fn into_parts(self) -> (S, O) {
        (self.scratch, self.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn emit_mirrors_both_channels() {
        let mut w = DualWriter::new(Cursor::new(Vec::new()), Vec::new());
        w.emit_str("line \"one\"\n").unwrap();
        w.emit(&[0, b'\\', 0xff]).unwrap();
        assert_eq!(w.staged_len(), 14);
        let out = w.into_visible();
        assert_eq!(out, b"line \"one\"\n\0\\\xff");
    }

    #[test]
    fn replay_encodes_what_was_shown() {
        let mut w = DualWriter::new(Cursor::new(Vec::new()), Vec::new());
        w.emit_str("ab").unwrap();
        w.write_visible(b"|").unwrap();
        // petit bloc pour forcer plusieurs lectures
        assert_eq!(w.replay_hex(1).unwrap(), 2);
        assert_eq!(w.into_visible(), b"ab|6162");
    }

    #[test]
    fn visible_only_writes_are_not_staged() {
        let mut w = DualWriter::new(Cursor::new(Vec::new()), Vec::new());
        w.write_visible(b"xyz").unwrap();
        assert_eq!(w.staged_len(), 0);
        w.replay_hex(16).unwrap();
        assert_eq!(w.into_visible(), b"xyz");
    }
}
