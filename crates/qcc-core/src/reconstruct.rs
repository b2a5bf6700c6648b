//! reconstruct.rs — Miroir Rust du `get_self()` émis
//!
//! Permet de vérifier la propriété quine sans toolchain C : on extrait les
//! deux littéraux d’un programme émis, on reconstruit, on compare.
//!
//! Forme reconstruite :
//!   `<prologue décodé>const char prologue[] = "<hex>";\n`
//!   `const char selfref[] = "<hex>";\n\n<selfref décodé>`

use once_cell::sync::OnceCell;

use crate::assemble::render_literals;
use crate::blocks;
use crate::hex;
use crate::{Error, Result};

/// Reconstruit le programme complet à partir des deux littéraux hex.
pub fn reconstruct(prologue_hex: &str, selfref_hex: &str) -> Result<Vec<u8>> {
    let prologue = hex::decode(prologue_hex)?;
    let selfref = hex::decode(selfref_hex)?;
    let mut out = Vec::with_capacity(
        prologue.len() + selfref.len() + prologue_hex.len() + selfref_hex.len() + 0x100,
    );
    out.extend_from_slice(&prologue);
    render_literals(&mut out, prologue_hex, selfref_hex);
    out.extend_from_slice(&selfref);
    Ok(out)
}

/// Les deux littéraux d’un programme émis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedLiterals {
    pub prologue_hex: String,
    pub selfref_hex: String,
}

impl EmbeddedLiterals {
    /// Retrouve les littéraux en partant de la fin : la source utilisateur
    /// (donc le prologue en clair) peut contenir les mêmes marqueurs.
    pub fn parse(program: &[u8]) -> Result<Self> {
        let body = program
            .strip_suffix(blocks::SELF_REF.as_bytes())
            .ok_or_else(|| malformed("missing trailing get_self() routine"))?;
        let body = body
            .strip_suffix(blocks::DECL_SELFREF_CLOSE.as_bytes())
            .ok_or_else(|| malformed("selfref declaration not terminated"))?;

        let open = rfind(body, blocks::DECL_SELFREF_OPEN.as_bytes())
            .ok_or_else(|| malformed("selfref declaration not found"))?;
        let selfref_hex = ascii(&body[open + blocks::DECL_SELFREF_OPEN.len()..])?;

        let body = body[..open]
            .strip_suffix(blocks::DECL_PROLOGUE_CLOSE.as_bytes())
            .ok_or_else(|| malformed("prologue declaration not terminated"))?;
        let open = rfind(body, blocks::DECL_PROLOGUE_OPEN.as_bytes())
            .ok_or_else(|| malformed("prologue declaration not found"))?;
        let prologue_hex = ascii(&body[open + blocks::DECL_PROLOGUE_OPEN.len()..])?;

        Ok(Self { prologue_hex, selfref_hex })
    }

    pub fn reconstruct(&self) -> Result<Vec<u8>> {
        reconstruct(&self.prologue_hex, &self.selfref_hex)
    }
}

fn malformed(msg: &str) -> Error { Error::Malformed(msg.into()) }

fn rfind(hay: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > hay.len() { return None; }
    (0..=hay.len() - needle.len()).rev().find(|&i| &hay[i..i + needle.len()] == needle)
}

fn ascii(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| malformed("literal is not ASCII"))
}

/* ───────────────────────── Image mémoïsée ───────────────────────── */

/// Reconstruction calculée au plus une fois, puis servie depuis le cache
/// (équivalent du `static char *self` du C, sans état global caché).
#[derive(Debug)]
pub struct SelfImage {
    literals: EmbeddedLiterals,
    cell: OnceCell<Vec<u8>>,
}

impl SelfImage {
    pub fn new(literals: EmbeddedLiterals) -> Self {
        Self { literals, cell: OnceCell::new() }
    }

    /// Bytes du programme ; le premier appel calcule, les suivants relisent.
    pub fn get(&self) -> Result<&[u8]> {
        self.cell
            .get_or_try_init(|| self.literals.reconstruct())
            .map(Vec::as_slice)
    }

    pub fn is_computed(&self) -> bool { self.cell.get().is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::config::{EmitConfig, ScratchKind};

    fn program(src: &[u8]) -> Vec<u8> {
        let cfg = EmitConfig::new().with_scratch(ScratchKind::Memory);
        assemble(src, &cfg).unwrap().render()
    }

    #[test]
    fn parse_then_reconstruct_is_identity() {
        let p = program(b"int main(void) { return 0; }\n");
        let lits = EmbeddedLiterals::parse(&p).unwrap();
        assert_eq!(lits.reconstruct().unwrap(), p);
    }

    #[test]
    fn source_containing_markers_still_parses() {
        let tricky = format!(
            "{}\"abcd\";\n{}\"00\";\n\n",
            blocks::DECL_PROLOGUE_OPEN, blocks::DECL_SELFREF_OPEN
        );
        let p = program(tricky.as_bytes());
        assert_eq!(EmbeddedLiterals::parse(&p).unwrap().reconstruct().unwrap(), p);
    }

    #[test]
    fn truncated_program_is_malformed() {
        let p = program(b"x");
        let cut = &p[..p.len() - 1];
        assert!(matches!(EmbeddedLiterals::parse(cut), Err(Error::Malformed(_))));
    }

    #[test]
    fn bad_hex_surfaces_as_hex_error() {
        assert!(matches!(reconstruct("abc", ""), Err(Error::Hex(_))));
    }

    #[test]
    fn self_image_computes_once() {
        let p = program(b"/* memo */\n");
        let img = SelfImage::new(EmbeddedLiterals::parse(&p).unwrap());
        assert!(!img.is_computed());
        let first = img.get().unwrap().as_ptr();
        assert!(img.is_computed());
        let second = img.get().unwrap();
        assert_eq!(first, second.as_ptr());
        assert_eq!(second, p.as_slice());
    }
}
