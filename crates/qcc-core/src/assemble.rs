//! assemble.rs — Construction du prologue et rendu du programme émis
//!
//! Ordre du prologue (chaque bloc optionnel selon `EmitConfig`) :
//!   1. bannière        (sauf `suppress_warning`)
//!   2. en-têtes        (sauf `suppress_include`)
//!   3. prototype       (sauf `suppress_prototype`)
//!   4. `#define _QUINE_` (si `define_macro`)
//!   5. source d’origine, copiée telle quelle par blocs de `chunk_size`
//!   6. ligne vide
//!   7. helper `hex_decode`
//!   8. ligne vide
//!
//! Puis, sur le flux visible uniquement :
//!   a. `const char prologue[] = "<hex(prologue)>";`
//!   b. `const char selfref[] = "<hex(SELF_REF)>";` + ligne vide
//!   c. `SELF_REF` en clair
//!
//! Usage typique :
//! ```no_run
//! use qcc_core::{quine_source, EmitConfig};
//! let src = std::fs::File::open("main.c").unwrap();
//! let report = quine_source(src, &EmitConfig::default(), std::io::stdout().lock()).unwrap();
//! eprintln!("{} bytes", report.total_written);
//! ```

#![forbid(unsafe_code)]

use std::io::{self, Cursor, Read, Write};

use log::{debug, info};

use crate::blocks;
use crate::config::{EmitConfig, ScratchKind};
use crate::dual::DualWriter;
use crate::hex;
use crate::scratch::{self, Scratch};
use crate::Result;

/* ───────────────────────────── Types publics ───────────────────────────── */

/// Bilan d’une émission (pour logs/tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitReport {
    /// Octets lus depuis la source.
    pub source_len: u64,
    /// Octets du prologue (blocs + source + helper).
    pub prologue_len: u64,
    /// Octets écrits au total sur le flux visible.
    pub total_written: u64,
}

/// Couple (prologue, selfref) construit en mémoire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub prologue: Vec<u8>,
    pub selfref: &'static [u8],
}

impl Assembly {
    pub fn prologue_hex(&self) -> String { hex::encode(&self.prologue) }
    pub fn selfref_hex(&self) -> String { hex::encode(self.selfref) }

    /// Texte complet du programme émis, identique à la sortie de `quine_source`.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.prologue.len() * 3 + self.selfref.len() * 3 + 64,
        );
        out.extend_from_slice(&self.prologue);
        render_literals(&mut out, &self.prologue_hex(), &self.selfref_hex());
        out.extend_from_slice(self.selfref);
        out
    }
}

/// Les deux déclarations de littéraux, dans le format que `get_self()` reformate.
pub(crate) fn render_literals(out: &mut Vec<u8>, prologue_hex: &str, selfref_hex: &str) {
    out.extend_from_slice(blocks::DECL_PROLOGUE_OPEN.as_bytes());
    out.extend_from_slice(prologue_hex.as_bytes());
    out.extend_from_slice(blocks::DECL_PROLOGUE_CLOSE.as_bytes());
    out.extend_from_slice(blocks::DECL_SELFREF_OPEN.as_bytes());
    out.extend_from_slice(selfref_hex.as_bytes());
    out.extend_from_slice(blocks::DECL_SELFREF_CLOSE.as_bytes());
}

/* ───────────────────────────── Émission ───────────────────────────── */

/// Lit `source`, écrit sur `out` le programme quine complet.
///
/// Le stockage d’accumulation est créé **avant** toute écriture visible ;
/// s’il échoue, rien n’a été émis. Une erreur ultérieure laisse la sortie
/// partielle en place (pas de rollback).
pub fn quine_source<R: Read, W: Write>(source: R, cfg: &EmitConfig, out: W) -> Result<EmitReport> {
    quine_source_with(source, cfg, out, scratch::open)
}

/// Comme `quine_source`, avec l’ouverture du stockage fournie par l’appelant.
pub(crate) fn quine_source_with<R, W, S, F>(source: R, cfg: &EmitConfig, out: W, open_scratch: F) -> Result<EmitReport>
where
    R: Read,
    W: Write,
    S: Scratch,
    F: FnOnce(ScratchKind) -> Result<S>,
{
    cfg.validate()?;
    debug!(target: "qcc::assemble", "{}", cfg.summary());

    let scratch = open_scratch(cfg.scratch)?;
    let mut dual = DualWriter::new(scratch, Counting::new(out));

    let source_len = stage_prologue(&mut dual, source, cfg)?;
    let prologue_len = dual.staged_len();
    debug!(target: "qcc::assemble", "prologue staged: {prologue_len} bytes (source {source_len})");

    dual.write_visible(blocks::DECL_PROLOGUE_OPEN.as_bytes())?;
    dual.replay_hex(cfg.chunk_size)?;
    dual.write_visible(blocks::DECL_PROLOGUE_CLOSE.as_bytes())?;

    dual.write_visible(blocks::DECL_SELFREF_OPEN.as_bytes())?;
    dual.write_visible(hex::encode(blocks::SELF_REF.as_bytes()).as_bytes())?;
    dual.write_visible(blocks::DECL_SELFREF_CLOSE.as_bytes())?;

    dual.write_visible(blocks::SELF_REF.as_bytes())?;

    // libère le stockage ici
    let mut visible = dual.into_visible();
    visible.flush()?;

    let report = EmitReport { source_len, prologue_len, total_written: visible.written };
    info!(target: "qcc::assemble", "emitted {} bytes", report.total_written);
    Ok(report)
}

/// Construit le couple (prologue, selfref) sans flux visible.
pub fn assemble(source: &[u8], cfg: &EmitConfig) -> Result<Assembly> {
    cfg.validate()?;
    let mut dual = DualWriter::new(Cursor::new(Vec::new()), io::sink());
    stage_prologue(&mut dual, source, cfg)?;
    let (scratch, _) = dual.into_parts();
    Ok(Assembly { prologue: scratch.into_inner(), selfref: blocks::SELF_REF.as_bytes() })
}

/// Étapes 1 à 8. Renvoie le nombre d’octets de source copiés.
fn stage_prologue<S, O, R>(w: &mut DualWriter<S, O>, mut source: R, cfg: &EmitConfig) -> io::Result<u64>
where
    S: Scratch,
    O: Write,
    R: Read,
{
    if !cfg.suppress_warning   { w.emit_str(blocks::WARNING)?; }
    if !cfg.suppress_include   { w.emit_str(blocks::HEADERS)?; }
    if !cfg.suppress_prototype { w.emit_str(blocks::PROTOTYPE)?; }
    if cfg.define_macro        { w.emit_str(blocks::QUINE_MACRO)?; }

    let mut buf = vec![0u8; cfg.chunk_size];
    let mut copied = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        w.emit(&buf[..n])?;
        copied += n as u64;
    }

    w.emit_str(blocks::BLANK_LINE)?;
    w.emit_str(blocks::HEX_DECODE_HELPER)?;
    w.emit_str(blocks::BLANK_LINE)?;
    Ok(copied)
}

/// Compte les octets écrits sur le flux visible.
struct Counting<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> Counting<W> {
    fn new(inner: W) -> Self { Self { inner, written: 0 } }
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }
    fn flush(&mut self) -> io::Result<()> { self.inner.flush() }
}

/* ───────────────────────────── Tests ───────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;

    fn mem() -> EmitConfig { EmitConfig::new().with_scratch(ScratchKind::Memory) }

    fn emit(src: &[u8], cfg: &EmitConfig) -> (Vec<u8>, EmitReport) {
        let mut out = Vec::new();
        let r = quine_source(src, cfg, &mut out).unwrap();
        (out, r)
    }

    #[test]
    fn empty_source_default_flags() {
        let (out, r) = emit(b"", &mem());
        let text = String::from_utf8(out).unwrap();
        let expected_prologue = format!(
            "{}{}{}\n{}\n",
            blocks::WARNING, blocks::HEADERS, blocks::PROTOTYPE, blocks::HEX_DECODE_HELPER
        );
        assert!(text.starts_with(&expected_prologue));
        assert!(text.ends_with(blocks::SELF_REF));
        assert!(!text.contains(blocks::QUINE_MACRO));
        assert_eq!(r.source_len, 0);
        assert_eq!(r.prologue_len, expected_prologue.len() as u64);
        assert_eq!(r.total_written, text.len() as u64);
    }

    #[test]
    fn suppressed_blocks_leave_only_source_and_helper() {
        let cfg = mem().with_suppress_warning(true).with_suppress_include(true).with_suppress_prototype(true);
        let a = assemble(b"hello\n", &cfg).unwrap();
        let expected = format!("hello\n\n{}\n", blocks::HEX_DECODE_HELPER);
        assert_eq!(a.prologue, expected.as_bytes());
    }

    #[test]
    fn macro_follows_prototype() {
        let a = assemble(b"int x;\n", &mem().with_define_macro(true)).unwrap();
        let text = String::from_utf8(a.prologue).unwrap();
        let proto = text.find(blocks::PROTOTYPE).unwrap();
        let mac = text.find(blocks::QUINE_MACRO).unwrap();
        let src = text.find("int x;").unwrap();
        assert!(proto < mac && mac < src);
    }

    #[test]
    fn stream_output_equals_render() {
        let src = b"int main(void) { puts(get_self()); }\n";
        for cfg in [mem(), EmitConfig::default(), mem().with_chunk_size(3)] {
            let (out, _) = emit(src, &cfg);
            assert_eq!(out, assemble(src, &cfg).unwrap().render());
        }
    }

    #[test]
    fn visible_prologue_decodes_from_literal() {
        let src = b"char q = '\"'; char *s = \"a\\\\b\";\0tail";
        let (out, r) = emit(src, &mem());
        let prologue_len = usize::try_from(r.prologue_len).unwrap();
        let shown = &out[..prologue_len];
        let open = blocks::DECL_PROLOGUE_OPEN.as_bytes();
        assert_eq!(&out[prologue_len..prologue_len + open.len()], open);
        let start = prologue_len + open.len();
        let end = start + prologue_len * 2;
        let literal = std::str::from_utf8(&out[start..end]).unwrap();
        assert_eq!(hex::decode(literal).unwrap(), shown);
    }

    #[test]
    fn source_is_never_rewritten() {
        let src: Vec<u8> = (0..=255u8).collect();
        let a = assemble(&src, &mem()).unwrap();
        assert!(a.prologue.windows(src.len()).any(|w| w == src.as_slice()));
    }

    #[test]
    fn invalid_config_writes_nothing() {
        let mut out = Vec::new();
        let err = quine_source(&b"x"[..], &mem().with_chunk_size(0), &mut out).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn scratch_failure_writes_nothing() {
        let mut out = Vec::new();
        let mut asked = None;
        let err = quine_source_with(&b"int x;\n"[..], &EmitConfig::default(), &mut out, |kind| {
            asked = Some(kind);
            Err::<Cursor<Vec<u8>>, _>(crate::Error::Scratch(io::Error::from_raw_os_error(24)))
        })
        .unwrap_err();
        assert_eq!(asked, Some(ScratchKind::TempFile));
        assert!(matches!(err, crate::Error::Scratch(_)));
        assert!(err.to_string().starts_with("error creating temporary file:"));
        assert!(out.is_empty());
    }
}
