//! hex.rs — Encodage hexadécimal des littéraux embarqués
//!
//! Chaque octet devient exactement deux chiffres hex minuscules, dans l’ordre.
//! L’alphabet ne contient ni guillemet, ni antislash, ni fin de ligne : le
//! résultat se pose tel quel entre deux `"` dans un source C.

#![forbid(unsafe_code)]

use std::fmt;
use std::io::{self, Write};

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Taille du tampon de sortie de `encode_to` (en octets d’entrée).
const ENCODE_BLOCK: usize = 0x800;

/// Erreurs de décodage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexError {
    /// Longueur impaire : le dernier octet serait incomplet
    OddLength { len: usize },
    /// Caractère hors `[0-9a-fA-F]`
    InvalidDigit { index: usize, byte: u8 },
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexError::OddLength { len } => write!(f, "odd literal length {len}"),
            HexError::InvalidDigit { index, byte } => {
                write!(f, "invalid hex digit 0x{byte:02x} at offset {index}")
            }
        }
    }
}

impl std::error::Error for HexError {}

#[inline]
fn push_byte(out: &mut Vec<u8>, b: u8) {
    out.push(DIGITS[usize::from(b >> 4)]);
    out.push(DIGITS[usize::from(b & 0x0f)]);
}

/// Encode `bytes` en texte hexadécimal. L’entrée vide donne `""`.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len() * 2);
    for &b in bytes {
        push_byte(&mut out, b);
    }
    // l’alphabet est ASCII
    out.into_iter().map(char::from).collect()
}

/// Variante streaming : écrit l’encodage de `bytes` dans `w`, par blocs.
///
/// Renvoie le nombre d’octets hex écrits (toujours `2 * bytes.len()`).
pub fn encode_to<W: Write + ?Sized>(w: &mut W, bytes: &[u8]) -> io::Result<usize> {
    let mut buf = Vec::with_capacity(ENCODE_BLOCK * 2);
    for block in bytes.chunks(ENCODE_BLOCK) {
        buf.clear();
        for &b in block {
            push_byte(&mut buf, b);
        }
        w.write_all(&buf)?;
    }
    Ok(bytes.len() * 2)
}

#[inline]
fn nibble(byte: u8, index: usize) -> Result<u8, HexError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(HexError::InvalidDigit { index, byte }),
    }
}

/// Inverse exact de [`encode`].
///
/// Même sémantique que le `hex_decode` C émis : une paire de chiffres par
/// octet, la sortie fait `len / 2` octets. Contrairement au C, une longueur
/// impaire ou un caractère non hex est une erreur.
pub fn decode(text: &str) -> Result<Vec<u8>, HexError> {
    let raw = text.as_bytes();
    if raw.len() % 2 != 0 {
        return Err(HexError::OddLength { len: raw.len() });
    }
    let mut out = Vec::with_capacity(raw.len() / 2);
    for (i, pair) in raw.chunks_exact(2).enumerate() {
        let hi = nibble(pair[0], i * 2)?;
        let lo = nibble(pair[1], i * 2 + 1)?;
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_maps_to_empty() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn zero_padded_lowercase() {
        assert_eq!(encode(&[0x00, 0x0a, 0xff, 0x7f]), "000aff7f");
        assert_eq!(encode(b"\"\\\n"), "225c0a");
    }

    #[test]
    fn high_bytes_stay_two_digits() {
        // le `%02x` sur `char` signé du C donnerait "ffffff80"
        assert_eq!(encode(&[0x80]), "80");
    }

    #[test]
    fn decode_accepts_uppercase() {
        assert_eq!(decode("DEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert_eq!(decode("abc"), Err(HexError::OddLength { len: 3 }));
    }

    #[test]
    fn decode_rejects_non_hex() {
        let err = decode("0g").unwrap_err();
        assert_eq!(err, HexError::InvalidDigit { index: 1, byte: b'g' });
        assert!(err.to_string().contains("offset 1"));
    }

    #[test]
    fn encode_to_matches_encode_across_blocks() {
        let data: Vec<u8> = (0..=255u8).cycle().take(ENCODE_BLOCK * 3 + 7).collect();
        let mut sink = Vec::new();
        let n = encode_to(&mut sink, &data).unwrap();
        assert_eq!(n, data.len() * 2);
        assert_eq!(String::from_utf8(sink).unwrap(), encode(&data));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let text = encode(&bytes);
            prop_assert_eq!(text.len(), bytes.len() * 2);
            prop_assert!(text.bytes().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c)));
            prop_assert_eq!(decode(&text).unwrap(), bytes);
        }
    }
}
