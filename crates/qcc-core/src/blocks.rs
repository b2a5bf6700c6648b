//! blocks.rs — Blocs de texte C fixes insérés dans le programme émis
//!
//! Ces octets font partie du contrat : le `get_self()` émis reformate
//! exactement `DECL_PROLOGUE`/`DECL_SELFREF`, toute divergence casserait la
//! propriété quine.

/// Bannière d’avertissement (supprimée par `-w`).
pub const WARNING: &str = "/* Warning: Automatically generated code; do not modify */\n";

/// Macro pour la compilation conditionnelle (ajoutée par `-d`).
pub const QUINE_MACRO: &str = "#define _QUINE_\n";

/// En-têtes standard (supprimés par `-i`).
pub const HEADERS: &str = "#include <stdlib.h>
#include <stdio.h>
#include <string.h>

";

/// Déclaration anticipée du reconstructeur (supprimée par `-p`).
pub const PROTOTYPE: &str = "const char *get_self();

";

/// Séparateur avant/après le helper.
pub const BLANK_LINE: &str = "\n";

/// Helper de décodage hex, inverse exact de `hex::encode`.
pub const HEX_DECODE_HELPER: &str = r#"size_t hex_decode(const char *input, char **output) {
  size_t l = strlen(input);
  char *decoded = *output = malloc(l / 2 + 1);
  while (*input) {
    unsigned char byte;
    sscanf(input, "%2hhx", &byte);
    *decoded++ = byte;
    input += 2;
  }
  *decoded = 0;
  return decoded - *output;
}
"#;

/// Segment d’auto-référence : constant, indépendant de l’entrée et des options.
pub const SELF_REF: &str = r#"const char *get_self() {
  static char *self;
  if (self == NULL) {
    char *decoded_prologue, *decoded_selfref;
    size_t c_prologue = hex_decode(prologue, &decoded_prologue);
    size_t c_selfref = hex_decode(selfref, &decoded_selfref);
    self = malloc(c_prologue + c_selfref + strlen(prologue) + strlen(selfref) + 0x1000);
    sprintf(self, "%sconst char prologue[] = %c%s%c;\nconst char selfref[] = %c%s%c;\n\n%s",
            decoded_prologue, 34, prologue, 34, 34, selfref, 34, decoded_selfref);
    free(decoded_prologue), free(decoded_selfref);
  }
  return self;
}
"#;

/* ─────────────── Déclarations des deux littéraux ─────────────── */

pub const DECL_PROLOGUE_OPEN: &str = "const char prologue[] = \"";
pub const DECL_PROLOGUE_CLOSE: &str = "\";\n";
pub const DECL_SELFREF_OPEN: &str = "const char selfref[] = \"";
pub const DECL_SELFREF_CLOSE: &str = "\";\n\n";
