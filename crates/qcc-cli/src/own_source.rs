//! own_source.rs — `qcc -q` : affiche le source de qcc lui-même
//!
//! Remplace la variante C compilée avec `_QUINE_`. Le texte est assemblé une
//! seule fois par process.

use std::fmt::Write as _;

use once_cell::sync::Lazy;

const CLI_SOURCES: &[(&str, &str)] = &[
    ("crates/qcc-cli/src/lib.rs", include_str!("lib.rs")),
    ("crates/qcc-cli/src/error.rs", include_str!("error.rs")),
    ("crates/qcc-cli/src/logging.rs", include_str!("logging.rs")),
    ("crates/qcc-cli/src/own_source.rs", include_str!("own_source.rs")),
    ("crates/qcc-cli/src/main.rs", include_str!("main.rs")),
    ("crates/qcc-cli/src/bin/qcc-minimal.rs", include_str!("bin/qcc-minimal.rs")),
];

static OWN_SOURCE: Lazy<String> = Lazy::new(|| {
    let mut s = String::new();
    for (path, text) in qcc_core::own_sources().iter().chain(CLI_SOURCES) {
        let _ = writeln!(s, "// ==== {path} ====");
        s.push_str(text);
        if !text.ends_with('\n') { s.push('\n'); }
    }
    s
});

pub fn own_source() -> &'static str {
    &OWN_SOURCE
}
