// src/textfix.rs

//! Repair of garbled tool output.
//!
//! Node toolchains on Windows consoles tend to emit UTF-8 box drawing and
//! check marks that arrive mis-decoded (UTF-8 bytes read as cp1252). This
//! table maps the common mangled sequences back to plain ASCII before the
//! printer shows them. Presentation-only; captured output in reports and
//! history is stored untouched.

/// Mangled sequence → ASCII replacement, longest sequences first so prefixes
/// don't shadow longer matches.
const REPAIRS: &[(&str, &str)] = &[
    ("\u{00e2}\u{0153}\u{201c}", "[OK]"),  // ✓
    ("\u{00e2}\u{0153}\u{2014}", "[X]"),   // ✗
    ("\u{00e2}\u{2020}\u{2019}", "->"),    // →
    ("\u{00e2}\u{20ac}\u{00a6}", "..."),   // …
    ("\u{00e2}\u{201d}\u{20ac}", "-"),     // ─
    ("\u{00e2}\u{201d}\u{201a}", "|"),     // │
    ("\u{00e2}\u{201d}\u{0152}", "+"),     // ┌
    ("\u{00e2}\u{201d}\u{201d}", "+"),     // └
    ("\u{00e2}\u{201d}\u{0153}", "+"),     // ├
    ("\u{00e2}\u{2013}\u{00b6}", ">"),     // ▶
];

/// Replace known mangled byte sequences with readable ASCII.
pub fn repair(input: &str) -> String {
    let mut out = input.to_string();
    for (bad, replacement) in REPAIRS {
        if out.contains(bad) {
            out = out.replace(bad, replacement);
        }
    }
    out
}
