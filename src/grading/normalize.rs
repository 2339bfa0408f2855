//! Canonical comparable form for answer text.

use unicode_normalization::UnicodeNormalization;

use super::alphabet::SymbolAlphabet;

/// Normalize a raw answer for comparison
/// - NFKC compatibility normalization (full-width → half-width, ① → 1, ㄱ → ᄀ)
/// - Unifies line endings and non-breaking spaces
/// - Collapses whitespace runs to one space and trims
/// - Lowercases
///
/// Idempotent, and never fails: empty in, empty out.
pub fn normalize(text: &str) -> String {
  let composed: String = text.nfkc().collect();
  composed
    .replace("\r\n", "\n")
    .replace(['\r', '\u{00A0}'], " ")
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Compatibility-fold text while keeping list symbols intact.
///
/// `normalize` would turn `①` into `1` and `ㄱ` into a conjoining jamo, which
/// erases the symbol family the extractors need. This applies NFKC per
/// character except to symbols of a known alphabet, so `ＡＢＣ１２` and `－`
/// fold to ASCII while `①` and `ㄱ` survive. Conjoining choseong are mapped
/// to their compatibility jamo.
pub fn fold_preserving_symbols(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
    if let Some(jamo) = SymbolAlphabet::compatibility_jamo(ch) {
      out.push(jamo);
    } else if SymbolAlphabet::is_list_symbol(ch) || is_hangul_syllable(ch) {
      out.push(ch);
    } else {
      out.extend(std::iter::once(ch).nfkc());
    }
  }
  out
}

/// Hangul syllable block (가..힣)
pub fn is_hangul_syllable(ch: char) -> bool {
  ('\u{AC00}'..='\u{D7A3}').contains(&ch)
}

/// Remove every whitespace character
pub fn strip_whitespace(text: &str) -> String {
  text.chars().filter(|c| !c.is_whitespace()).collect()
}
