//! Token and label extraction.
//!
//! Two scanners live here:
//! - `find_labeled_segments` finds list markers that label a value
//!   (`가: 3`, `(1) x`, `① AVG`, `ㄱ - 값`). A marker only counts when it
//!   sits at a boundary and is followed by a separator, so `가` inside an
//!   ordinary word never matches.
//! - `extract_sequence_tokens` / `extract_symbol_set` read plain symbol
//!   lists (`ㄴ-ㄷ-ㄱ`, `①②③`, `1, 2, 3`) with no label separator at all.

use super::alphabet::{Symbol, SymbolAlphabet};
use super::normalize::{fold_preserving_symbols, is_hangul_syllable, strip_whitespace};

// ============================================================================
// Labeled segments
// ============================================================================

/// One label found in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSegment {
  /// Normalized label token: `(가)`/`가.` → `가`, `(1)`/`1)`/`1.` → `1`
  pub label: String,
  pub alphabet: SymbolAlphabet,
  /// Byte offset of the label in the scanned text
  pub start: usize,
  /// Byte length of label plus its separator
  pub len: usize,
}

impl LabeledSegment {
  pub fn end(&self) -> usize {
    self.start + self.len
  }

  /// Family-independent position (`가`, `①`, `ㄱ`, `1)` are all 1)
  pub fn position(&self) -> Option<u32> {
    match self.alphabet {
      SymbolAlphabet::Numeric => self.label.parse().ok(),
      alphabet => {
        let mut chars = self.label.chars();
        match (chars.next(), chars.next()) {
          (Some(ch), None) => alphabet.position(ch),
          _ => None,
        }
      }
    }
  }
}

/// A labelled value cut out of a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledValue {
  pub label: String,
  pub position: Option<u32>,
  /// Raw value text, trimmed of surrounding whitespace and trailing separators
  pub value: String,
}

fn is_boundary(ch: char) -> bool {
  ch.is_whitespace() || matches!(ch, ',' | '/' | '|')
}

fn is_label_separator(ch: char) -> bool {
  matches!(ch, ':' | '：' | '-')
}

fn is_list_separator(ch: char) -> bool {
  matches!(ch, ',' | '/' | '|')
}

/// Candidate label tokens starting at `i`, in the order they are tried.
/// Returns (normalized label, family, index one past the token).
fn label_candidates(chars: &[char], i: usize) -> Vec<(String, SymbolAlphabet, usize)> {
  let mut out = Vec::new();
  let at = |k: usize| chars.get(k).copied();

  // (가)
  if at(i) == Some('(') {
    if let (Some(h), Some(')')) = (at(i + 1), at(i + 2)) {
      if is_hangul_syllable(h) {
        out.push((h.to_string(), SymbolAlphabet::KoreanOrdinal, i + 3));
      }
    }
  }
  // 가.
  if let (Some(h), Some('.')) = (at(i), at(i + 1)) {
    if is_hangul_syllable(h) {
      out.push((h.to_string(), SymbolAlphabet::KoreanOrdinal, i + 2));
    }
  }
  // (1)
  if at(i) == Some('(') {
    let digits_end = scan_digits(chars, i + 1);
    if digits_end > i + 1 && at(digits_end) == Some(')') {
      out.push((digits_string(chars, i + 1, digits_end), SymbolAlphabet::Numeric, digits_end + 1));
    }
  }
  if let Some(ch) = at(i) {
    // 가, ①, ㄱ
    for alphabet in [SymbolAlphabet::KoreanOrdinal, SymbolAlphabet::Circled, SymbolAlphabet::KoreanJamo] {
      if alphabet.contains(ch) {
        out.push((ch.to_string(), alphabet, i + 1));
      }
    }
  }
  // 1) and 1.
  let digits_end = scan_digits(chars, i);
  if digits_end > i {
    for close in [')', '.'] {
      if at(digits_end) == Some(close) {
        out.push((digits_string(chars, i, digits_end), SymbolAlphabet::Numeric, digits_end + 1));
      }
    }
  }
  out
}

fn scan_digits(chars: &[char], from: usize) -> usize {
  let mut k = from;
  while k < chars.len() && chars[k].is_ascii_digit() {
    k += 1;
  }
  k
}

/// Digits with leading zeros dropped, so `01)` and `1)` are the same label
fn digits_string(chars: &[char], from: usize, to: usize) -> String {
  let raw: String = chars[from..to].iter().collect();
  let trimmed = raw.trim_start_matches('0');
  if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }
}

/// Separator after a label ending at `j`: `\s*[:：-]\s*` or whitespace
/// followed by a value character. Returns the end of the consumed separator.
fn separator_end(chars: &[char], j: usize) -> Option<usize> {
  let mut k = j;
  while k < chars.len() && chars[k].is_whitespace() {
    k += 1;
  }
  if k < chars.len() && is_label_separator(chars[k]) {
    k += 1;
    while k < chars.len() && chars[k].is_whitespace() {
      k += 1;
    }
    return Some(k);
  }
  // Whitespace only counts when a value follows (lookahead, not consumed)
  if k > j && k < chars.len() && !is_list_separator(chars[k]) {
    return Some(k);
  }
  None
}

/// Scan for labels of one family, left to right, without overlap
fn scan_family(chars: &[char], alphabet: SymbolAlphabet) -> Vec<(String, usize, usize)> {
  let mut found = Vec::new();
  let mut last_end = 0usize;
  let mut i = 0usize;

  while i < chars.len() {
    let at_boundary = if i == 0 {
      last_end == 0
    } else {
      i - 1 >= last_end && is_boundary(chars[i - 1])
    };

    if at_boundary {
      let hit = label_candidates(chars, i)
        .into_iter()
        .filter(|(_, family, _)| *family == alphabet)
        .find_map(|(label, _, token_end)| separator_end(chars, token_end).map(|end| (label, end)));
      if let Some((label, end)) = hit {
        found.push((label, i, end));
        last_end = end;
        i = end;
        continue;
      }
    }
    i += 1;
  }
  found
}

/// Find labelled segments in text order.
///
/// Only one label family is returned per call: the family whose first label
/// appears earliest (ties go to the family with more labels). This keeps a
/// `가 … 나 …` answer from being split again on a `ㄱ` inside one of its
/// values.
pub fn find_labeled_segments(text: &str) -> Vec<LabeledSegment> {
  let indexed: Vec<(usize, char)> = text.char_indices().collect();
  let chars: Vec<char> = indexed.iter().map(|(_, c)| *c).collect();
  let byte_at = |i: usize| indexed.get(i).map(|(b, _)| *b).unwrap_or(text.len());

  let best = [
    SymbolAlphabet::KoreanOrdinal,
    SymbolAlphabet::Circled,
    SymbolAlphabet::KoreanJamo,
    SymbolAlphabet::Numeric,
  ]
  .into_iter()
  .map(|alphabet| (alphabet, scan_family(&chars, alphabet)))
  .filter(|(_, found)| !found.is_empty())
  .min_by(|(_, a), (_, b)| a[0].1.cmp(&b[0].1).then(b.len().cmp(&a.len())));

  let Some((alphabet, found)) = best else {
    return Vec::new();
  };

  found
    .into_iter()
    .map(|(label, start, end)| LabeledSegment {
      label,
      alphabet,
      start: byte_at(start),
      len: byte_at(end) - byte_at(start),
    })
    .collect()
}

/// Trim a value cut between two labels: surrounding whitespace, a stray
/// leading list separator, and trailing `,` `/` `|` left by `가: x / 나: y`.
fn clean_value(raw: &str) -> String {
  let trimmed = raw.trim();
  let trimmed = trimmed
    .strip_prefix(is_list_separator)
    .map(str::trim_start)
    .unwrap_or(trimmed);
  trimmed
    .trim_end_matches(|c: char| c.is_whitespace() || is_list_separator(c))
    .to_string()
}

/// Cut a text into labelled values.
///
/// Returns `None` unless at least two non-empty labelled values are found.
pub fn labeled_values(text: &str) -> Option<Vec<LabeledValue>> {
  let folded = fold_preserving_symbols(text);
  let segments = find_labeled_segments(&folded);
  if segments.len() < 2 {
    return None;
  }

  let values: Vec<LabeledValue> = segments
    .iter()
    .enumerate()
    .filter_map(|(i, seg)| {
      let end = segments.get(i + 1).map(|next| next.start).unwrap_or(folded.len());
      let value = clean_value(&folded[seg.end()..end]);
      (!value.is_empty()).then(|| LabeledValue {
        label: seg.label.clone(),
        position: seg.position(),
        value,
      })
    })
    .collect();

  (values.len() >= 2).then_some(values)
}

/// Distinct labels in order of first appearance, plus whether any repeated
pub fn distinct_labels(text: &str) -> (Vec<String>, bool) {
  let folded = fold_preserving_symbols(text);
  let mut labels: Vec<String> = Vec::new();
  let mut duplicated = false;
  for seg in find_labeled_segments(&folded) {
    if labels.contains(&seg.label) {
      duplicated = true;
    } else {
      labels.push(seg.label);
    }
  }
  (labels, duplicated)
}

/// Normalize a label written by a dataset author or the UI:
/// `(가)`, `가.` → `가`; `(1)`, `1)`, `1.` → `1`. Anything else is trimmed.
pub fn normalize_label_token(label: &str) -> String {
  let raw = label.trim();
  let chars: Vec<char> = raw.chars().collect();

  match chars.as_slice() {
    ['(', h, ')'] if is_hangul_syllable(*h) => return h.to_string(),
    [h, '.'] if is_hangul_syllable(*h) => return h.to_string(),
    _ => {}
  }

  let inner = raw
    .strip_prefix('(')
    .and_then(|r| r.strip_suffix(')'))
    .or_else(|| raw.strip_suffix(')'))
    .or_else(|| raw.strip_suffix('.'))
    .unwrap_or(raw);
  if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
    return inner.to_string();
  }
  raw.to_string()
}

/// Remove one leading label (`(가) `, `1) `, `ㄱ. `, `① `, `가: `) and return
/// the rest. Bare ordinal letters and bare numbers are not labels here since
/// `가 …` and `1 …` start ordinary answers.
pub fn strip_leading_label(text: &str) -> Option<String> {
  let folded = fold_preserving_symbols(text);
  let chars: Vec<char> = folded.trim_start().chars().collect();
  let first = *chars.first()?;

  let (mut k, mut closer) = if first == '(' {
    let close = chars.iter().position(|&c| c == ')')?;
    let inner = &chars[1..close];
    let ok = match inner {
      [c] => is_hangul_syllable(*c) || SymbolAlphabet::KoreanJamo.contains(*c),
      _ => !inner.is_empty() && inner.iter().all(|c| c.is_ascii_digit()),
    };
    if !ok {
      return None;
    }
    (close + 1, Some(')'))
  } else if SymbolAlphabet::is_list_symbol(first) {
    (1, None)
  } else if first.is_ascii_digit() || SymbolAlphabet::KoreanOrdinal.contains(first) {
    let end = if first.is_ascii_digit() { scan_digits(&chars, 0) } else { 1 };
    match chars.get(end) {
      Some(&c) if matches!(c, '.' | ')' | ':') => (end + 1, Some(c)),
      _ => return None,
    }
  } else {
    return None;
  };

  if closer.is_none() {
    if let Some(&c) = chars.get(k).filter(|c| matches!(**c, '.' | ')' | ':')) {
      closer = Some(c);
      k += 1;
    }
  }

  let ws_start = k;
  while k < chars.len() && chars[k].is_whitespace() {
    k += 1;
  }
  // `1.5` is a number, not a label; `1)값` and `가:값` are labels
  let glued_ok = matches!(closer, Some(')') | Some(':'));
  if k == ws_start && !glued_ok {
    return None;
  }

  let rest: String = chars[k..].iter().collect();
  let rest = rest.trim();
  (!rest.is_empty()).then(|| rest.to_string())
}

// ============================================================================
// Known-label splitting
// ============================================================================

/// Find `label` at or after byte `from`, where it starts at a boundary and
/// is not glued to a following letter (`1` must not match inside `10)`).
fn find_label_at_boundary(text: &str, label: &str, from: usize) -> Option<usize> {
  let mut search = from;
  while search <= text.len() {
    let idx = search + text.get(search..)?.find(label)?;
    let before_ok = text[..idx]
      .chars()
      .next_back()
      .is_none_or(|c| is_boundary(c) || c == '(');
    let after_ok = text[idx + label.len()..]
      .chars()
      .next()
      .is_none_or(|c| !c.is_alphanumeric());
    if before_ok && after_ok {
      return Some(idx);
    }
    search = idx + label.chars().next().map(char::len_utf8).unwrap_or(1);
  }
  None
}

/// Split a text by a known ordered label list (`["가", "나"]`,
/// `["차수", "카디널리티"]`). Every label must be found in order and every
/// value must be non-empty.
pub fn split_by_known_labels(text: &str, labels: &[String]) -> Option<Vec<String>> {
  if labels.len() < 2 {
    return None;
  }
  let folded = fold_preserving_symbols(text);
  if folded.trim().is_empty() {
    return None;
  }

  let mut values = Vec::with_capacity(labels.len());
  let mut search_from = 0usize;

  for (i, label) in labels.iter().enumerate() {
    if label.is_empty() {
      return None;
    }
    let label_idx = find_label_at_boundary(&folded, label, search_from)?;

    let after_label = &folded[label_idx + label.len()..];
    let skipped = after_label.len()
      - after_label
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '：' | '-' | '.' | ')'))
        .len();
    let value_start = label_idx + label.len() + skipped;

    let value_end = match labels.get(i + 1) {
      Some(next) => {
        let next_idx = find_label_at_boundary(&folded, next, value_start)?;
        search_from = next_idx;
        next_idx
      }
      None => folded.len(),
    };

    // Drop the `(` of a `(나)` style next label
    let raw = folded[value_start..value_end].trim_end().trim_end_matches('(');
    values.push(clean_value(raw));
  }

  values.iter().all(|v| !v.is_empty()).then_some(values)
}

// ============================================================================
// Line markers
// ============================================================================

/// A list marker at the start of a line of question/example text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMarker {
  pub label: String,
  pub alphabet: SymbolAlphabet,
  /// Marker was followed by `.` or `)`
  pub punctuated: bool,
  /// Remaining text of the line
  pub rest: String,
}

/// Parse the leading marker of a line (`ㄱ. 내용`, `① 내용`, `(가) 내용`, `1) 내용`)
pub fn leading_marker(line: &str) -> Option<LineMarker> {
  let chars: Vec<char> = fold_preserving_symbols(line).trim_start().chars().collect();
  let first = *chars.first()?;

  let (label, alphabet, mut k, mut punctuated) = if first == '(' {
    let close = chars.iter().position(|&c| c == ')')?;
    let inner: String = chars[1..close].iter().collect();
    let label = normalize_label_token(&format!("({})", inner));
    let alphabet = if inner.chars().all(|c| c.is_ascii_digit()) && !inner.is_empty() {
      SymbolAlphabet::Numeric
    } else if inner.chars().count() == 1 && inner.chars().all(is_hangul_syllable) {
      SymbolAlphabet::KoreanOrdinal
    } else {
      return None;
    };
    (label, alphabet, close + 1, true)
  } else if first.is_ascii_digit() {
    let end = scan_digits(&chars, 0);
    (digits_string(&chars, 0, end), SymbolAlphabet::Numeric, end, false)
  } else if let Some(alphabet) = SymbolAlphabet::of_glyph(first) {
    (first.to_string(), alphabet, 1, false)
  } else if is_hangul_syllable(first) {
    (first.to_string(), SymbolAlphabet::KoreanOrdinal, 1, false)
  } else {
    return None;
  };

  while k < chars.len() && chars[k].is_whitespace() {
    k += 1;
  }
  if !punctuated && k < chars.len() && matches!(chars[k], '.' | ')') {
    punctuated = true;
    k += 1;
  }

  // Bare syllables and numbers are ordinary text unless punctuated
  let bare_glyph = matches!(alphabet, SymbolAlphabet::KoreanJamo | SymbolAlphabet::Circled);
  if !punctuated && !bare_glyph {
    return None;
  }

  let rest: String = chars[k..].iter().collect();
  Some(LineMarker {
    label,
    alphabet,
    punctuated,
    rest: rest.trim().to_string(),
  })
}

/// Markers of every line in a block of text
pub fn line_markers(text: &str) -> Vec<LineMarker> {
  text.lines().filter_map(leading_marker).collect()
}

// ============================================================================
// Symbol runs
// ============================================================================

/// A run of list symbols from one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRun {
  pub alphabet: SymbolAlphabet,
  pub symbols: Vec<Symbol>,
}

impl SymbolRun {
  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }

  /// Order-sensitive comparison key
  pub fn ordered_key(&self) -> Vec<(SymbolAlphabet, u32)> {
    self.symbols.iter().map(Symbol::key).collect()
  }

  /// Order-insensitive key: canonical order, duplicates removed
  pub fn set_key(&self) -> Vec<(SymbolAlphabet, u32)> {
    let mut keys = self.ordered_key();
    keys.sort();
    keys.dedup();
    keys
  }

  /// Render in the sequence draft format (`ㄱ-ㄴ-ㄷ`)
  pub fn render(&self) -> String {
    self.symbols.iter().map(Symbol::render).collect::<Vec<_>>().join("-")
  }
}

fn is_run_separator(ch: char) -> bool {
  matches!(ch, '-' | ',' | '/' | '→' | '⇒' | '➔' | '➜' | '>')
}

/// Compact a candidate run: fold widths, unify arrows, drop whitespace
fn compact_run_text(text: &str) -> String {
  let folded = fold_preserving_symbols(text).replace("->", "→").replace("=>", "→");
  strip_whitespace(&folded)
}

fn glyph_run(compact: &str, alphabet: SymbolAlphabet) -> Option<SymbolRun> {
  let mut symbols = Vec::new();
  for ch in compact.chars() {
    if alphabet.contains(ch) {
      symbols.push(Symbol::glyph(alphabet, ch));
    } else if !is_run_separator(ch) {
      return None;
    }
  }
  Some(SymbolRun { alphabet, symbols })
}

fn numeric_run(compact: &str) -> Option<SymbolRun> {
  let mut symbols = Vec::new();
  for piece in compact.split(is_run_separator) {
    if piece.is_empty() || !piece.chars().all(|c| c.is_ascii_digit()) {
      return None;
    }
    symbols.push(Symbol::number(piece.parse().ok()?));
  }
  Some(SymbolRun {
    alphabet: SymbolAlphabet::Numeric,
    symbols,
  })
}

fn scan_symbol_run(text: &str, min_len: usize) -> Option<SymbolRun> {
  let compact = compact_run_text(text);
  if compact.is_empty() {
    return None;
  }

  let run = if compact.chars().any(|c| SymbolAlphabet::KoreanJamo.contains(c)) {
    glyph_run(&compact, SymbolAlphabet::KoreanJamo)
  } else if compact.chars().any(|c| SymbolAlphabet::Circled.contains(c)) {
    glyph_run(&compact, SymbolAlphabet::Circled)
  } else {
    numeric_run(&compact)
  }?;

  (run.len() >= min_len).then_some(run)
}

/// Ordered symbol list of at least two symbols from one family, separated
/// by `-`, `,`, `/`, an arrow, or nothing at all for glyph families.
pub fn extract_sequence_tokens(text: &str) -> Option<SymbolRun> {
  scan_symbol_run(text, 2)
}

/// Like `extract_sequence_tokens` but a single symbol is enough
pub fn extract_symbol_set(text: &str) -> Option<SymbolRun> {
  scan_symbol_run(text, 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn labels_of(text: &str) -> Vec<String> {
    find_labeled_segments(text).into_iter().map(|s| s.label).collect()
  }

  #[test]
  fn test_korean_ordinal_labels() {
    assert_eq!(labels_of("가: AVG, 나: COUNT"), vec!["가", "나"]);
    assert_eq!(labels_of("(가) 3 / (나) 4"), vec!["가", "나"]);
    assert_eq!(labels_of("가. 3 나. 4"), vec!["가", "나"]);
  }

  #[test]
  fn test_circled_and_jamo_labels() {
    assert_eq!(labels_of("① AVG ② COUNT"), vec!["①", "②"]);
    assert_eq!(labels_of("ㄱ: 값1, ㄴ: 값2"), vec!["ㄱ", "ㄴ"]);
  }

  #[test]
  fn test_numbered_labels() {
    assert_eq!(labels_of("1) SELECT 2) FROM"), vec!["1", "2"]);
    assert_eq!(labels_of("(1) a (2) b"), vec!["1", "2"]);
    assert_eq!(labels_of("1. a 2. b"), vec!["1", "2"]);
  }

  #[test]
  fn test_label_requires_separator() {
    // 가 inside a word is not a label
    assert!(find_labeled_segments("가나다라").is_empty());
    assert!(find_labeled_segments("나는 학생이다").is_empty());
    // Decimal number is not a numbered label
    assert!(find_labeled_segments("3.14").is_empty());
    // Plain bare numbers are never labels
    assert!(find_labeled_segments("차수 3, 카디널리티 4").is_empty());
  }

  #[test]
  fn test_label_requires_boundary() {
    // ① glued to a preceding word is not a label
    assert!(find_labeled_segments("값① x").is_empty());
  }

  #[test]
  fn test_families_not_mixed() {
    // First family wins; the jamo inside a value is not a second label
    let segs = find_labeled_segments("가: ㄱ 값 / 나: 다른 값");
    assert!(segs.iter().all(|s| s.alphabet == SymbolAlphabet::KoreanOrdinal));
    assert_eq!(segs.len(), 2);
  }

  #[test]
  fn test_sequence_is_not_multiple_labels() {
    assert!(find_labeled_segments("ㄴ-ㄷ-ㄱ").len() < 2);
    assert!(find_labeled_segments("ㄴ, ㄷ, ㄱ").len() < 2);
  }

  #[test]
  fn test_segment_offsets() {
    let text = "가: AVG, 나: COUNT";
    let segs = find_labeled_segments(text);
    assert_eq!(segs[0].start, 0);
    assert_eq!(&text[segs[0].start..segs[0].end()], "가: ");
    assert_eq!(&text[segs[1].start..segs[1].end()], "나: ");
  }

  #[test]
  fn test_segment_positions() {
    let segs = find_labeled_segments("다: x, 라: y");
    assert_eq!(segs[0].position(), Some(3));
    assert_eq!(segs[1].position(), Some(4));
    let segs = find_labeled_segments("10) x 11) y");
    assert_eq!(segs[0].position(), Some(10));
  }

  #[test]
  fn test_labeled_values() {
    let values = labeled_values("가: AVG / 나: COUNT").unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].value, "AVG");
    assert_eq!(values[1].value, "COUNT");
    assert_eq!(values[0].position, Some(1));
  }

  #[test]
  fn test_labeled_values_needs_two() {
    assert!(labeled_values("가: AVG").is_none());
    assert!(labeled_values("HTTP").is_none());
    assert!(labeled_values("").is_none());
  }

  #[test]
  fn test_labeled_values_full_width_colon() {
    let values = labeled_values("가： 3，나： 4").unwrap();
    assert_eq!(values[0].value, "3");
    assert_eq!(values[1].value, "4");
  }

  #[test]
  fn test_distinct_labels() {
    assert_eq!(distinct_labels("① a ② b ① c"), (vec!["①".to_string(), "②".to_string()], true));
    assert_eq!(distinct_labels("가: 1, 나: 2"), (vec!["가".to_string(), "나".to_string()], false));
  }

  #[test]
  fn test_normalize_label_token() {
    assert_eq!(normalize_label_token("(가)"), "가");
    assert_eq!(normalize_label_token("가."), "가");
    assert_eq!(normalize_label_token("가"), "가");
    assert_eq!(normalize_label_token("(1)"), "1");
    assert_eq!(normalize_label_token("1)"), "1");
    assert_eq!(normalize_label_token("1."), "1");
    assert_eq!(normalize_label_token(" ① "), "①");
    assert_eq!(normalize_label_token("차수"), "차수");
  }

  #[test]
  fn test_strip_leading_label() {
    assert_eq!(strip_leading_label("(가) 정규화"), Some("정규화".to_string()));
    assert_eq!(strip_leading_label("1) 정규화"), Some("정규화".to_string()));
    assert_eq!(strip_leading_label("ㄱ. 원자성"), Some("원자성".to_string()));
    assert_eq!(strip_leading_label("① AVG"), Some("AVG".to_string()));
    assert_eq!(strip_leading_label("가: 3"), Some("3".to_string()));
  }

  #[test]
  fn test_strip_leading_label_leaves_plain_answers() {
    assert_eq!(strip_leading_label("가상 메모리"), None);
    assert_eq!(strip_leading_label("나 홀로"), None);
    assert_eq!(strip_leading_label("1.5"), None);
    assert_eq!(strip_leading_label("3 NF"), None);
    assert_eq!(strip_leading_label("HTTP"), None);
    assert_eq!(strip_leading_label("(가)"), None);
    assert_eq!(strip_leading_label(""), None);
  }

  #[test]
  fn test_split_by_known_labels_named() {
    let labels = vec!["차수".to_string(), "카디널리티".to_string()];
    assert_eq!(
      split_by_known_labels("차수: 3 / 카디널리티: 4", &labels),
      Some(vec!["3".to_string(), "4".to_string()])
    );
    assert_eq!(
      split_by_known_labels("차수 3, 카디널리티 4", &labels),
      Some(vec!["3".to_string(), "4".to_string()])
    );
  }

  #[test]
  fn test_split_by_known_labels_parenthesized() {
    let labels = vec!["가".to_string(), "나".to_string()];
    assert_eq!(
      split_by_known_labels("(가) 학생이 (나) 교수를", &labels),
      Some(vec!["학생이".to_string(), "교수를".to_string()])
    );
  }

  #[test]
  fn test_split_by_known_labels_missing_value() {
    let labels = vec!["가".to_string(), "나".to_string()];
    assert_eq!(split_by_known_labels("가: AVG / 나:", &labels), None);
    assert_eq!(split_by_known_labels("AVG COUNT", &labels), None);
  }

  #[test]
  fn test_split_by_known_labels_not_inside_number() {
    let labels = vec!["1".to_string(), "2".to_string()];
    assert_eq!(
      split_by_known_labels("1) 10 2) 20", &labels),
      Some(vec!["10".to_string(), "20".to_string()])
    );
  }

  #[test]
  fn test_leading_marker() {
    let m = leading_marker("ㄱ. 원자성").unwrap();
    assert_eq!(m.label, "ㄱ");
    assert_eq!(m.alphabet, SymbolAlphabet::KoreanJamo);
    assert!(m.punctuated);
    assert_eq!(m.rest, "원자성");

    let m = leading_marker("  (가) 빈칸").unwrap();
    assert_eq!(m.label, "가");
    assert_eq!(m.rest, "빈칸");

    let m = leading_marker("① 일관성").unwrap();
    assert!(!m.punctuated);

    assert!(leading_marker("가 나 다").is_none());
    assert!(leading_marker("2024년 시험").is_none());
    assert!(leading_marker("").is_none());
  }

  #[test]
  fn test_line_markers() {
    let markers = line_markers("<보기>\nㄱ. 원자성\nㄴ. 일관성\nㄷ. 격리성");
    let labels: Vec<&str> = markers.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["ㄱ", "ㄴ", "ㄷ"]);
  }

  #[test]
  fn test_sequence_tokens_jamo() {
    let run = extract_sequence_tokens("ㄴ-ㄷ-ㄱ").unwrap();
    assert_eq!(run.alphabet, SymbolAlphabet::KoreanJamo);
    assert_eq!(run.render(), "ㄴ-ㄷ-ㄱ");
    assert_eq!(extract_sequence_tokens("ㄴ, ㄷ, ㄱ").unwrap().render(), "ㄴ-ㄷ-ㄱ");
    assert_eq!(extract_sequence_tokens("ㄴ → ㄷ → ㄱ").unwrap().render(), "ㄴ-ㄷ-ㄱ");
    assert_eq!(extract_sequence_tokens("ㄴ->ㄷ->ㄱ").unwrap().render(), "ㄴ-ㄷ-ㄱ");
    assert_eq!(extract_sequence_tokens("ㄴㄷㄱ").unwrap().render(), "ㄴ-ㄷ-ㄱ");
  }

  #[test]
  fn test_sequence_tokens_circled_and_numeric() {
    assert_eq!(extract_sequence_tokens("①-②-③").unwrap().alphabet, SymbolAlphabet::Circled);
    let run = extract_sequence_tokens("1, 2, 3").unwrap();
    assert_eq!(run.alphabet, SymbolAlphabet::Numeric);
    assert_eq!(run.render(), "1-2-3");
    assert_eq!(extract_sequence_tokens("３－１－２").unwrap().render(), "3-1-2");
  }

  #[test]
  fn test_sequence_tokens_rejects_words() {
    assert!(extract_sequence_tokens("HTTP").is_none());
    assert!(extract_sequence_tokens("HTTP/2").is_none());
    assert!(extract_sequence_tokens("ㄱ 원자성").is_none());
    assert!(extract_sequence_tokens("3.14").is_none());
    assert!(extract_sequence_tokens("ㄱ").is_none());
    assert!(extract_sequence_tokens("").is_none());
  }

  #[test]
  fn test_symbol_set_single_symbol() {
    assert_eq!(extract_symbol_set("ㄱ").unwrap().len(), 1);
    assert_eq!(extract_symbol_set("3").unwrap().len(), 1);
  }

  #[test]
  fn test_set_key_ignores_order_and_duplicates() {
    let a = extract_symbol_set("ㄴㄱ").unwrap();
    let b = extract_symbol_set("ㄱ, ㄴ, ㄱ").unwrap();
    assert_eq!(a.set_key(), b.set_key());
    assert_ne!(a.ordered_key(), b.ordered_key());
  }

  #[test]
  fn test_circled_run_matches_numeric_run() {
    let circled = extract_sequence_tokens("①-②-③").unwrap();
    let numeric = extract_sequence_tokens("1-2-3").unwrap();
    assert_eq!(circled.ordered_key(), numeric.ordered_key());
  }
}
