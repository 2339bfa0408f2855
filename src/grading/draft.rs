//! Draft codec: the multi-slot editing state the UI keeps, and the single
//! answer string it submits.
//!
//! Wire format:
//! - sequence slots are trimmed, empties dropped, joined with `-`
//! - multi-blank slots become `"{label}: {value}"`, empties dropped, joined with `" / "`
//!
//! Changing either format breaks every stored draft.

use unicode_normalization::UnicodeNormalization;

use super::alphabet::SymbolAlphabet;
use super::labels::{find_labeled_segments, normalize_label_token};
use super::normalize::fold_preserving_symbols;
use super::shape::ShapeMetadata;

/// Editing state of a multi-slot answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
  Sequence(Vec<String>),
  MultiBlank { labels: Vec<String>, values: Vec<String> },
}

impl Draft {
  /// Empty draft sized for a question; `None` for single-slot shapes
  pub fn empty(meta: &ShapeMetadata) -> Option<Self> {
    Self::from_slots(meta, Vec::new())
  }

  /// Draft from slot values, padded to the question's slot count
  pub fn from_slots(meta: &ShapeMetadata, mut slots: Vec<String>) -> Option<Self> {
    if !meta.shape.is_multi_slot() {
      return None;
    }
    if meta.shape.is_symbol_run() {
      if slots.len() < meta.slot_count {
        slots.resize(meta.slot_count, String::new());
      }
      return Some(Draft::Sequence(slots));
    }
    slots.resize(meta.labels.len(), String::new());
    Some(Draft::MultiBlank {
      labels: meta.labels.clone(),
      values: slots,
    })
  }

  /// Restore a draft from a submitted answer string
  pub fn decode(meta: &ShapeMetadata, value: &str) -> Option<Self> {
    if !meta.shape.is_multi_slot() {
      return None;
    }
    if meta.shape.is_symbol_run() {
      return Some(Draft::Sequence(split_sequence(value, meta.slot_count)));
    }
    Some(Draft::MultiBlank {
      labels: meta.labels.clone(),
      values: split_multi_blank(value, &meta.labels),
    })
  }

  pub fn encode(&self) -> String {
    match self {
      Draft::Sequence(slots) => join_sequence(slots),
      Draft::MultiBlank { labels, values } => join_multi_blank(labels, values),
    }
  }

  /// Slot values in display order
  pub fn slots(&self) -> &[String] {
    match self {
      Draft::Sequence(slots) => slots,
      Draft::MultiBlank { values, .. } => values,
    }
  }
}

// ============================================================================
// Sequence slots
// ============================================================================

pub fn join_sequence(slots: &[String]) -> String {
  slots
    .iter()
    .map(|s| s.trim())
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join("-")
}

/// Split on `->`, `→`, `-`, `,` or `/`, padded with empty slots up to `count`
pub fn split_sequence(value: &str, count: usize) -> Vec<String> {
  let unified = value.replace("->", "→");
  let mut parts: Vec<String> = if unified.trim().is_empty() {
    Vec::new()
  } else {
    unified
      .split(['→', '-', ',', '/'])
      .map(|p| p.trim().to_string())
      .collect()
  };
  if parts.len() < count {
    parts.resize(count, String::new());
  }
  parts
}

// ============================================================================
// Multi-blank slots
// ============================================================================

pub fn join_multi_blank(labels: &[String], values: &[String]) -> String {
  labels
    .iter()
    .zip(values)
    .filter_map(|(label, value)| {
      let value = value.trim();
      (!value.is_empty()).then(|| format!("{}: {}", label, value))
    })
    .collect::<Vec<_>>()
    .join(" / ")
}

/// Split an answer into one value per label.
///
/// Labelled input is mapped by label, or by position when it uses another
/// label family with the same number of labels. Unlabelled input is split
/// positionally on `/`, `,` or `|`.
pub fn split_multi_blank(value: &str, labels: &[String]) -> Vec<String> {
  let mut values = multi_blank_parts(value, labels).map(|(values, _)| values).unwrap_or_else(|| {
    fold_preserving_symbols(value)
      .split(['/', ',', '|'])
      .map(|p| p.trim().to_string())
      .filter(|p| !p.is_empty())
      .collect()
  });
  values.resize(labels.len(), String::new());
  values
}

/// Labelled values for exactly these labels: one labelled, non-empty field
/// per label and nothing else. Unlabelled input gives `None`.
pub fn labeled_multi_blank(value: &str, labels: &[String]) -> Option<Vec<String>> {
  let (values, segments) = multi_blank_parts(value, labels)?;
  let exact = segments == labels.len() && values.len() == labels.len() && values.iter().all(|v| !v.is_empty());
  exact.then_some(values)
}

/// Values of the labelled segments, by label when every label is present,
/// by position otherwise, with the number of segments found. `None` when
/// the input carries no labels.
fn multi_blank_parts(value: &str, labels: &[String]) -> Option<(Vec<String>, usize)> {
  let folded = fold_preserving_symbols(value);
  let segments = find_labeled_segments(&folded);
  if segments.is_empty() {
    return None;
  }

  let cut = |i: usize| {
    let end = segments.get(i + 1).map(|next| next.start).unwrap_or(folded.len());
    folded[segments[i].end()..end]
      .trim()
      .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '|'))
      .to_string()
  };

  let expected: Vec<String> = labels.iter().map(|l| normalize_label_token(l)).collect();
  let by_label: Option<Vec<String>> = expected
    .iter()
    .map(|label| segments.iter().position(|s| &s.label == label).map(cut))
    .collect();
  let values = by_label.unwrap_or_else(|| (0..segments.len()).map(cut).collect());
  Some((values, segments.len()))
}

// ============================================================================
// Slot sanitising
// ============================================================================

/// Clean one typed sequence slot for the question's symbol kind:
/// - jamo: first consonant, conjoining choseong mapped to compatibility jamo
/// - circled: first circled digit, or `1`–`20` converted to one
/// - ordinal letters: first ordinal letter
/// - numeric: digits only, at most two
/// - generic: compatibility-folded, at most four characters
pub fn sanitize_sequence_token(raw: &str, kind: Option<SymbolAlphabet>) -> String {
  let folded = fold_preserving_symbols(raw.trim());
  match kind {
    Some(alphabet @ (SymbolAlphabet::KoreanJamo | SymbolAlphabet::KoreanOrdinal)) => folded
      .chars()
      .find(|&c| alphabet.contains(c))
      .map(String::from)
      .unwrap_or_default(),
    Some(SymbolAlphabet::Circled) => {
      if let Some(c) = folded.chars().find(|&c| SymbolAlphabet::Circled.contains(c)) {
        return c.to_string();
      }
      let digits: String = folded.chars().filter(char::is_ascii_digit).collect();
      digits
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=20).contains(n))
        .and_then(|n| SymbolAlphabet::Circled.glyph(n))
        .unwrap_or_default()
    }
    Some(SymbolAlphabet::Numeric) => folded.chars().filter(char::is_ascii_digit).take(2).collect(),
    None => raw.trim().nfkc().take(4).collect(),
  }
}
