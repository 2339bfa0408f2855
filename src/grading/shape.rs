//! Input-shape classification.
//!
//! Decides which of the five answer shapes a question uses and how the UI
//! should split it into slots. Declared dataset metadata always wins; the
//! reference answer and question wording are only read when nothing is
//! declared.

use serde::{Deserialize, Serialize};

use super::alphabet::SymbolAlphabet;
use super::labels::{
  distinct_labels, extract_sequence_tokens, extract_symbol_set, find_labeled_segments, line_markers,
  normalize_label_token, strip_leading_label,
};
use super::normalize::{fold_preserving_symbols, strip_whitespace};
use crate::config::{DEFAULT_SEQUENCE_SLOTS, FREEFORM_MIN_CHARS, MAX_NAMED_LABEL_CHARS, MAX_SLOTS, clamp_slots};
use crate::domain::{InputShape, Question, ReferenceAnswer};

/// Derived slot layout for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeMetadata {
  pub shape: InputShape,
  pub slot_count: usize,
  /// Symbol family of sequence slots; `None` means generic text tokens
  pub symbol_kind: Option<SymbolAlphabet>,
  /// Slot labels for multi-blank answers, in display order
  pub labels: Vec<String>,
}

impl ShapeMetadata {
  fn single_slot(shape: InputShape) -> Self {
    Self {
      shape,
      slot_count: 1,
      symbol_kind: None,
      labels: Vec::new(),
    }
  }

  fn multi_blank(mut labels: Vec<String>) -> Self {
    labels.truncate(MAX_SLOTS);
    Self {
      shape: InputShape::MultiBlank,
      slot_count: labels.len(),
      symbol_kind: label_family(&labels),
      labels,
    }
  }
}

/// Classification switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
  /// Allow named-pair inference (`"차수 3, 카디널리티 4"`) for undeclared
  /// questions. Kept for datasets that predate explicit `input_type`.
  pub legacy_inference: bool,
}

impl Default for ClassifyOptions {
  fn default() -> Self {
    Self { legacy_inference: true }
  }
}

/// Classify with default options
pub fn classify(question: &Question, reference: &ReferenceAnswer) -> ShapeMetadata {
  classify_with(question, reference, &ClassifyOptions::default())
}

/// Classify a question. Pure: identical inputs give identical metadata.
pub fn classify_with(question: &Question, reference: &ReferenceAnswer, options: &ClassifyOptions) -> ShapeMetadata {
  let answer = reference.text.trim();

  if let Some(shape) = question.declared_shape {
    return declared_metadata(shape, question, answer);
  }

  // Labelled answer: 가: AVG, 나: COUNT
  let run = extract_sequence_tokens(answer);
  if run.is_none() {
    let (labels, duplicated) = distinct_labels(answer);
    if labels.len() >= 2 && !duplicated {
      return ShapeMetadata::multi_blank(labels);
    }
  }

  if let Some(run) = run {
    if asks_select_all(&question.question_text) && !asks_order(&question.question_text) {
      return sequence_metadata(InputShape::UnorderedSymbolSet, question, answer);
    }
    return ShapeMetadata {
      shape: InputShape::OrderedSequence,
      slot_count: clamp_slots(run.len()),
      symbol_kind: Some(run.alphabet),
      labels: Vec::new(),
    };
  }

  if options.legacy_inference {
    if let Some(labels) = infer_named_pair_labels(answer) {
      tracing::debug!("Classified by named-pair inference: {:?}", labels);
      return ShapeMetadata::multi_blank(labels);
    }
  }

  if looks_like_paragraph(answer) {
    ShapeMetadata::single_slot(InputShape::Freeform)
  } else {
    ShapeMetadata::single_slot(InputShape::Single)
  }
}

fn declared_metadata(shape: InputShape, question: &Question, answer: &str) -> ShapeMetadata {
  match shape {
    InputShape::Single | InputShape::Freeform => ShapeMetadata::single_slot(shape),
    InputShape::OrderedSequence | InputShape::UnorderedSymbolSet => sequence_metadata(shape, question, answer),
    InputShape::MultiBlank => ShapeMetadata::multi_blank(multi_blank_labels(question, answer)),
  }
}

// ============================================================================
// Sequence shapes
// ============================================================================

/// Symbol-kind and slot count for sequence shapes.
///
/// The kind comes from the `<보기>` markers when there are any, else from the
/// answer. For an unordered set the slot count must not give away how many
/// symbols the answer has, so it follows the choices rather than the answer.
fn sequence_metadata(shape: InputShape, question: &Question, answer: &str) -> ShapeMetadata {
  let markers: Vec<_> = line_markers(&question.example_text)
    .into_iter()
    .filter(|m| m.punctuated && m.alphabet != SymbolAlphabet::KoreanOrdinal)
    .collect();
  let run = extract_symbol_set(answer);

  let symbol_kind = markers
    .first()
    .map(|m| m.alphabet)
    .or_else(|| run.as_ref().map(|r| r.alphabet));

  let declared = normalized_labels(&question.declared_labels);
  let answer_len = run.as_ref().map(|r| r.len()).unwrap_or(0);
  let count = if !declared.is_empty() {
    declared.len()
  } else if !markers.is_empty() {
    markers.len().max(answer_len)
  } else if shape == InputShape::OrderedSequence && answer_len > 0 {
    answer_len
  } else {
    DEFAULT_SEQUENCE_SLOTS.max(answer_len)
  };

  ShapeMetadata {
    shape,
    slot_count: clamp_slots(count),
    symbol_kind,
    labels: Vec::new(),
  }
}

const SELECT_ALL_PHRASES: [&str; 6] = ["모두고르", "모두골라", "옳은것모두", "옳은것을모두", "해당하는것모두", "해당하는것을모두"];

const ORDER_PHRASES: [&str; 3] = ["순서", "나열", "차례"];

/// "Choose all that apply" phrasing
fn asks_select_all(question_text: &str) -> bool {
  let compact = strip_whitespace(question_text);
  SELECT_ALL_PHRASES.iter().any(|p| compact.contains(p))
}

/// Phrasing that makes the symbol order part of the answer
fn asks_order(question_text: &str) -> bool {
  ORDER_PHRASES.iter().any(|p| question_text.contains(p))
}

// ============================================================================
// Multi-blank labels
// ============================================================================

fn normalized_labels(labels: &[String]) -> Vec<String> {
  let mut out: Vec<String> = Vec::new();
  for label in labels {
    let label = normalize_label_token(label);
    if !label.is_empty() && !out.contains(&label) {
      out.push(label);
    }
  }
  out
}

/// Slot labels for a multi-blank question, first source that yields two or more:
/// declared labels, labels in the answer, named pairs in the answer, line
/// markers in the question and examples. Falls back to `①`, `②`.
fn multi_blank_labels(question: &Question, answer: &str) -> Vec<String> {
  let declared = normalized_labels(&question.declared_labels);
  if declared.len() >= 2 {
    return declared;
  }

  let (from_answer, _) = distinct_labels(answer);
  if from_answer.len() >= 2 {
    return from_answer;
  }

  if let Some(named) = infer_named_pair_labels(answer) {
    return named;
  }

  let mut from_markers: Vec<String> = Vec::new();
  for text in [&question.question_text, &question.example_text] {
    for marker in line_markers(text) {
      let is_blank_marker = marker.punctuated
        || matches!(marker.alphabet, SymbolAlphabet::KoreanJamo | SymbolAlphabet::Circled);
      if is_blank_marker && !from_markers.contains(&marker.label) {
        from_markers.push(marker.label);
      }
    }
  }
  if from_markers.len() >= 2 {
    return from_markers;
  }

  vec!["①".to_string(), "②".to_string()]
}

/// Family shared by every label, if they are all single list symbols
fn label_family(labels: &[String]) -> Option<SymbolAlphabet> {
  let family_of = |label: &String| {
    if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
      return Some(SymbolAlphabet::Numeric);
    }
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
      (Some(ch), None) => SymbolAlphabet::of_glyph(ch),
      _ => None,
    }
  };
  let first = family_of(labels.first()?)?;
  labels.iter().all(|l| family_of(l) == Some(first)).then_some(first)
}

/// Infer implicit labels from an answer like `"차수 3, 카디널리티 4"`.
///
/// Every comma/slash-separated chunk must read `name: value` or
/// `name <number>`; the names become the labels. Returns `None` unless at
/// least two distinct names are found.
pub fn infer_named_pair_labels(answer: &str) -> Option<Vec<String>> {
  let stripped = strip_leading_label(answer);
  let body = fold_preserving_symbols(stripped.as_deref().unwrap_or(answer));
  if find_labeled_segments(&body).len() >= 2 {
    return None;
  }

  let parts: Vec<&str> = body
    .split([',', '/', '|'])
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();
  if parts.len() < 2 {
    return None;
  }

  let mut labels: Vec<String> = Vec::new();
  for part in parts {
    let label = named_pair_label(part)?;
    if !labels.contains(&label) {
      labels.push(label);
    }
  }
  (labels.len() >= 2).then_some(labels)
}

/// Name of one `name: value` / `name 3` chunk
fn named_pair_label(part: &str) -> Option<String> {
  let name_end = part.find(|c: char| c.is_ascii_digit() || c == ':')?;
  let name = &part[..name_end];
  let at_split = &part[name_end..];

  // `name 3` needs whitespace before the digit; `name: x` needs the colon
  let is_pair = at_split.starts_with(':') || (at_split.starts_with(|c: char| c.is_ascii_digit()) && name.ends_with(char::is_whitespace));
  if !is_pair {
    return None;
  }

  let name = name.trim();
  // 차수(Degree) → 차수
  let name = match name.find('(') {
    Some(idx) if name.ends_with(')') => name[..idx].trim_end(),
    _ => name,
  };
  if name.is_empty() || name.chars().count() > MAX_NAMED_LABEL_CHARS {
    return None;
  }
  Some(name.to_string())
}

// ============================================================================
// Paragraph answers
// ============================================================================

const SQL_STATEMENTS: [&str; 9] = ["select", "insert", "update", "delete", "create", "alter", "drop", "grant", "revoke"];

/// Multi-line, long, or a whole SQL statement
fn looks_like_paragraph(answer: &str) -> bool {
  answer.contains('\n') || answer.chars().count() > FREEFORM_MIN_CHARS || looks_like_sql(answer)
}

fn looks_like_sql(answer: &str) -> bool {
  let words: Vec<String> = answer.split_whitespace().map(|w| w.to_ascii_lowercase()).collect();
  words.len() >= 3 && SQL_STATEMENTS.contains(&words[0].as_str())
}
