//! Answer matching.
//!
//! `is_match` normalizes the learner input, checks it against the accepted
//! set, then tries the structural comparisons that fit the question's shape.
//! Every structural comparison requires the same number of symbols, labels
//! or fields on both sides before it looks at the values.

use super::accepted::{build_accepted_set, or_alternatives, reference_for};
use super::draft::labeled_multi_blank;
use super::labels::{extract_sequence_tokens, extract_symbol_set, labeled_values, split_by_known_labels};
use super::normalize::normalize;
use super::shape::{ClassifyOptions, ShapeMetadata, classify_with};
use crate::domain::{InputShape, Question, ReferenceAnswer};

/// Comparison that accepted an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
  /// Normalized input is in the accepted set
  Literal,
  /// Same symbols, any order
  SymbolSet,
  /// Same symbols, same order
  Sequence,
  /// Same label → value pairs, label family ignored
  LabeledPairs,
  /// Same labelled values by position, labels ignored
  ValuesOnly,
  /// Every labelled field equivalent
  FieldEquivalence,
  /// Every field equivalent after splitting on the question's labels
  KnownLabels,
}

impl Strategy {
  pub fn as_str(&self) -> &'static str {
    match self {
      Strategy::Literal => "literal",
      Strategy::SymbolSet => "symbol_set",
      Strategy::Sequence => "sequence",
      Strategy::LabeledPairs => "labeled_pairs",
      Strategy::ValuesOnly => "values_only",
      Strategy::FieldEquivalence => "field_equivalence",
      Strategy::KnownLabels => "known_labels",
    }
  }
}

/// Decide whether `input` answers the question. Never fails; anything
/// unparseable is a rejection.
pub fn is_match(input: &str, reference: &ReferenceAnswer, meta: &ShapeMetadata) -> bool {
  match matching_strategy(input, reference, meta) {
    Some(strategy) => {
      tracing::debug!("Answer accepted by {} ({})", strategy.as_str(), meta.shape.as_str());
      true
    }
    None => false,
  }
}

/// The first comparison that accepts `input`, if any
pub fn matching_strategy(input: &str, reference: &ReferenceAnswer, meta: &ShapeMetadata) -> Option<Strategy> {
  let normalized = normalize(input);
  if normalized.is_empty() || reference.is_blank() {
    return None;
  }

  let accepted = build_accepted_set(reference);
  if accepted.is_empty() {
    return None;
  }
  if accepted.contains(&normalized) {
    return Some(Strategy::Literal);
  }

  let sources = accepted.sources();
  match meta.shape {
    InputShape::UnorderedSymbolSet => same_symbol_set(input, sources).or_else(|| same_sequence(input, sources)),
    InputShape::OrderedSequence => same_sequence(input, sources),
    InputShape::MultiBlank => multi_blank_strategy(input, sources, &meta.labels),
    InputShape::Single | InputShape::Freeform => {
      let reference_is_run = sources.iter().any(|s| extract_sequence_tokens(s).is_some());
      if reference_is_run { same_sequence(input, sources) } else { None }
    }
  }
}

/// Assemble the reference, classify and match in one call
pub fn grade(question: &Question, answer: &str, input: &str) -> bool {
  grade_with(question, answer, input, &ClassifyOptions::default())
}

pub fn grade_with(question: &Question, answer: &str, input: &str, options: &ClassifyOptions) -> bool {
  let reference = reference_for(question, answer);
  let meta = classify_with(question, &reference, options);
  is_match(input, &reference, &meta)
}

// ============================================================================
// Symbol runs
// ============================================================================

fn same_symbol_set(input: &str, sources: &[String]) -> Option<Strategy> {
  let key = extract_symbol_set(input)?.set_key();
  sources
    .iter()
    .filter_map(|s| extract_symbol_set(s))
    .any(|run| run.set_key() == key)
    .then_some(Strategy::SymbolSet)
}

fn same_sequence(input: &str, sources: &[String]) -> Option<Strategy> {
  let key = extract_sequence_tokens(input)?.ordered_key();
  sources
    .iter()
    .filter_map(|s| extract_sequence_tokens(s))
    .any(|run| run.ordered_key() == key)
    .then_some(Strategy::Sequence)
}

// ============================================================================
// Multi-blank
// ============================================================================

/// Label key where `가`, `①`, `ㄱ` and `1)` in the same position are equal
fn pair_key(label: &str, position: Option<u32>) -> String {
  match position {
    Some(pos) => pos.to_string(),
    None => normalize(label),
  }
}

fn sorted_pairs(text: &str) -> Option<Vec<(String, String)>> {
  let mut pairs: Vec<(String, String)> = labeled_values(text)?
    .into_iter()
    .map(|v| (pair_key(&v.label, v.position), normalize(&v.value)))
    .collect();
  pairs.sort();
  Some(pairs)
}

fn labeled_fields(text: &str) -> Option<Vec<String>> {
  Some(labeled_values(text)?.into_iter().map(|v| v.value).collect())
}

/// Values for the question's labels, falling back to labels of another
/// family by position. Unlabelled input never maps onto the labels.
fn known_label_fields(text: &str, labels: &[String]) -> Option<Vec<String>> {
  if labels.len() < 2 {
    return None;
  }
  split_by_known_labels(text, labels).or_else(|| labeled_multi_blank(text, labels))
}

fn all_fields_equivalent(a: &[String], b: &[String]) -> bool {
  a.len() == b.len() && a.iter().zip(b).all(|(x, y)| fields_equivalent(x, y))
}

fn multi_blank_strategy(input: &str, sources: &[String], labels: &[String]) -> Option<Strategy> {
  if let Some(pairs) = sorted_pairs(input) {
    if sources.iter().filter_map(|s| sorted_pairs(s)).any(|p| p == pairs) {
      return Some(Strategy::LabeledPairs);
    }
  }

  if let Some(fields) = labeled_fields(input) {
    let normalized: Vec<String> = fields.iter().map(|f| normalize(f)).collect();
    let values_match = sources
      .iter()
      .filter_map(|s| labeled_fields(s))
      .any(|other| other.iter().map(|f| normalize(f)).collect::<Vec<_>>() == normalized);
    if values_match {
      return Some(Strategy::ValuesOnly);
    }

    if sources
      .iter()
      .filter_map(|s| labeled_fields(s))
      .any(|other| all_fields_equivalent(&fields, &other))
    {
      return Some(Strategy::FieldEquivalence);
    }
  }

  let fields = known_label_fields(input, labels)?;
  sources
    .iter()
    .filter_map(|s| known_label_fields(s, labels))
    .any(|other| all_fields_equivalent(&fields, &other))
    .then_some(Strategy::KnownLabels)
}

// ============================================================================
// Field equivalence
// ============================================================================

/// Normalized forms a single field may be written in: itself and both
/// sides of `X (Y)`. A reference field also accepts the head of
/// `head: tail` and each `또는` alternative.
fn field_variants(value: &str, reference: bool) -> Vec<String> {
  let trimmed = value.trim();
  let mut raw = vec![trimmed.to_string()];

  if let Some(inner_end) = trimmed.strip_suffix(')') {
    if let Some(open) = inner_end.find('(').filter(|&i| i > 0) {
      raw.push(inner_end[..open].to_string());
      raw.push(inner_end[open + 1..].to_string());
    }
  }
  if reference {
    if let Some((head, tail)) = trimmed.split_once([':', '：']) {
      raw.push(head.to_string());
      raw.push(format!("{}: {}", head.trim(), tail.trim()));
    }
    raw.extend(or_alternatives(trimmed));
  }

  let mut out: Vec<String> = Vec::new();
  for variant in raw {
    let normalized = normalize(&variant);
    if !normalized.is_empty() && !out.contains(&normalized) {
      out.push(normalized);
    }
  }
  out
}

/// `A, B, C` as a sorted term set (two or more terms)
fn comma_term_set(value: &str) -> Option<Vec<String>> {
  let mut terms: Vec<String> = value
    .split([',', '，'])
    .map(|t| normalize(t.trim().trim_end_matches('.')))
    .filter(|t| !t.is_empty())
    .collect();
  if terms.len() < 2 {
    return None;
  }
  terms.sort();
  terms.dedup();
  Some(terms)
}

/// A learner's field value names the same answer as the reference field.
/// Not symmetric: only the reference side expands `head: tail` and `또는`.
pub fn fields_equivalent(input: &str, reference: &str) -> bool {
  let (na, nb) = (normalize(input), normalize(reference));
  if na.is_empty() || nb.is_empty() {
    return false;
  }
  if na == nb {
    return true;
  }

  let input_variants = field_variants(input, false);
  if field_variants(reference, true).iter().any(|v| input_variants.contains(v)) {
    return true;
  }

  if let (Some(x), Some(y)) = (comma_term_set(input), comma_term_set(reference)) {
    if x == y {
      return true;
    }
  }

  match (extract_symbol_set(input), extract_symbol_set(reference)) {
    (Some(x), Some(y)) => x.set_key() == y.set_key(),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grading::shape::classify;

  fn grade_text(question: &str, answer: &str, input: &str) -> bool {
    grade(&Question::new(question), answer, input)
  }

  // ==================== Ordered sequences ====================

  #[test]
  fn test_ordered_sequence_order_matters() {
    assert!(!grade_text("순서대로 나열하시오.", "ㄴ-ㄷ-ㄱ", "ㄱ-ㄴ-ㄷ"));
    assert!(grade_text("순서대로 나열하시오.", "ㄴ-ㄷ-ㄱ", "ㄴ-ㄷ-ㄱ"));
  }

  #[test]
  fn test_ordered_sequence_separator_insensitive() {
    assert!(grade_text("순서대로 나열하시오.", "ㄴ-ㄷ-ㄱ", "ㄴ, ㄷ, ㄱ"));
    assert!(grade_text("순서대로 나열하시오.", "ㄴ-ㄷ-ㄱ", "ㄴ → ㄷ → ㄱ"));
    assert!(grade_text("순서대로 나열하시오.", "ㄴ-ㄷ-ㄱ", "ㄴㄷㄱ"));
  }

  #[test]
  fn test_ordered_sequence_circled_numeric_interchangeable() {
    assert!(grade_text("", "③-①-②", "3-1-2"));
    assert!(grade_text("", "③-①-②", "③, ①, ②"));
    assert!(!grade_text("", "③-①-②", "①-②-③"));
  }

  #[test]
  fn test_ordered_sequence_rejects_partial() {
    assert!(!grade_text("", "ㄴ-ㄷ-ㄱ", "ㄴ-ㄷ"));
    assert!(!grade_text("", "ㄴ-ㄷ-ㄱ", "ㄴ-ㄷ-ㄱ-ㄹ"));
  }

  // ==================== Unordered sets ====================

  #[test]
  fn test_unordered_set_order_insensitive() {
    let question = "다음 중 옳은 것을 모두 고르시오.";
    assert!(grade_text(question, "ㄱ, ㄴ", "ㄴㄱ"));
    assert!(grade_text(question, "ㄱ, ㄴ", "ㄴ, ㄱ"));
    assert!(grade_text(question, "ㄱ, ㄴ", "ㄱ-ㄴ"));
  }

  #[test]
  fn test_unordered_set_rejects_superset_and_subset() {
    let question = "다음 중 옳은 것을 모두 고르시오.";
    assert!(!grade_text(question, "ㄱ, ㄴ", "ㄱ, ㄴ, ㄷ"));
    assert!(!grade_text(question, "ㄱ, ㄴ", "ㄱ"));
  }

  // ==================== Multi-blank ====================

  #[test]
  fn test_multi_blank_label_family_interchangeable() {
    assert!(grade_text("", "가: AVG, 나: COUNT", "① AVG ② COUNT"));
    assert!(grade_text("", "가: AVG, 나: COUNT", "ㄱ: avg / ㄴ: count"));
    assert!(grade_text("", "가: AVG, 나: COUNT", "(1) AVG (2) COUNT"));
  }

  #[test]
  fn test_multi_blank_rejects_swapped_values() {
    assert!(!grade_text("", "가: AVG, 나: COUNT", "① COUNT ② AVG"));
    assert!(!grade_text("", "가: AVG, 나: COUNT", "가: COUNT, 나: AVG"));
  }

  #[test]
  fn test_multi_blank_label_order_free() {
    assert!(grade_text("", "가: AVG, 나: COUNT", "나: COUNT, 가: AVG"));
  }

  #[test]
  fn test_multi_blank_draft_format() {
    assert!(grade_text("", "가: AVG, 나: COUNT", "가: AVG / 나: COUNT"));
  }

  #[test]
  fn test_multi_blank_requires_every_field() {
    assert!(!grade_text("", "가: AVG, 나: COUNT", "가: AVG"));
    assert!(!grade_text("", "가: AVG, 나: COUNT", "AVG"));
    assert!(!grade_text("", "가: AVG, 나: COUNT", "가: AVG, 나: COUNT, 다: SUM"));
  }

  #[test]
  fn test_multi_blank_parenthetical_field() {
    let answer = "① 제2정규형(2NF) ② 제3정규형(3NF)";
    assert!(grade_text("", answer, "① 2NF ② 3NF"));
    assert!(grade_text("", answer, "① 제2정규형 ② 제3정규형"));
    assert!(!grade_text("", answer, "① 3NF ② 2NF"));
  }

  #[test]
  fn test_multi_blank_comma_term_field() {
    let answer = "가: 학번, 이름 / 나: 학과";
    assert!(grade_text("", answer, "가: 이름, 학번 / 나: 학과"));
    assert!(!grade_text("", answer, "가: 이름 / 나: 학과"));
  }

  #[test]
  fn test_multi_blank_symbol_set_field() {
    let answer = "가: ㄴㄹ / 나: ㄱ";
    assert!(grade_text("", answer, "가: ㄹ, ㄴ / 나: ㄱ"));
  }

  #[test]
  fn test_named_pair_answer() {
    assert!(grade_text("차수와 카디널리티를 쓰시오.", "차수 3, 카디널리티 4", "차수: 3 / 카디널리티: 4"));
    assert!(grade_text("차수와 카디널리티를 쓰시오.", "차수 3, 카디널리티 4", "차수 3, 카디널리티 4"));
    assert!(!grade_text("차수와 카디널리티를 쓰시오.", "차수 3, 카디널리티 4", "차수: 4 / 카디널리티: 3"));
  }

  #[test]
  fn test_named_pair_answer_without_legacy_inference() {
    let options = ClassifyOptions { legacy_inference: false };
    let question = Question::new("차수와 카디널리티를 쓰시오.");
    assert!(!grade_with(&question, "차수 3, 카디널리티 4", "차수: 3 / 카디널리티: 4", &options));
    // The literal answer is still accepted
    assert!(grade_with(&question, "차수 3, 카디널리티 4", "차수 3, 카디널리티 4", &options));
  }

  #[test]
  fn test_declared_labels_split() {
    let question = Question::new("")
      .with_shape(InputShape::MultiBlank)
      .with_labels(["(가)", "(나)"]);
    assert!(grade(&question, "(가) 학생 (나) 교수", "가: 학생 / 나: 교수"));
    assert!(!grade(&question, "(가) 학생 (나) 교수", "가: 교수 / 나: 학생"));
  }

  // ==================== Single values ====================

  #[test]
  fn test_parenthetical_alternate() {
    assert!(grade_text("", "RR (Round Robin)", "Round Robin"));
    assert!(grade_text("", "RR (Round Robin)", "RR"));
    assert!(grade_text("", "RR (Round Robin)", "rr (round robin)"));
  }

  #[test]
  fn test_single_value_strictness() {
    assert!(grade_text("", "HTTP", "http "));
    assert!(grade_text("", "HTTP", "ＨＴＴＰ"));
    assert!(!grade_text("", "HTTP", "HTTPS"));
    assert!(!grade_text("", "HTTP", "HTTP/2"));
  }

  #[test]
  fn test_or_alternatives() {
    assert!(grade_text("", "이상 현상 또는 아노말리", "아노말리"));
    assert!(!grade_text("", "이상 현상 또는 아노말리", "현상"));
  }

  #[test]
  fn test_declared_accepted_answers() {
    let question = Question::new("").with_accepted_answers(["2NF"]);
    assert!(grade(&question, "제2정규형", "2nf"));
  }

  #[test]
  fn test_symbol_choice_by_text() {
    let question = Question::new("<보기>에서 고르시오.").with_examples("<보기>\nㄱ. 원자성\nㄴ. 일관성");
    assert!(grade(&question, "ㄴ", "일관성"));
    assert!(grade(&question, "ㄴ", "ㄴ. 일관성"));
    assert!(!grade(&question, "ㄴ", "원자성"));
  }

  // ==================== Fail closed ====================

  #[test]
  fn test_empty_input_rejected() {
    for answer in ["HTTP", "ㄴ-ㄷ-ㄱ", "가: AVG, 나: COUNT", "차수 3, 카디널리티 4"] {
      assert!(!grade_text("", answer, ""), "empty input accepted for {:?}", answer);
      assert!(!grade_text("", answer, "   "), "blank input accepted for {:?}", answer);
    }
  }

  #[test]
  fn test_blank_reference_never_correct() {
    assert!(!grade_text("", "", "anything"));
    assert!(!grade_text("", "  ", ""));
  }

  #[test]
  fn test_free_text_overlap_rejected() {
    let answer = "데이터 무결성을 보장하기 위한 제약 조건";
    assert!(!grade_text("", answer, "데이터 무결성"));
  }

  #[test]
  fn test_strategy_reported() {
    let reference = ReferenceAnswer::new("가: AVG, 나: COUNT");
    let meta = classify(&Question::new(""), &reference);
    assert_eq!(matching_strategy("가: AVG, 나: COUNT", &reference, &meta), Some(Strategy::Literal));
    assert_eq!(matching_strategy("① AVG ② COUNT", &reference, &meta), Some(Strategy::LabeledPairs));
  }

  #[test]
  fn test_hedged_field_rejected() {
    assert!(!fields_equivalent("키: 값", "값"));
    assert!(!fields_equivalent("SUM: AVG", "AVG"));
    assert!(!fields_equivalent("AVG 또는 SUM", "AVG"));
    assert!(!grade_text("", "가: AVG, 나: COUNT", "가: SUM: AVG, 나: COUNT"));
    assert!(!grade_text("", "가: AVG, 나: COUNT", "가: AVG 또는 SUM, 나: COUNT"));
  }

  #[test]
  fn test_multi_blank_rejects_unlabelled_extras() {
    assert!(!grade_text("", "가: AVG, 나: COUNT", "AVG, COUNT, SUM"));
    assert!(!grade_text("차수와 카디널리티를 쓰시오.", "차수 3, 카디널리티 4", "3, 4, 5"));
    assert!(!grade_text("", "가: AVG, 나: COUNT", "① AVG ② COUNT ③ SUM"));
  }

  #[test]
  fn test_fields_equivalent() {
    assert!(fields_equivalent("RR (Round Robin)", "round robin"));
    assert!(fields_equivalent("B, A", "A, B"));
    assert!(fields_equivalent("ㄴㄹ", "ㄹ, ㄴ"));
    assert!(fields_equivalent("키", "키: 값"));
    assert!(fields_equivalent("AVG", "AVG 또는 MEAN"));
    assert!(!fields_equivalent("A, B", "A, C"));
    assert!(!fields_equivalent("", ""));
  }
}
