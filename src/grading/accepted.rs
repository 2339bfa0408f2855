//! Accepted-answer set construction.
//!
//! Every rule here only adds variants. A learner input can only become
//! acceptable by matching something a rule produced.

use std::collections::BTreeSet;

use super::alphabet::SymbolAlphabet;
use super::labels::{find_labeled_segments, leading_marker, strip_leading_label};
use super::normalize::normalize;
use crate::domain::{Question, ReferenceAnswer};

/// Normalized strings accepted for one reference answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedAnswerSet {
  members: BTreeSet<String>,
  /// Trimmed, un-normalized variants, for structural comparison
  sources: Vec<String>,
}

impl AcceptedAnswerSet {
  /// Whether an already-normalized input is accepted literally
  pub fn contains(&self, normalized: &str) -> bool {
    self.members.contains(normalized)
  }

  pub fn is_empty(&self) -> bool {
    self.members.is_empty()
  }

  /// Raw variants with list symbols intact (`①` is still `①`)
  pub fn sources(&self) -> &[String] {
    &self.sources
  }

  fn with_variant(mut self, raw: &str) -> Self {
    let raw = raw.trim();
    let normalized = normalize(raw);
    if normalized.is_empty() {
      return self;
    }
    self.members.insert(normalized);
    if !self.sources.iter().any(|s| s == raw) {
      self.sources.push(raw.to_string());
    }
    self
  }
}

/// `X (Y)` → `X`, `Y`
fn parenthetical_parts(text: &str) -> Option<(String, String)> {
  let trimmed = text.trim();
  let inner_end = trimmed.strip_suffix(')')?;
  // First `(` after at least one character
  let open = trimmed.char_indices().skip(1).find(|(_, c)| *c == '(').map(|(i, _)| i)?;
  if open >= inner_end.len() {
    return None;
  }
  let head = trimmed[..open].trim_end();
  let inner = inner_end[open + 1..].trim();
  (!head.is_empty() && !inner.is_empty()).then(|| (head.to_string(), inner.to_string()))
}

/// `A 또는 B` → `A`, `B`
pub(crate) fn or_alternatives(text: &str) -> Vec<String> {
  let mut parts = vec![text.to_string()];
  for word in ["또는", "혹은"] {
    parts = parts
      .iter()
      .flat_map(|p| p.split(word).map(|s| s.trim().to_string()).collect::<Vec<_>>())
      .collect();
  }
  parts.retain(|p| !p.is_empty());
  if parts.len() >= 2 { parts } else { Vec::new() }
}

/// Variants of one raw answer: itself, its parenthetical parts and its
/// `또는` alternatives
fn expand(text: &str) -> Vec<String> {
  let mut out = vec![text.to_string()];
  if let Some((head, inner)) = parenthetical_parts(text) {
    out.push(head);
    out.push(inner);
  }
  out.extend(or_alternatives(text));
  out
}

/// Variants of one reference string, including the label-stripped form when
/// the string carries exactly one leading label
fn variants_of(text: &str) -> Vec<String> {
  let mut out = expand(text);
  if let Some(rest) = strip_leading_label(text) {
    if find_labeled_segments(&rest).is_empty() {
      out.extend(expand(&rest));
    }
  }
  out
}

/// Build the accepted set from a reference answer and its alternates.
///
/// An empty or blank reference yields an empty set, which accepts nothing.
pub fn build_accepted_set(reference: &ReferenceAnswer) -> AcceptedAnswerSet {
  std::iter::once(&reference.text)
    .chain(reference.alternates.iter())
    .flat_map(|raw| variants_of(raw))
    .fold(AcceptedAnswerSet::default(), |set, variant| set.with_variant(&variant))
}

// ============================================================================
// Reference assembly
// ============================================================================

/// One `ㄱ. text` entry of a `<보기>` block
#[derive(Debug, Clone, PartialEq, Eq)]
struct SymbolChoice {
  label: String,
  text: String,
}

fn has_choice_block(question: &Question) -> bool {
  question.example_text.contains("<보기>")
    || question.example_text.contains("＜보기＞")
    || question.question_text.contains("보기")
}

fn symbol_choices(question: &Question) -> Vec<SymbolChoice> {
  if !has_choice_block(question) {
    return Vec::new();
  }
  let mut choices: Vec<SymbolChoice> = Vec::new();
  for line in question.example_text.lines() {
    let Some(marker) = leading_marker(line) else {
      continue;
    };
    let is_symbol = matches!(marker.alphabet, SymbolAlphabet::KoreanJamo | SymbolAlphabet::Circled);
    if is_symbol && !marker.rest.is_empty() && !choices.iter().any(|c| c.label == marker.label) {
      choices.push(SymbolChoice {
        label: marker.label,
        text: marker.rest,
      });
    }
  }
  if choices.len() >= 2 { choices } else { Vec::new() }
}

/// Forms of a choice a learner may write (`ㄱ`, `원자성`, `ㄱ. 원자성`, …)
fn choice_forms(choice: &SymbolChoice) -> Vec<String> {
  let SymbolChoice { label, text } = choice;
  vec![
    label.clone(),
    text.clone(),
    format!("{}. {}", label, text),
    format!("{}) {}", label, text),
    format!("{}: {}", label, text),
    format!("{} {}", label, text),
  ]
}

/// Answer is the choice label, its text, `label. text` or `label text`
fn names_choice(choice: &SymbolChoice, target: &str) -> bool {
  [
    choice.label.clone(),
    choice.text.clone(),
    format!("{}. {}", choice.label, choice.text),
    format!("{} {}", choice.label, choice.text),
  ]
  .iter()
  .any(|form| normalize(form) == target)
}

/// Assemble the reference for a question: the dataset answer, its declared
/// accepted answers, and every form of a `<보기>` choice the answer names.
pub fn reference_for(question: &Question, answer: &str) -> ReferenceAnswer {
  let mut alternates: Vec<String> = question
    .declared_accepted_answers
    .iter()
    .map(|a| a.trim().to_string())
    .filter(|a| !a.is_empty())
    .collect();

  let target = normalize(answer);
  if !target.is_empty() {
    let named = symbol_choices(question).into_iter().find(|choice| names_choice(choice, &target));
    if let Some(choice) = named {
      tracing::trace!("Answer names <보기> choice {}", choice.label);
      for form in choice_forms(&choice) {
        if !alternates.contains(&form) {
          alternates.push(form);
        }
      }
    }
  }

  ReferenceAnswer::new(answer.trim()).with_alternates(alternates)
}
