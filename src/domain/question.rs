use serde::{Deserialize, Serialize};

/// Structural category of a practical answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputShape {
  /// One value, compared literally after normalization
  Single,
  /// Symbol list where order matters ("ㄴ-ㄷ-ㄱ")
  OrderedSequence,
  /// Symbol list where order does not matter ("ㄱ, ㄴ")
  UnorderedSymbolSet,
  /// Several labelled blanks ("가: AVG, 나: COUNT")
  MultiBlank,
  /// Paragraph-style answer (SQL statements, descriptions)
  #[serde(rename = "textarea", alias = "freeform")]
  Freeform,
}

impl InputShape {
  /// Parse a dataset `input_type` value. Accepts the legacy `sequence` name.
  pub fn from_str(s: &str) -> Option<Self> {
    match s.trim() {
      "single" => Some(Self::Single),
      "ordered_sequence" | "sequence" => Some(Self::OrderedSequence),
      "unordered_symbol_set" => Some(Self::UnorderedSymbolSet),
      "multi_blank" => Some(Self::MultiBlank),
      "textarea" | "freeform" => Some(Self::Freeform),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Single => "single",
      Self::OrderedSequence => "ordered_sequence",
      Self::UnorderedSymbolSet => "unordered_symbol_set",
      Self::MultiBlank => "multi_blank",
      Self::Freeform => "textarea",
    }
  }

  /// Shapes whose answer is a run of list symbols
  pub fn is_symbol_run(&self) -> bool {
    matches!(self, Self::OrderedSequence | Self::UnorderedSymbolSet)
  }

  /// Shapes the UI splits into more than one editable slot
  pub fn is_multi_slot(&self) -> bool {
    matches!(self, Self::OrderedSequence | Self::UnorderedSymbolSet | Self::MultiBlank)
  }
}

/// A practical exam question as the engine sees it.
///
/// Built once at dataset load time and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub question_text: String,
  /// Context/options block under the question (may contain `<보기>` lists)
  #[serde(default)]
  pub example_text: String,
  /// Explicit shape from the dataset; overrides all inference
  #[serde(default)]
  pub declared_shape: Option<InputShape>,
  /// Explicit slot labels from the dataset
  #[serde(default)]
  pub declared_labels: Vec<String>,
  /// Extra literal strings that should also be accepted
  #[serde(default)]
  pub declared_accepted_answers: Vec<String>,
}

impl Question {
  pub fn new(question_text: impl Into<String>) -> Self {
    Self {
      question_text: question_text.into(),
      ..Self::default()
    }
  }

  pub fn with_examples(mut self, example_text: impl Into<String>) -> Self {
    self.example_text = example_text.into();
    self
  }

  pub fn with_shape(mut self, shape: InputShape) -> Self {
    self.declared_shape = Some(shape);
    self
  }

  pub fn with_labels<I, S>(mut self, labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.declared_labels = labels.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_accepted_answers<I, S>(mut self, answers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.declared_accepted_answers = answers.into_iter().map(Into::into).collect();
    self
  }
}

/// Canonical correct answer plus any dataset-declared alternates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAnswer {
  pub text: String,
  #[serde(default)]
  pub alternates: Vec<String>,
}

impl ReferenceAnswer {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      alternates: Vec::new(),
    }
  }

  pub fn with_alternates<I, S>(mut self, alternates: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.alternates.extend(alternates.into_iter().map(Into::into));
    self
  }

  /// True when neither the canonical text nor any alternate carries content
  pub fn is_blank(&self) -> bool {
    self.text.trim().is_empty() && self.alternates.iter().all(|a| a.trim().is_empty())
  }
}
