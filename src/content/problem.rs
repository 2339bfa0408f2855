//! Practical problem records as they appear in the dataset files.
//!
//! A record carries the question, the dataset's shape metadata and the
//! reference answer. Loading the files themselves is left to the caller;
//! this module only decodes and cleans records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{InputShape, Question, ReferenceAnswer};
use crate::grading::{self, ClassifyOptions, ShapeMetadata};

/// One practical exam problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticalProblem {
    /// Problem number within its set (numbers and strings both accepted)
    #[serde(default, deserialize_with = "number_or_text")]
    pub problem_number: String,
    #[serde(default)]
    pub question_text: String,
    /// Context block shown under the question (`<보기>` lists, SQL tables)
    #[serde(default)]
    pub examples: String,
    /// Declared shape name; see `InputShape::from_str`
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub input_labels: Vec<String>,
    #[serde(default)]
    pub accepted_answers: Vec<String>,
    /// Display-only hint; must never contain the answer
    #[serde(default)]
    pub answer_format_hint: Option<String>,
    #[serde(default, alias = "correct_answer_text")]
    pub correct_answer: String,
    /// Multiple-choice options. Practical problems should have none.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Errors decoding problem records
#[derive(Debug)]
pub enum ProblemParseError {
    JsonError(String),
    InvalidInputType(String),
}

impl std::fmt::Display for ProblemParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemParseError::JsonError(msg) => write!(f, "JSON error: {}", msg),
            ProblemParseError::InvalidInputType(value) => write!(f, "Unknown input_type: {}", value),
        }
    }
}

impl std::error::Error for ProblemParseError {}

fn number_or_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => n.to_string(),
        Some(NumberOrText::Text(s)) => s.trim().to_string(),
        None => String::new(),
    })
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

impl PracticalProblem {
    /// Decode one record
    pub fn from_json(json: &str) -> Result<Self, ProblemParseError> {
        let problem: PracticalProblem =
            serde_json::from_str(json).map_err(|e| ProblemParseError::JsonError(e.to_string()))?;
        Ok(problem.cleaned())
    }

    /// Decode a JSON array of records
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, ProblemParseError> {
        let problems: Vec<PracticalProblem> =
            serde_json::from_str(json).map_err(|e| ProblemParseError::JsonError(e.to_string()))?;
        Ok(problems.into_iter().map(Self::cleaned).collect())
    }

    /// Trim labels and accepted answers, dropping empties
    pub fn cleaned(mut self) -> Self {
        self.input_labels = clean_list(self.input_labels);
        self.accepted_answers = clean_list(self.accepted_answers);
        self.options = clean_list(self.options);
        self.input_type = self
            .input_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// Declared shape, or an error naming an unrecognised `input_type`
    pub fn checked_shape(&self) -> Result<Option<InputShape>, ProblemParseError> {
        match self.input_type.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => InputShape::from_str(value)
                .map(Some)
                .ok_or_else(|| ProblemParseError::InvalidInputType(value.to_string())),
        }
    }

    /// Declared shape; an unknown `input_type` counts as undeclared
    pub fn declared_shape(&self) -> Option<InputShape> {
        self.checked_shape().unwrap_or_else(|e| {
            tracing::debug!("Problem {}: {}", self.problem_number, e);
            None
        })
    }

    pub fn question(&self) -> Question {
        Question {
            question_text: self.question_text.clone(),
            example_text: self.examples.clone(),
            declared_shape: self.declared_shape(),
            declared_labels: self.input_labels.clone(),
            declared_accepted_answers: self.accepted_answers.clone(),
        }
    }

    /// Reference answer with declared and `<보기>` alternates
    pub fn reference(&self) -> ReferenceAnswer {
        grading::reference_for(&self.question(), &self.correct_answer)
    }

    pub fn shape(&self, options: &ClassifyOptions) -> ShapeMetadata {
        grading::classify_with(&self.question(), &self.reference(), options)
    }

    /// Grade a learner's submitted answer
    pub fn grade(&self, input: &str, options: &ClassifyOptions) -> bool {
        grading::grade_with(&self.question(), &self.correct_answer, input, options)
    }
}
