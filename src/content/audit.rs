//! Dataset audit for practical problems.
//!
//! Checks each record for the problems that break grading in practice:
//! missing metadata, corrupted text, hints that give the answer away, and
//! reference answers the matcher would reject when submitted through the UI.

use serde::Serialize;
use std::collections::HashMap;

use super::problem::PracticalProblem;
use crate::domain::InputShape;
use crate::grading::draft::{join_multi_blank, join_sequence};
use crate::grading::labels::{extract_sequence_tokens, labeled_values};
use crate::grading::{ClassifyOptions, ShapeMetadata, is_match, normalize};

/// What an audit finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingInputType,
    UnknownInputType,
    /// A practical problem carries multiple-choice options
    OptionsLeak,
    MissingAnswer,
    /// U+FFFD or `???` in any text field
    BadText,
    HintLeaksAnswer,
    /// The reference answer, entered through the UI, is graded wrong
    MatcherFail,
    /// Same question text declared with different input types
    DuplicateInputTypeMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Failure,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFinding {
    pub problem_number: String,
    pub kind: FindingKind,
    pub severity: Severity,
    pub detail: String,
}

impl AuditFinding {
    fn failure(problem: &PracticalProblem, kind: FindingKind, detail: impl Into<String>) -> Self {
        Self {
            problem_number: problem.problem_number.clone(),
            kind,
            severity: Severity::Failure,
            detail: detail.into(),
        }
    }
}

fn has_bad_text(text: &str) -> bool {
    text.contains('\u{FFFD}') || text.contains("???")
}

/// The string the UI would submit if a learner typed the reference answer
/// into the question's slots
pub fn simulate_ui_answer(answer: &str, meta: &ShapeMetadata) -> String {
    match meta.shape {
        InputShape::OrderedSequence | InputShape::UnorderedSymbolSet => match extract_sequence_tokens(answer) {
            Some(run) => {
                let slots: Vec<String> = run.symbols.iter().map(|s| s.render()).collect();
                join_sequence(&slots)
            }
            None => answer.to_string(),
        },
        InputShape::MultiBlank => match labeled_values(answer) {
            Some(values) if values.len() == meta.labels.len() => {
                let values: Vec<String> = values.into_iter().map(|v| v.value).collect();
                join_multi_blank(&meta.labels, &values)
            }
            _ => answer.to_string(),
        },
        InputShape::Single | InputShape::Freeform => answer.to_string(),
    }
}

/// Audit a single record
pub fn audit_problem(problem: &PracticalProblem, options: &ClassifyOptions) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    let answer = problem.correct_answer.trim();

    match problem.checked_shape() {
        Ok(None) => findings.push(AuditFinding::failure(problem, FindingKind::MissingInputType, "input_type is not set")),
        Ok(Some(_)) => {}
        Err(e) => findings.push(AuditFinding::failure(problem, FindingKind::UnknownInputType, e.to_string())),
    }

    if !problem.options.is_empty() {
        findings.push(AuditFinding::failure(
            problem,
            FindingKind::OptionsLeak,
            format!("{} options on a practical problem", problem.options.len()),
        ));
    }

    if answer.is_empty() {
        findings.push(AuditFinding::failure(problem, FindingKind::MissingAnswer, "correct_answer is empty"));
    }

    let bad_field = [
        ("question_text", problem.question_text.as_str()),
        ("examples", problem.examples.as_str()),
        ("correct_answer", problem.correct_answer.as_str()),
    ]
    .into_iter()
    .find(|(_, text)| has_bad_text(text));
    if let Some((field, _)) = bad_field {
        findings.push(AuditFinding::failure(problem, FindingKind::BadText, format!("corrupted text in {}", field)));
    }

    if let Some(hint) = problem.answer_format_hint.as_deref() {
        let normalized_answer = normalize(answer);
        if normalized_answer.chars().count() >= 2 && normalize(hint).contains(&normalized_answer) {
            findings.push(AuditFinding::failure(problem, FindingKind::HintLeaksAnswer, hint.to_string()));
        }
    }

    if !answer.is_empty() {
        let reference = problem.reference();
        let meta = problem.shape(options);
        let simulated = simulate_ui_answer(answer, &meta);
        if !is_match(&simulated, &reference, &meta) {
            findings.push(AuditFinding::failure(
                problem,
                FindingKind::MatcherFail,
                format!("{} input {:?} rejected", meta.shape.as_str(), simulated),
            ));
        }
    }

    findings
}

/// Audit a whole set, including cross-record checks
pub fn audit_problems(problems: &[PracticalProblem], options: &ClassifyOptions) -> Vec<AuditFinding> {
    let mut findings: Vec<AuditFinding> = problems.iter().flat_map(|p| audit_problem(p, options)).collect();

    // Group by question text + examples, in first-seen order
    let mut groups: Vec<Vec<&PracticalProblem>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for problem in problems {
        let key = normalize(&format!("{}\n{}", problem.question_text, problem.examples));
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => groups[i].push(problem),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![problem]);
            }
        }
    }

    for group in groups.iter().filter(|g| g.len() >= 2) {
        let mut types: Vec<&str> = group.iter().map(|p| p.input_type.as_deref().unwrap_or("")).collect();
        types.sort_unstable();
        types.dedup();
        if types.len() > 1 {
            let numbers: Vec<&str> = group.iter().map(|p| p.problem_number.as_str()).collect();
            findings.push(AuditFinding {
                problem_number: numbers.join(","),
                kind: FindingKind::DuplicateInputTypeMismatch,
                severity: Severity::Warning,
                detail: format!("declared as {}", types.join(", ")),
            });
        }
    }

    for finding in &findings {
        tracing::warn!(
            "Audit {:?} on problem {}: {}",
            finding.kind,
            finding.problem_number,
            finding.detail
        );
    }

    findings
}
