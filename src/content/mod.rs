//! Dataset-facing content.
//!
//! - **Problems**: decoding and cleaning practical problem records
//! - **Audit**: checks a problem set the way the grading engine will see it

pub mod audit;
pub mod problem;

pub use audit::{AuditFinding, FindingKind, Severity, audit_problem, audit_problems};
pub use problem::{PracticalProblem, ProblemParseError};
