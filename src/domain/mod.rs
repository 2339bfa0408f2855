pub mod question;

pub use question::{InputShape, Question, ReferenceAnswer};
