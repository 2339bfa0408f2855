pub mod config;
pub mod content;
pub mod domain;
pub mod grading;
pub mod handlers;
pub mod state;
