//! Turing-test harness: an interrogator questions a role-playing
//! tech-support model, and each exchange is scored for human-likeness by an
//! independent jury and by a one-by-one debate jury.

pub mod config;
pub mod conversation;
pub mod prompts;
pub mod report;
pub mod runner;
