//! Step definitions grouped by concern.

mod corpus_steps;
mod program_steps;
mod run_steps;
