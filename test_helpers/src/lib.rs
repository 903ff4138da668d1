//! Test helpers shared across crates.
//!
//! [`corpus`] builds throwaway fixture trees, [`program`] writes stub
//! programs for the process harness, and [`text`] normalises captured output.

pub mod corpus;
pub mod program;
pub mod text;
