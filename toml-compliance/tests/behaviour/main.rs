//! Behavioural tests for the compliance runner using `rstest-bdd`.
//!
//! Stub programs are `/bin/sh` scripts, so the suite only runs on Unix.
#![cfg(unix)]

mod fixtures;
mod scenarios;
mod steps;
