//! Core pipeline orchestration and domain logic for bottleneck.
//!
//! This crate ties together note lookup, LaTeX serialization, template
//! assembly and the `pdflatex` hand-off into the end-to-end `generate` and
//! `check` workflows.

pub mod assembler;
pub mod collector;
pub mod latex;
pub mod pipeline;
pub mod render;
