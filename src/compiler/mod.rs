//! The Compiler module takes Fe source text and produces
//! x86_64 NASM assembly text.
//!
//! It does this in three sequential passes: a character-level
//! scanner producing a position-tagged token stream, a lowering
//! pass matching that stream against the supported statement
//! shape, and a textual renderer for the resulting program.

pub mod asm;
pub mod diag;
pub mod lexer;
pub mod lower;
pub mod token;
