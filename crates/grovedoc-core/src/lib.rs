//! Core infrastructure for grovedoc.
//!
//! This crate provides the language-agnostic parts of the pipeline:
//! - Normalized syntax tree shared by the front ends
//! - Unicode escape decoding, tokenizer and token cursor for the declaration
//!   parsers
//! - Doc comment processing
//! - Document model (classes, packages, root document) and name resolution
//! - Document assembler (normalized tree -> class documents)
//! - Package description markup extraction
//! - Error types and the diagnostics collector
//! - Language adapter trait for the front ends

pub mod adapter;
pub mod assembler;
pub mod comment;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod markup;
pub mod model;
pub mod options;
pub mod resolve;
pub mod root;
pub mod tree;
pub mod unicode;
