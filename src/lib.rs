//! Mistral OCR Desk host: bootstrap and command-line interface.

pub mod bootstrap;
pub mod cli;
