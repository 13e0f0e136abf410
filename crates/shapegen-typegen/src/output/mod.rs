//! Output backends.
//!
//! Each backend walks the declaration IR and produces one source file. All
//! backends implement [`Backend`](crate::traits::Backend) for uniform
//! access through the registry.

// Java
#[cfg(feature = "backend-java")]
pub mod java;

#[cfg(feature = "backend-java")]
pub use java::{JavaBackend, generate_java_messages, generate_java_type};

// Rust
#[cfg(feature = "backend-rust")]
pub mod rust;

#[cfg(feature = "backend-rust")]
pub use rust::{RustBackend, generate_rust_messages, generate_rust_type};

/// First line of every generated file.
pub const HEADER: &str = "// Generated by shapegen. Do not edit.";

/// Line-oriented source buffer with block indentation.
pub(crate) struct CodeWriter {
    output: String,
    indent: usize,
    unit: &'static str,
}

impl CodeWriter {
    pub(crate) fn new(unit: &'static str) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            unit,
        }
    }

    /// Write one indented line. Empty text writes a bare newline.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str(self.unit);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with("\n\n") && !self.output.ends_with("{\n") {
            self.output.push('\n');
        }
    }

    /// Write `text` and indent what follows.
    pub(crate) fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedent and write `text`.
    pub(crate) fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    pub(crate) fn finish(self) -> String {
        self.output
    }
}

/// `1`, `0.5`, `1e100`: shortest text that reads back as `value`.
pub(crate) fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:?}")
    }
}
