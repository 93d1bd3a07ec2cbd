//! Structured compile errors.

use crate::span::Span;
use colored::Colorize;
use std::fmt;

/// A labelled source location attached to a diagnostic.
#[derive(Clone, Debug)]
pub struct Indicator {
    pub span: Span,
    pub label: String,
}

impl Indicator {
    fn location(&self) -> String {
        if self.span.is_dummy() { format!("<internal>") } else { format!("{}", self.span) }
    }
}

/// A user-facing error: a message plus indicators kept in attachment order.
#[derive(Clone, Debug)]
pub struct CompileError {
    message: String,
    indicators: Vec<Indicator>,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        CompileError { message: message.into(), indicators: Vec::new() }
    }
    /// Chained form of [`CompileError::add_indicator`].
    pub fn indicator(mut self, span: &Span, label: impl Into<String>) -> Self {
        self.add_indicator(span, label);
        self
    }
    pub fn add_indicator(&mut self, span: &Span, label: impl Into<String>) {
        self.indicators.push(Indicator { span: span.clone(), label: label.into() });
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn message_mut(&mut self) -> &mut String {
        &mut self.message
    }
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }
    pub fn render(&self, colorful: bool) -> String {
        let mut s = String::new();
        if colorful {
            s += &format!("{}: {}", "error".red().bold(), self.message.bold());
        } else {
            s += &format!("error: {}", self.message);
        }
        for ind in self.indicators.iter() {
            let loc = ind.location();
            if colorful {
                s += &format!("\n  {} {}: {}", "-->".blue(), loc, ind.label);
            } else {
                s += &format!("\n  --> {}: {}", loc, ind.label);
            }
        }
        s
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

impl std::error::Error for CompileError {}
