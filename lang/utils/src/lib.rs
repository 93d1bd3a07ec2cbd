#![allow(clippy::style)]
#![allow(clippy::useless_format)]

pub mod diag;
pub mod fresh;
pub mod span;

pub mod prelude {
    /// Source code location.
    pub use crate::span::{FileInfo, Sp, Span};
    /// Diagnostics.
    pub use crate::diag::{CompileError, Indicator};
    pub use crate::fresh::Fresh;
}
