use colored::Colorize;
use quill_utils::diag::CompileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnitError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("cannot infer the type of `{0}`")]
    Uninferable(String),
    #[error("compilation aborted")]
    Aborted,
    #[error("invalid configuration: {0}")]
    Conf(#[from] toml::de::Error),
}

impl UnitError {
    pub fn render(&self, colorful: bool) -> String {
        match self {
            | UnitError::Compile(err) => err.render(colorful),
            | _ if colorful => format!("{}: {}", "error".red().bold(), self),
            | _ => format!("error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnitError>;
