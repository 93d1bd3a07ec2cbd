use sculptor::{AppAuthor, FileIO, impl_serde_str_toml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// resolve mode of top-level evaluation
    pub resolve: bool,
    pub width: usize,
    pub indent: isize,
}

impl Default for Conf {
    fn default() -> Self {
        Conf { resolve: true, width: 80, indent: 2 }
    }
}

impl_serde_str_toml!(Conf);

impl AppAuthor for Conf {
    fn app_name() -> &'static str {
        "Quill"
    }

    fn author() -> &'static str {
        "Quill"
    }
}

impl Conf {
    pub fn from_toml_str(s: &str) -> crate::Result<Self> {
        Ok(toml::from_str(s)?)
    }
    /// Reads a configuration file.
    pub fn open(path: impl Into<PathBuf>) -> crate::Result<Self> {
        Ok(FileIO::new(path.into()).load()?)
    }
}
