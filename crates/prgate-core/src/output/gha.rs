//! `$GITHUB_OUTPUT` writer and workflow commands

use super::json_format::safe_output_escape;
use crate::error::Result;
use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Heredoc delimiter for multiline outputs
const DELIM: &str = "PRGATE_EOF";

/// Delimiter that no line of `value` equals: `PRGATE_EOF`, else
/// `PRGATE_EOF_1`, `PRGATE_EOF_2`, ...
fn delimiter_for(value: &str) -> Cow<'static, str> {
    let clashes = |delim: &str| value.lines().any(|line| line.trim_end_matches('\r') == delim);
    if !clashes(DELIM) {
        return Cow::Borrowed(DELIM);
    }
    (1u64..)
        .map(|n| format!("{DELIM}_{n}"))
        .find(|delim| !clashes(delim))
        .map_or(Cow::Borrowed(DELIM), Cow::Owned)
}

/// Appends step outputs to the `$GITHUB_OUTPUT` file
#[derive(Debug, Clone)]
pub struct GhaOutput {
    path: PathBuf,
}

impl GhaOutput {
    /// Write to an explicit output file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `$GITHUB_OUTPUT`; `None` outside of GitHub Actions
    pub fn from_env() -> Option<Self> {
        std::env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(Self::new)
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `name=value` pairs, using the multiline syntax for every value.
    ///
    /// Values are written verbatim; the delimiter is chosen per value so it
    /// never appears as one of the value's lines.
    pub fn write<'a, I>(&self, outputs: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut f = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        for (name, value) in outputs {
            let delim = delimiter_for(value);
            writeln!(f, "{name}<<{delim}")?;
            writeln!(f, "{value}")?;
            writeln!(f, "{delim}")?;
        }
        Ok(())
    }
}

/// `::error::` workflow command marking the step as failed in the UI
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", safe_output_escape(message))
}
