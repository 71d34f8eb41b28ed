//! Changed-path classification into module directories
//!
//! Turns the flat list of files touched by a pull request into the set of
//! "module directories" that should get a build/test matrix entry.
//!
//! ```
//! use prgate_core::classifier::changed_dirs;
//!
//! let dirs = changed_dirs(
//!     ["infra/cs-d/base/main.tf", "infra/cs-p/route53/main.tf", "README.md"],
//!     "infra",
//!     Some(0),
//!     Some(2),
//! );
//! assert_eq!(dirs, vec!["cs-d/base", "cs-p/route53"]);
//! ```

use std::collections::HashSet;

/// How the base path is matched against each changed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseMatch {
    /// Compare whole `/`-separated segments: `infra` matches `infra/a.tf`
    /// but not `infrastructure/a.tf`
    #[default]
    Segment,
    /// Plain string prefix: `inf` matches `infra/a.tf`, and the remainder
    /// after the prefix is used as-is
    Raw,
}

/// Normalized `[min, max)` segment window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthRange {
    min: usize,
    max: usize,
}

impl DepthRange {
    /// Normalize raw depth bounds.
    ///
    /// - missing or negative `min` becomes `0`
    /// - missing `max` is unbounded
    /// - `max < min` becomes `min + 1`
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        let min = match min {
            Some(m) if m > 0 => usize::try_from(m).unwrap_or(usize::MAX - 1),
            _ => 0,
        };
        let max = match max {
            None => usize::MAX,
            Some(m) if m < 0 => min + 1,
            Some(m) => {
                let m = usize::try_from(m).unwrap_or(usize::MAX);
                if m < min {
                    min + 1
                } else {
                    m
                }
            }
        };
        Self { min, max }
    }

    /// Inclusive lower bound
    #[inline]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Exclusive upper bound (`usize::MAX` when unbounded)
    #[inline]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Slice `segments` to the window; empty when the window starts past the end
    #[inline]
    fn window<'s, 'p>(&self, segments: &'s [&'p str]) -> &'s [&'p str] {
        let end = self.max.min(segments.len());
        if self.min >= end {
            &[]
        } else {
            &segments[self.min..end]
        }
    }
}

impl Default for DepthRange {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Reusable classifier configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClassifier {
    base: String,
    depth: DepthRange,
    mode: BaseMatch,
}

impl PathClassifier {
    /// Create a classifier rooted at `base_path` (`"./"` means the repository root)
    pub fn new(base_path: &str, depth: DepthRange) -> Self {
        let base = if base_path == "./" { "" } else { base_path };
        Self {
            base: base.to_string(),
            depth,
            mode: BaseMatch::default(),
        }
    }

    /// Select how the base path is matched
    pub fn with_mode(mut self, mode: BaseMatch) -> Self {
        self.mode = mode;
        self
    }

    /// Normalized base path
    pub fn base_path(&self) -> &str {
        &self.base
    }

    /// Normalized depth window
    pub fn depth(&self) -> DepthRange {
        self.depth
    }

    /// Classify one path. Returns `None` when the path contributes nothing.
    pub fn classify_path(&self, path: &str) -> Option<String> {
        let mut segments: Vec<&str> = match self.mode {
            BaseMatch::Segment => self.strip_segments(path)?,
            BaseMatch::Raw => {
                let rest = path.strip_prefix(self.base.as_str())?;
                rest.split('/').filter(|s| !s.is_empty()).collect()
            }
        };

        // dirname: drop the file component. Empty segments were already
        // removed, so a trailing slash does not leave an empty file name.
        segments.pop()?;

        let window = self.depth.window(&segments);
        if window.len() <= self.depth.min {
            return None;
        }
        Some(window.join("/"))
    }

    /// Classify all paths into distinct module directories, in first-seen order
    pub fn classify<I, S>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut dirs = Vec::new();

        for path in paths {
            if let Some(dir) = self.classify_path(path.as_ref()) {
                if seen.insert(dir.clone()) {
                    dirs.push(dir);
                }
            }
        }

        dirs
    }

    /// Segment-aware base match; returns the segments below the base
    fn strip_segments<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        for base_segment in self.base.split('/').filter(|s| !s.is_empty()) {
            if segments.next()? != base_segment {
                return None;
            }
        }
        Some(segments.collect())
    }
}

/// Classify changed paths with segment-aware base matching.
///
/// Shorthand for `PathClassifier::new(base_path, DepthRange::new(min, max)).classify(paths)`.
pub fn changed_dirs<I, S>(
    paths: I,
    base_path: &str,
    min_depth: Option<i64>,
    max_depth: Option<i64>,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    PathClassifier::new(base_path, DepthRange::new(min_depth, max_depth)).classify(paths)
}
