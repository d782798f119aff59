//! Helpers for building injection blocks with explicit indentation.
//!
//! Injected blocks land inside live configuration source, so indentation is
//! always stated by the caller; nothing here looks at the target file.

/// `n` spaces.
pub fn spaces(n: usize) -> String {
    " ".repeat(n)
}

/// A block of lines, each with its own indentation width.
///
/// ```rust
/// use barebones_core::domain::Snippet;
///
/// let block = Snippet::new()
///     .blank()
///     .line(4, "# Set ActiveJob to use Sidekiq")
///     .line(4, "config.active_job.queue_adapter = :sidekiq")
///     .build();
/// assert_eq!(
///     block,
///     "\n    # Set ActiveJob to use Sidekiq\n    config.active_job.queue_adapter = :sidekiq\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snippet {
    text: String,
}

impl Snippet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` indented by `indent` spaces, followed by a newline.
    pub fn line(mut self, indent: usize, line: impl AsRef<str>) -> Self {
        self.text.push_str(&spaces(indent));
        self.text.push_str(line.as_ref());
        self.text.push('\n');
        self
    }

    /// Append an empty line.
    pub fn blank(mut self) -> Self {
        self.text.push('\n');
        self
    }

    /// Append several lines at the same indentation.
    pub fn lines<I, S>(self, indent: usize, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines.into_iter().fold(self, |acc, l| acc.line(indent, l))
    }

    pub fn build(self) -> String {
        self.text
    }
}
