//! Line classification and continuation grouping.

use crate::model::{Category, NewEntry};

/// How many leading tokens are inspected for a level marker.
const MARKER_SCAN_TOKENS: usize = 4;

/// Category implied by the level marker near the start of a line.
///
/// Recognises markers such as `ERROR`, `[warn]`, `E/`, `panicked`, and
/// command prompts (`$ `, `> `). Lines without a marker are ordinary logs.
pub fn classify_line(line: &str) -> Category {
    let trimmed = line.trim_start();
    if trimmed.starts_with("$ ") || trimmed.starts_with("> ") {
        return Category::Command;
    }
    if trimmed.starts_with("Traceback") || trimmed.contains("panicked at") {
        return Category::Error;
    }

    for token in trimmed.split_whitespace().take(MARKER_SCAN_TOKENS) {
        let word = token
            .trim_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_ascii_lowercase();
        match word.as_str() {
            "error" | "err" | "fatal" | "crit" | "critical" | "panic" | "exception" => {
                return Category::Error;
            }
            "warn" | "warning" => return Category::Warning,
            "info" | "debug" | "trace" | "log" => return Category::Log,
            _ => {}
        }
    }
    Category::Log
}

/// Whether a line continues the previous entry (indented block, stack frame).
pub fn is_continuation(line: &str) -> bool {
    if line.starts_with([' ', '\t']) {
        return !line.trim().is_empty();
    }
    line.starts_with("at ") || line.starts_with("Caused by")
}

/// Groups a head line with its continuation lines into one entry.
///
/// The head becomes the message; continuation lines become the context.
#[derive(Debug, Default)]
pub struct LineAssembler {
    current: Option<NewEntry>,
}

impl LineAssembler {
    /// Empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its newline). Returns the previous entry once it
    /// is known to be complete.
    pub fn feed(&mut self, line: &str) -> Option<NewEntry> {
        if line.trim().is_empty() {
            return self.finish();
        }
        if is_continuation(line) {
            if let Some(entry) = self.current.as_mut() {
                if !entry.context.is_empty() {
                    entry.context.push('\n');
                }
                entry.context.push_str(line.trim_end());
                return None;
            }
        }
        let head = NewEntry::new(line.trim_end(), "", classify_line(line));
        self.current.replace(head)
    }

    /// Take the entry being assembled, if any.
    pub fn finish(&mut self) -> Option<NewEntry> {
        self.current.take()
    }
}
