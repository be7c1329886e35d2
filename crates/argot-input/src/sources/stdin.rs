//! Piped stdin.

use std::sync::Arc;

use tracing::debug;

use crate::env::{RealStdin, StdinReader};
use crate::InputError;

/// Redirected stdin, drained into lines at most once.
///
/// Nothing is read until [`take_lines`](Self::take_lines) is called, so a
/// run with no piped-input target never blocks on stdin.
pub struct PipedInput {
    reader: Arc<dyn StdinReader>,
    drained: bool,
}

impl PipedInput {
    pub fn new() -> Self {
        Self::with_reader(Arc::new(RealStdin))
    }

    pub fn with_reader(reader: Arc<dyn StdinReader>) -> Self {
        Self {
            reader,
            drained: false,
        }
    }

    /// True when stdin is redirected and not yet drained.
    pub fn is_available(&self) -> bool {
        !self.drained && !self.reader.is_terminal()
    }

    /// Reads every non-empty line, or `None` when stdin is a terminal or
    /// was already drained.
    pub fn take_lines(&mut self) -> Result<Option<Vec<String>>, InputError> {
        if !self.is_available() {
            return Ok(None);
        }
        self.drained = true;
        let content = self.reader.read_to_string().map_err(InputError::StdinFailed)?;
        let lines: Vec<String> = content
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        debug!(lines = lines.len(), "drained piped input");
        Ok(Some(lines))
    }
}

impl Default for PipedInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockStdin;

    #[test]
    fn terminal_yields_nothing() {
        let mut input = PipedInput::with_reader(Arc::new(MockStdin::terminal()));
        assert!(!input.is_available());
        assert_eq!(input.take_lines().unwrap(), None);
    }

    #[test]
    fn drains_once() {
        let mut input = PipedInput::with_reader(Arc::new(MockStdin::piped("yellow\r\norange\n\n")));
        assert_eq!(
            input.take_lines().unwrap(),
            Some(vec!["yellow".to_string(), "orange".to_string()])
        );
        assert!(!input.is_available());
        assert_eq!(input.take_lines().unwrap(), None);
    }
}
