//! The console I/O boundary.
//!
//! Everything the runner prints or reads goes through a [`Console`], so a
//! whole run can execute in memory under test with a [`TestConsole`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use argot_input::{MockStdin, RealStdin, StdinReader};

/// Output streams and input for a run.
pub trait Console {
    /// Writes to the output stream.
    fn out(&mut self, text: &str);

    /// Writes to the error stream.
    fn err(&mut self, text: &str);

    /// Reads one line of interactive input, without the line ending.
    /// `Ok(None)` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// The stdin used for piped input.
    fn stdin(&self) -> Arc<dyn StdinReader>;

    /// True when stdin is redirected rather than a terminal.
    fn is_input_redirected(&self) -> bool {
        !self.stdin().is_terminal()
    }

    /// Whether output may carry ANSI styling.
    fn colors_enabled(&self) -> bool {
        false
    }

    fn outln(&mut self, text: &str) {
        self.out(text);
        self.out("\n");
    }

    fn errln(&mut self, text: &str) {
        self.err(text);
        self.err("\n");
    }
}

/// The process console: stdout, stderr, and stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConsole;

impl Console for SystemConsole {
    fn out(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        // a closed stdout (`| head`) is not worth failing the run over
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn err(&mut self, text: &str) {
        let styled = if console::colors_enabled_stderr() && !text.trim().is_empty() {
            console::style(text).red().for_stderr().to_string()
        } else {
            text.to_string()
        };
        let _ = io::stderr().lock().write_all(styled.as_bytes());
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn stdin(&self) -> Arc<dyn StdinReader> {
        Arc::new(RealStdin)
    }

    fn colors_enabled(&self) -> bool {
        console::colors_enabled()
    }
}

/// An in-memory console for tests.
///
/// Collects both output streams, answers prompts from a script, and can
/// simulate piped stdin.
///
/// ```
/// use argot_dispatch::{Console, TestConsole};
///
/// let mut console = TestConsole::new().with_answers(["42"]);
/// console.out("x: ");
/// assert_eq!(console.read_line().unwrap().as_deref(), Some("42"));
/// assert_eq!(console.out_text(), "x: ");
/// ```
#[derive(Debug, Clone)]
pub struct TestConsole {
    out: String,
    err: String,
    answers: VecDeque<String>,
    stdin: MockStdin,
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConsole {
    /// An interactive console with nothing piped.
    pub fn new() -> Self {
        Self {
            out: String::new(),
            err: String::new(),
            answers: VecDeque::new(),
            stdin: MockStdin::terminal(),
        }
    }

    /// Simulates stdin redirected with one line per item.
    pub fn with_piped_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stdin = MockStdin::piped_lines(lines);
        self
    }

    /// Scripted answers returned by successive `read_line` calls.
    pub fn with_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers.extend(answers.into_iter().map(Into::into));
        self
    }

    pub fn out_text(&self) -> &str {
        &self.out
    }

    pub fn err_text(&self) -> &str {
        &self.err
    }
}

impl Console for TestConsole {
    fn out(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn err(&mut self, text: &str) {
        self.err.push_str(text);
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.answers.pop_front())
    }

    fn stdin(&self) -> Arc<dyn StdinReader> {
        Arc::new(self.stdin.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_collects_streams() {
        let mut console = TestConsole::new();
        console.outln("hello");
        console.errln("oops");
        assert_eq!(console.out_text(), "hello\n");
        assert_eq!(console.err_text(), "oops\n");
    }

    #[test]
    fn test_console_piped() {
        let console = TestConsole::new().with_piped_lines(["a", "b"]);
        assert!(console.is_input_redirected());
        assert_eq!(console.stdin().read_to_string().unwrap(), "a\nb");
        assert!(!TestConsole::new().is_input_redirected());
    }

    #[test]
    fn test_console_answers_run_out() {
        let mut console = TestConsole::new().with_answers(["one"]);
        assert_eq!(console.read_line().unwrap().as_deref(), Some("one"));
        assert_eq!(console.read_line().unwrap(), None);
    }
}
