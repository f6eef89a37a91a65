use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const TASK_DONE: Color = Color::Cyan;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Prompts for numeric input on a line-oriented reader.
pub struct Terminal<R> {
    input: R,
}

impl Terminal<io::StdinLock<'static>> {
    /// Terminal reading from the process's stdin.
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Terminal<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Print the startup banner.
    pub fn print_banner(&self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("tempo"),
            ResetColor,
            Print(" - timed task scheduler\n"),
            SetForegroundColor(Colors::DIM),
            Print("Tasks run once their delay has elapsed, earliest first.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Prompt until the user enters a non-negative integer.
    ///
    /// Invalid input is reported and re-prompted; end of input is an error.
    pub fn prompt_number(&mut self, prompt: &str) -> Result<u64> {
        loop {
            let mut stdout = io::stdout();
            execute!(
                stdout,
                SetForegroundColor(Colors::PROMPT),
                Print(prompt),
                ResetColor,
            )?;
            stdout.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                bail!("input ended before all values were entered");
            }
            match parse_number(&line) {
                Some(n) => return Ok(n),
                None => print_error(&format!("'{}' is not a non-negative integer", line.trim()))?,
            }
        }
    }
}

fn parse_number(line: &str) -> Option<u64> {
    line.trim().parse().ok()
}

/// Announce that a task has run.
pub fn print_task_completed(number: usize) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::TASK_DONE),
        Print(format!("Task {} completed!\n", number)),
        ResetColor,
    )?;
    stdout.flush()?;
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::ERROR),
        Print(format!("Error: {}\n", msg)),
        ResetColor,
    )?;
    stdout.flush()?;
    Ok(())
}

/// Print an info message.
pub fn print_info(msg: &str) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::DIM),
        Print(format!("{}\n", msg)),
        ResetColor,
    )?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn parse_number_trims() {
        assert_eq!(parse_number(" 42 \n"), Some(42));
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("-1"), None);
        assert_eq!(parse_number("three"), None);
    }

    #[test]
    fn prompt_skips_invalid_lines() {
        let mut term = Terminal::new(Cursor::new("abc\n-4\n7\n"));
        assert_eq!(term.prompt_number("n: ").unwrap(), 7);
    }

    #[test]
    fn prompt_fails_on_eof() {
        let mut term = Terminal::new(Cursor::new("x\n"));
        assert!(term.prompt_number("n: ").is_err());
    }
}
