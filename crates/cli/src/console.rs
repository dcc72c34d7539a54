use std::io::{self, Write};

use sierra_agent::handlers::CredentialPrompt;

/// Line-oriented input for the chat loop.
pub trait LineSource {
    /// `Ok(None)` signals end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads stdin one line at a time. The stdin lock is only held for a single
/// read so the order-lookup prompts can read from the same stream mid-turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinLines;

impl LineSource for StdinLines {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        read_stdin_line()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsolePrompt;

impl CredentialPrompt for ConsolePrompt {
    fn ask(&self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{question}")?;
        stdout.flush()?;
        read_stdin_line()?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed during prompt"))
    }
}

fn read_stdin_line() -> io::Result<Option<String>> {
    let mut buffer = String::new();
    if io::stdin().read_line(&mut buffer)? == 0 {
        return Ok(None);
    }
    Ok(Some(strip_line_ending(buffer)))
}

pub fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::strip_line_ending;

    #[test]
    fn only_the_terminator_is_removed() {
        assert_eq!(strip_line_ending("  hi there \n".to_string()), "  hi there ");
        assert_eq!(strip_line_ending("windows\r\n".to_string()), "windows");
        assert_eq!(strip_line_ending("no newline".to_string()), "no newline");
    }
}
