use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Line-based console over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one line without its terminator. `None` means end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.output.flush().context("Failed to flush console output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read console input")?;

        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn say(&mut self, message: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", message.as_ref()).context("Failed to write console output")
    }

    pub fn prompt(&mut self, message: impl AsRef<str>) -> Result<Option<String>> {
        self.say(message)?;
        self.read_line()
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
