use anyhow::{Context, Result, bail};
use std::io::{self, IsTerminal, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

pub struct InputReader;

impl InputReader {
    /// Returns the prompt given on the command line, or reads it from piped
    /// stdin when none was given.
    pub fn prompt(arg: Option<String>) -> Result<String> {
        if let Some(prompt) = arg.filter(|p| !p.trim().is_empty()) {
            return Ok(prompt);
        }

        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail!("No prompt given.\n\nPass it as an argument or pipe it on stdin.");
        }
        Self::read_prompt_from(stdin.lock())
    }

    fn read_prompt_from(reader: impl Read) -> Result<String> {
        let text = read_limited(reader)?;
        let prompt = text.trim();
        if prompt.is_empty() {
            bail!("Prompt is empty");
        }
        Ok(prompt.to_string())
    }
}

fn read_limited(mut reader: impl Read) -> Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut chunk)
            .context("Failed to read from stdin")?;

        if bytes_read == 0 {
            break;
        }

        buffer.extend_from_slice(&chunk[..bytes_read]);

        if buffer.len() > MAX_INPUT_SIZE {
            bail!(
                "Input size ({:.1} MB) exceeds maximum allowed size (1 MB).",
                buffer.len() as f64 / 1024.0 / 1024.0
            );
        }
    }

    String::from_utf8(buffer).context("Input is not valid UTF-8")
}
