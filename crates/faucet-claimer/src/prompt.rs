//! Interactive address entry for the first run.

use crate::error::{ClaimerError, ClaimerResult};
use std::io::{BufRead, Write};

pub const ADDRESS_PROMPT: &str = "Enter your Ethereum address: ";

/// Ask for an address until a non-blank line is entered.
///
/// The entered line is trimmed. Fails with [`ClaimerError::InputClosed`] if
/// `input` reaches EOF first.
pub fn prompt_address<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> ClaimerResult<String> {
    loop {
        write!(output, "{}", ADDRESS_PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ClaimerError::InputClosed);
        }

        let address = line.trim();
        if !address.is_empty() {
            return Ok(address.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_trimmed_line() {
        let mut input = Cursor::new("  0xABC \n");
        let mut output = Vec::new();

        let address = prompt_address(&mut input, &mut output).unwrap();

        assert_eq!(address, "0xABC");
        assert_eq!(String::from_utf8(output).unwrap(), ADDRESS_PROMPT);
    }

    #[test]
    fn test_reprompts_on_blank_line() {
        let mut input = Cursor::new("\n   \n0xDEF\n");
        let mut output = Vec::new();

        let address = prompt_address(&mut input, &mut output).unwrap();

        assert_eq!(address, "0xDEF");
        assert_eq!(String::from_utf8(output).unwrap(), ADDRESS_PROMPT.repeat(3));
    }

    #[test]
    fn test_eof_is_an_error() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();

        assert!(matches!(
            prompt_address(&mut input, &mut output),
            Err(ClaimerError::InputClosed)
        ));
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut input = Cursor::new("0x123");
        let mut output = Vec::new();

        assert_eq!(prompt_address(&mut input, &mut output).unwrap(), "0x123");
    }
}
