//! Console device: one-character keyboard input and screen output.
//!
//! The processor's I/O instructions operate one character at a time, so the
//! device trait is deliberately tiny. The standard implementation wraps the
//! host's stdin/stdout; tests substitute a scripted implementation.

use std::io::{Read, Write};

use crate::common::Fault;

/// A character-at-a-time console.
///
/// `read_char` blocks until input is available; both methods surface host
/// I/O failures as [`Fault::Console`] so a broken pipe halts the machine
/// like any other fault.
pub trait Console {
    /// Blocks for one character of input and returns its code point.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::Console`] when the host stream fails or reaches
    /// end of input.
    fn read_char(&mut self) -> Result<i64, Fault>;

    /// Writes one character to the screen.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::Console`] when the host stream fails.
    fn write_char(&mut self, value: i64) -> Result<(), Fault>;
}

/// Console backed by the host process's stdin and stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    /// Creates a console over the host's standard streams.
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn read_char(&mut self) -> Result<i64, Fault> {
        let mut byte = [0u8; 1];
        let read = std::io::stdin()
            .read(&mut byte)
            .map_err(|e| Fault::Console {
                message: e.to_string(),
            })?;
        if read == 0 {
            return Err(Fault::Console {
                message: "end of input on keyboard stream".to_owned(),
            });
        }
        Ok(i64::from(byte[0]))
    }

    fn write_char(&mut self, value: i64) -> Result<(), Fault> {
        // Values outside Unicode render as the replacement character
        // rather than faulting.
        let ch = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut stdout = std::io::stdout();
        write!(stdout, "{ch}").map_err(|e| Fault::Console {
            message: e.to_string(),
        })?;
        stdout.flush().map_err(|e| Fault::Console {
            message: e.to_string(),
        })
    }
}
