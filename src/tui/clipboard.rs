//! Clipboard writes via OSC 52.
//!
//! The terminal emulator owns the system clipboard; we only emit the escape
//! sequence. Terminals without OSC 52 support silently ignore it.

use std::io::{self, Write};

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;

/// Destination for copied text.
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Writes the OSC 52 sequence to stdout.
#[derive(Debug, Default)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, CopyToClipboard::to_clipboard_from(text))?;
        stdout.flush()
    }
}

/// Records copies in memory.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub copies: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    pub fail: bool,
}

#[cfg(test)]
impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "clipboard unavailable"));
        }
        self.copies
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}
