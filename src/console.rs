use std::io::{self, Write};

/// Output sink reached through `JSR` to the print address.
pub trait Console {
    fn putc(&mut self, byte: u8) -> io::Result<()>;
}

/// Writes each byte to stdout as a character.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn putc(&mut self, byte: u8) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", byte as char)?;
        stdout.flush()
    }
}

/// Collects emitted bytes in memory.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    pub output: Vec<u8>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_string(&self) -> String {
        self.output.iter().map(|&b| b as char).collect()
    }
}

impl Console for BufferConsole {
    fn putc(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }
}

