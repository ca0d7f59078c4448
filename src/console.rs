//! # Console
//!
//! Line-oriented terminal I/O over any `BufRead` + `Write` pair.
//!
//! Menu selections are read as whitespace-separated tokens (several may sit
//! on one line); free text such as a name is read as a whole line. Tokens
//! left over after a rejected selection are discarded with the rest of
//! their line.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use log::debug;
use thiserror::Error;

pub const RETRY_PROMPT: &str = "invalid input, retry";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),
    /// The input stream reached end-of-file.
    #[error("input closed")]
    Closed,
}

pub struct Console<R, W> {
    reader: R,
    writer: W,
    pending: VecDeque<String>,
}

impl Console<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            pending: VecDeque::new(),
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn println(&mut self, line: impl AsRef<str>) -> Result<(), ConsoleError> {
        writeln!(self.writer, "{}", line.as_ref())?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<(), ConsoleError> {
        self.println("")
    }

    /// Reads one raw line, without the trailing newline.
    ///
    /// Bytes that are not UTF-8 are replaced, so garbled input reaches the
    /// retry path instead of failing the read.
    fn next_line(&mut self) -> Result<String, ConsoleError> {
        self.writer.flush()?;
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(ConsoleError::Closed);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn next_token(&mut self) -> Result<String, ConsoleError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let line = self.next_line()?;
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Blocks until an integer in `0..=max` is entered.
    pub fn read_selection(&mut self, max: usize) -> Result<usize, ConsoleError> {
        loop {
            let token = self.next_token()?;
            match token.parse::<usize>() {
                Ok(selection) if selection <= max => return Ok(selection),
                _ => {
                    debug!("Rejected selection {token:?} (valid: 0..={max})");
                    self.pending.clear();
                    self.println(RETRY_PROMPT)?;
                }
            }
        }
    }

    /// Reads a non-blank line of free text, trimmed.
    ///
    /// Tokens still pending from the current line are returned first.
    pub fn read_line(&mut self) -> Result<String, ConsoleError> {
        if !self.pending.is_empty() {
            let rest: Vec<String> = self.pending.drain(..).collect();
            return Ok(rest.join(" "));
        }
        loop {
            let line = self.next_line()?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
    }
}
