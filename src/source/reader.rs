//! Background line readers.
//!
//! Lines are grouped into entries by [`LineAssembler`]. A head line is held
//! until its entry is known to be complete: the next head, a blank line, end
//! of input, or (for live sources) [`IDLE_FLUSH`] without new input.

use super::LineAssembler;
use crate::console::LogSender;
use crate::model::{InputError, NewEntry};
use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// Name of the thread assembling entries.
pub const READER_THREAD_NAME: &str = "diagcon-reader";

/// Name of the thread doing the blocking reads.
pub const LINES_THREAD_NAME: &str = "diagcon-lines";

/// How long a live source may stay quiet before the held entry is sent.
pub const IDLE_FLUSH: Duration = Duration::from_millis(100);

/// Sends assembled entries, counting them.
struct EntryForwarder<'a> {
    assembler: LineAssembler,
    sender: &'a LogSender,
    sent: usize,
}

impl<'a> EntryForwarder<'a> {
    fn new(sender: &'a LogSender) -> Self {
        Self {
            assembler: LineAssembler::new(),
            sender,
            sent: 0,
        }
    }

    /// Returns `false` once the console is gone.
    fn line(&mut self, line: &str) -> bool {
        match self.assembler.feed(line) {
            Some(entry) => self.send(entry),
            None => true,
        }
    }

    /// Send the held entry. Returns `false` once the console is gone.
    fn flush(&mut self) -> bool {
        match self.assembler.finish() {
            Some(entry) => self.send(entry),
            None => true,
        }
    }

    fn send(&mut self, entry: NewEntry) -> bool {
        if !self.sender.send_entry(entry) {
            return false;
        }
        self.sent += 1;
        true
    }
}

/// Next line without its line ending, invalid UTF-8 replaced. `None` at EOF.
fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Read lines until EOF, sending one entry per head line.
///
/// Invalid UTF-8 is replaced rather than rejected. Stops early, without
/// error, once the console has been dropped.
///
/// Returns the number of entries sent.
///
/// # Errors
///
/// [`InputError::Io`] if reading fails.
pub fn read_lines<R: Read>(reader: R, sender: &LogSender) -> Result<usize, InputError> {
    let mut reader = BufReader::new(reader);
    let mut forwarder = EntryForwarder::new(sender);
    let mut buf = Vec::new();

    while let Some(line) = next_line(&mut reader, &mut buf)? {
        if !forwarder.line(&line) {
            return Ok(forwarder.sent);
        }
    }
    forwarder.flush();
    Ok(forwarder.sent)
}

/// Assemble entries from lines arriving on `lines` until the channel closes.
///
/// The held entry is sent once `idle` passes without a new line, so the last
/// line of a live stream shows up without waiting for the next one.
///
/// Returns the number of entries sent, or `None` if the console was dropped.
pub fn forward_lines(lines: &Receiver<String>, sender: &LogSender, idle: Duration) -> Option<usize> {
    let mut forwarder = EntryForwarder::new(sender);
    loop {
        let delivered = match lines.recv_timeout(idle) {
            Ok(line) => forwarder.line(&line),
            Err(RecvTimeoutError::Timeout) => forwarder.flush(),
            Err(RecvTimeoutError::Disconnected) => {
                return forwarder.flush().then_some(forwarder.sent);
            }
        };
        if !delivered {
            return None;
        }
    }
}

fn pump_lines<R: Read>(reader: R, lines: &Sender<String>) -> Result<usize, InputError> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut read = 0;
    while let Some(line) = next_line(&mut reader, &mut buf)? {
        if lines.send(line).is_err() {
            break;
        }
        read += 1;
    }
    Ok(read)
}

/// Read `reader` on background threads and forward its entries.
///
/// One thread blocks on reads and hands lines over a channel; the other
/// assembles entries and flushes a held entry after [`IDLE_FLUSH`]. The
/// returned handle is the assembling thread, which finishes after the input
/// does. A read failure is logged at `error`, which [`ConsoleLayer`] mirrors
/// into the console when installed.
///
/// [`ConsoleLayer`]: crate::logging::ConsoleLayer
///
/// # Errors
///
/// [`InputError::Spawn`] if a thread cannot be started.
pub fn spawn_reader<R>(
    reader: R,
    label: String,
    sender: LogSender,
) -> Result<JoinHandle<()>, InputError>
where
    R: Read + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::channel();
    let lines = thread::Builder::new()
        .name(LINES_THREAD_NAME.to_string())
        .spawn(move || pump_lines(reader, &line_tx))
        .map_err(InputError::Spawn)?;

    thread::Builder::new()
        .name(READER_THREAD_NAME.to_string())
        .spawn(move || {
            let Some(entries) = forward_lines(&line_rx, &sender, IDLE_FLUSH) else {
                debug!(source = %label, "Console closed; reader stopped");
                return;
            };
            match lines.join() {
                Ok(Ok(lines)) => info!(source = %label, lines, entries, "Input finished"),
                Ok(Err(err)) => error!(source = %label, error = %err, "Input failed"),
                Err(_) => error!(source = %label, "Line reader panicked"),
            }
        })
        .map_err(InputError::Spawn)
}
