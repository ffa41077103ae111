//! Minimal logger, in the style of `fyrox-core`'s log: a process-wide
//! singleton that prints to stdout and can additionally broadcast messages
//! to registered listeners. Trimmed of `fyrox-core`'s log-file sink, which
//! doesn't belong in a library that doesn't own the process's working
//! directory.

use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// A message broadcast to every registered listener.
pub struct LogMessage {
    /// Kind of the message: information, warning or error.
    pub kind: MessageKind,
    /// The message content, without the `[INFO]`-style prefix.
    pub content: String,
    /// Time elapsed since the logger was first used.
    pub time: Duration,
}

/// A kind of message.
#[derive(Copy, Clone, PartialOrd, PartialEq, Eq, Ord, Hash, Debug)]
#[repr(u32)]
pub enum MessageKind {
    /// Informational, non-actionable message.
    Information = 0,
    /// A degraded but still usable outcome (partial path, out-of-nodes, ...).
    Warning = 1,
    /// A precondition failure or unrecoverable error.
    Error = 2,
}

impl MessageKind {
    fn as_str(self) -> &'static str {
        match self {
            MessageKind::Information => "[INFO]: ",
            MessageKind::Warning => "[WARNING]: ",
            MessageKind::Error => "[ERROR]: ",
        }
    }
}

lazy_static! {
    static ref LOG: Mutex<LogState> = Mutex::new(LogState {
        verbosity: MessageKind::Information,
        listeners: Vec::new(),
        time_origin: Instant::now(),
    });
}

/// See module docs.
struct LogState {
    verbosity: MessageKind,
    listeners: Vec<Sender<LogMessage>>,
    time_origin: Instant,
}

impl LogState {
    fn writeln_internal<S: AsRef<str>>(&mut self, kind: MessageKind, message: S) {
        let msg = message.as_ref();
        if (kind as u32) < self.verbosity as u32 {
            return;
        }
        self.listeners.retain(|listener| {
            listener
                .send(LogMessage {
                    kind,
                    content: msg.to_owned(),
                    time: Instant::now() - self.time_origin,
                })
                .is_ok()
        });
        println!("{}{}", kind.as_str(), msg);
    }
}

/// Entry point for logging within the crate; mirrors `fyrox_core::log::Log`'s
/// public API so call sites read the same way.
pub struct Log;

impl Log {
    /// Writes an informational message.
    pub fn info<S: AsRef<str>>(msg: S) {
        LOG.lock().writeln_internal(MessageKind::Information, msg)
    }

    /// Writes a warning, used for degraded-but-usable outcomes.
    pub fn warn<S: AsRef<str>>(msg: S) {
        LOG.lock().writeln_internal(MessageKind::Warning, msg)
    }

    /// Writes an error, used for precondition failures.
    pub fn err<S: AsRef<str>>(msg: S) {
        LOG.lock().writeln_internal(MessageKind::Error, msg)
    }

    /// Sets the minimum message kind that is actually emitted.
    pub fn set_verbosity(kind: MessageKind) {
        LOG.lock().verbosity = kind;
    }

    /// Registers a listener that receives a copy of every future message.
    pub fn add_listener(listener: Sender<LogMessage>) {
        LOG.lock().listeners.push(listener)
    }
}
