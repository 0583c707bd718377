//! Output destinations for connection diagnostics.
//!
//! A sink belongs to whoever created it. Loggers only hold a weak reference,
//! so dropping the last `SharedSink` handle stops output to it.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A writable destination for rendered log entries.
///
/// Implementations must be safe to call from any I/O thread and should
/// return promptly; errors are discarded by the logger.
pub trait LogSink: Send + Sync {
    /// Write one complete entry.
    fn write_entry(&self, entry: &[u8]) -> io::Result<()>;
}

/// Shared handle to a sink, as passed to `log_into_stream`.
pub type SharedSink = Arc<dyn LogSink>;

/// Adapts any `Write` into a sink. Entries are written whole under a lock.
#[derive(Debug)]
pub struct StreamSink<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|_| poisoned())
    }
}

impl StreamSink<std::fs::File> {
    /// Open `path` for appending, creating it if missing.
    pub fn append_to_file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl StreamSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> LogSink for StreamSink<W> {
    fn write_entry(&self, entry: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock().map_err(|_| poisoned())?;
        writer.write_all(entry)?;
        writer.flush()
    }
}

/// In-memory sink, handy for capturing diagnostics.
#[derive(Debug, Default)]
pub struct MemorySink {
    buf: Mutex<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        match self.buf.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// Written entries, one per line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().map(|buf| buf.is_empty()).unwrap_or(true)
    }
}

impl LogSink for MemorySink {
    fn write_entry(&self, entry: &[u8]) -> io::Result<()> {
        let mut buf = self.buf.lock().map_err(|_| poisoned())?;
        buf.extend_from_slice(entry);
        Ok(())
    }
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "log sink lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_sink_writes_whole_entries() {
        let sink = StreamSink::new(Vec::new());
        sink.write_entry(b"one\n").unwrap();
        sink.write_entry(b"two\n").unwrap();
        assert_eq!(sink.into_inner().unwrap(), b"one\ntwo\n");
    }

    #[test]
    fn memory_sink_splits_lines() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.write_entry(b"a\nb\n").unwrap();
        assert_eq!(sink.lines(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn file_sink_appends() {
        let path = std::env::temp_dir().join(format!("conn-addons-sink-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        StreamSink::append_to_file(&path).unwrap().write_entry(b"first\n").unwrap();
        StreamSink::append_to_file(&path).unwrap().write_entry(b"second\n").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "first\nsecond\n");
        let _ = std::fs::remove_file(&path);
    }
}
