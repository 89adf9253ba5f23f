use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Where log lines go. The terminal belongs to the UI, so logs either land
/// in a file or are dropped.
#[derive(Clone, Debug, Default)]
pub struct LogSink {
    file: Option<Arc<Mutex<File>>>,
}

impl LogSink {
    pub fn discard() -> Self {
        Self::default()
    }

    /// Append to `path`, creating it when missing.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Arc::new(Mutex::new(file))),
        })
    }
}

pub struct SinkWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.file {
            Some(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.file {
            Some(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            None => Ok(()),
        }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            file: self.file.clone(),
        }
    }
}

/// Initialize the global subscriber, writing to `log_file` when given and
/// discarding output otherwise. Safe to call multiple times; later calls
/// leave the first subscriber in place.
pub fn init_default(log_file: Option<&Path>) -> io::Result<()> {
    let sink = match log_file {
        Some(path) => LogSink::file(path)?,
        None => LogSink::discard(),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(sink)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui.log");
        let sink = LogSink::file(&path).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(depth = 1, "dialog shown");
        });
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("dialog shown"));
        assert!(text.contains("depth=1"));
    }

    #[test]
    fn discard_sink_swallows_writes() {
        use tracing_subscriber::fmt::MakeWriter;
        let sink = LogSink::discard();
        let mut writer = sink.make_writer();
        assert_eq!(writer.write(b"hello").unwrap(), 5);
        writer.flush().unwrap();
    }
}
