/*!
In-memory diagnostic sink

Installs a `tracing` subscriber for the current thread that writes formatted
lines (`LEVEL message`, no timestamps) into a shared buffer, so tests can check
what the kernel logged and in which order.
*/

use anyhow::Result;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

/// Keeps the capturing subscriber active until dropped
pub struct CaptureGuard {
    pub capture: LogCapture,
    _guard: DefaultGuard,
}

impl std::ops::Deref for CaptureGuard {
    type Target = LogCapture;

    fn deref(&self) -> &LogCapture {
        &self.capture
    }
}

impl LogCapture {
    /// Start capturing debug and above on this thread
    pub fn start() -> CaptureGuard {
        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        CaptureGuard { capture, _guard: guard }
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }

    /// Index of the first line containing `needle`
    pub fn line_index(&self, needle: &str) -> Option<usize> {
        self.lines().iter().position(|line| line.contains(needle))
    }

    pub fn assert_logged(&self, needle: &str) -> Result<()> {
        if self.contains(needle) {
            return Ok(());
        }
        anyhow::bail!("expected log line containing {:?}, got:\n{}", needle, self.contents());
    }

    /// Each needle must appear on a later line than the one before it
    pub fn assert_logged_in_order(&self, needles: &[&str]) -> Result<()> {
        let lines = self.lines();
        let mut from = 0;
        for needle in needles {
            match lines[from..].iter().position(|line| line.contains(needle)) {
                Some(offset) => from += offset + 1,
                None => anyhow::bail!("{:?} not logged after line {}:\n{}", needle, from, self.contents()),
            }
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: self.buffer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_levels_and_order() {
        let logs = LogCapture::start();
        tracing::debug!("first line");
        tracing::error!("second line");

        assert!(logs.contains("DEBUG"));
        logs.assert_logged("second line").unwrap();
        logs.assert_logged_in_order(&["first", "second"]).unwrap();
        assert!(logs.assert_logged_in_order(&["second", "first"]).is_err());
    }

    #[test]
    fn test_capture_starts_empty() {
        let logs = LogCapture::start();
        assert!(logs.is_empty());
        assert_eq!(logs.line_index("anything"), None);
    }
}
