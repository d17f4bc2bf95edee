//! The output sink that commands and help rendering write to.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

enum Sink {
    Stdout,
    Buffer(Vec<u8>),
    Writer(Box<dyn Write + Send>),
}

/// A cloneable handle to a synchronously written sink.
///
/// Clones write to the same sink.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Output;
/// use std::io::Write;
///
/// let output = Output::buffer();
/// writeln!(output.clone(), "hello").unwrap();
/// assert_eq!(output.contents(), "hello\n");
/// ```
#[derive(Clone)]
pub struct Output {
    sink: Arc<Mutex<Sink>>,
}

impl Output {
    /// Writes to standard output.
    pub fn stdout() -> Self {
        Self::from_sink(Sink::Stdout)
    }

    /// Collects output in memory; read it back with [`contents`](Self::contents).
    pub fn buffer() -> Self {
        Self::from_sink(Sink::Buffer(Vec::new()))
    }

    /// Writes to an arbitrary writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self::from_sink(Sink::Writer(Box::new(writer)))
    }

    fn from_sink(sink: Sink) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// The text collected by a [`buffer`](Self::buffer) sink. Empty for
    /// other sinks.
    pub fn contents(&self) -> String {
        match &*self.lock() {
            Sink::Buffer(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Sink::Stdout | Sink::Writer(_) => String::new(),
        }
    }

    /// Discards collected text in a buffer sink.
    pub fn clear(&self) {
        if let Sink::Buffer(bytes) = &mut *self.lock() {
            bytes.clear();
        }
    }

    /// Writes `text` in full.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn write_text(&self, text: &str) -> io::Result<()> {
        let mut sink = self.lock();
        sink.write_all(text.as_bytes())?;
        sink.flush()
    }

    fn lock(&self) -> MutexGuard<'_, Sink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout => io::stdout().lock().write(buf),
            Self::Buffer(bytes) => bytes.write(buf),
            Self::Writer(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().flush(),
            Self::Buffer(_) => Ok(()),
            Self::Writer(writer) => writer.flush(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &*self.lock() {
            Sink::Stdout => "stdout",
            Sink::Buffer(_) => "buffer",
            Sink::Writer(_) => "writer",
        };
        f.debug_struct("Output").field("sink", &kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let a = Output::buffer();
        let mut b = a.clone();
        write!(b, "x").unwrap();
        a.write_text("y").unwrap();
        assert_eq!(a.contents(), "xy");
        a.clear();
        assert_eq!(b.contents(), "");
    }

    #[test]
    fn test_writer_sink_receives_bytes() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let output = Output::from_writer(file.reopen().unwrap());
        output.write_text("data\n").unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "data\n");
        assert_eq!(output.contents(), "");
    }
}
