//! Byte-counting output destination.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Where transcriptions are written.
///
/// Tracks how many bytes have been written so checkpoints can record the
/// output length at each batch boundary.
pub struct OutputSink {
    writer: Box<dyn Write>,
    bytes: u64,
}

impl OutputSink {
    /// Write to an arbitrary writer, starting at byte zero.
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, bytes: 0 }
    }

    /// Write to standard output.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    /// Reopen `path` for a resumed run.
    ///
    /// Anything past `offset` was written after the last checkpoint and is cut
    /// off, so the resumed run appends exactly where the checkpoint left off.
    pub fn resume(path: &Path, offset: u64) -> io::Result<Self> {
        let mut file = OpenOptions::new().write(true).open(path)?;
        file.set_len(offset)?;
        file.seek(SeekFrom::End(0))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            bytes: offset,
        })
    }

    /// Append `text`.
    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.bytes += text.len() as u64;
        Ok(())
    }

    /// Flush buffered output to the destination.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Total bytes in the destination after the last write.
    pub fn position(&self) -> u64 {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_counts_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut sink = OutputSink::create(&path).unwrap();
        sink.write_str("héllo\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.position(), 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), "héllo\n");
    }

    #[test]
    fn test_resume_truncates_to_offset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "kept\npartial batch").unwrap();

        let mut sink = OutputSink::resume(&path, 5).unwrap();
        assert_eq!(sink.position(), 5);
        sink.write_str("next\n").unwrap();
        sink.flush().unwrap();
        drop(sink);

        assert_eq!(fs::read_to_string(&path).unwrap(), "kept\nnext\n");
    }

    #[test]
    fn test_resume_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(OutputSink::resume(&dir.path().join("missing"), 0).is_err());
    }
}
