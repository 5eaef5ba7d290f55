use crate::output::traits::{VisitSink, WriteMode};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Newline-delimited text file sink, one URL per line
pub struct TextFileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl TextFileSink {
    /// Opens the output file, creating it if needed
    ///
    /// `WriteMode::Truncate` empties an existing file; `WriteMode::Append`
    /// keeps its contents.
    pub fn open(path: &Path, mode: WriteMode) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Truncate => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };

        let file = options.open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of URLs written through this sink
    pub fn written(&self) -> usize {
        self.written
    }
}

impl VisitSink for TextFileSink {
    fn append(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", url)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_one_url_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("visited_links.txt");

        let mut sink = TextFileSink::open(&path, WriteMode::Truncate).unwrap();
        sink.append("https://a.test/").unwrap();
        sink.append("https://a.test/b").unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.written(), 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://a.test/\nhttps://a.test/b\n");
    }

    #[test]
    fn test_truncate_replaces_previous_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "https://old.test/\n").unwrap();

        let mut sink = TextFileSink::open(&path, WriteMode::Truncate).unwrap();
        sink.append("https://new.test/").unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://new.test/\n");
    }

    #[test]
    fn test_append_keeps_previous_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "https://old.test/\n").unwrap();

        let mut sink = TextFileSink::open(&path, WriteMode::Append).unwrap();
        sink.append("https://new.test/").unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://old.test/\nhttps://new.test/\n");
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(TextFileSink::open(&path, WriteMode::Truncate).is_err());
    }
}
