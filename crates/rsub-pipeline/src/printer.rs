//! Output sinks.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::PrintError;

/// Destination for converted documents.
pub trait Printer {
    fn print(&mut self, documents: &[String]) -> Result<(), PrintError>;
}

impl<P: Printer + ?Sized> Printer for Box<P> {
    fn print(&mut self, documents: &[String]) -> Result<(), PrintError> {
        (**self).print(documents)
    }
}

/// Writes each document followed by a newline to a stream.
///
/// Write errors are logged and swallowed; a closed terminal or pipe does not
/// fail the run.
pub struct StreamPrinter<W: Write> {
    writer: W,
}

/// Printer for the process's standard output.
pub type StdoutPrinter = StreamPrinter<io::Stdout>;

impl<W: Write> StreamPrinter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the printer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_all_lines(&mut self, documents: &[String]) -> io::Result<()> {
        for doc in documents {
            self.writer.write_all(doc.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()
    }
}

impl StdoutPrinter {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Printer for StreamPrinter<W> {
    fn print(&mut self, documents: &[String]) -> Result<(), PrintError> {
        if let Err(e) = self.write_all_lines(documents) {
            warn!("Failed to write output: {e}");
        }
        Ok(())
    }
}

/// Writes the raw concatenation of all documents to one file.
///
/// The file is truncated on every run. Nothing is inserted between
/// documents; the writer is flushed after each one.
pub struct FilePrinter {
    path: PathBuf,
}

impl FilePrinter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: io::Error) -> PrintError {
        PrintError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl Printer for FilePrinter {
    fn print(&mut self, documents: &[String]) -> Result<(), PrintError> {
        let file = File::create(&self.path).map_err(|source| PrintError::Create {
            path: self.path.clone(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        for doc in documents {
            writer
                .write_all(doc.as_bytes())
                .map_err(|e| self.write_error(e))?;
            writer.flush().map_err(|e| self.write_error(e))?;
        }

        info!(
            "Wrote {} document(s) to {}",
            documents.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Select the sink: a file when `out_file` is given, standard output otherwise.
pub fn printer_for(out_file: Option<&Path>) -> Box<dyn Printer> {
    match out_file {
        Some(path) => Box::new(FilePrinter::new(path)),
        None => Box::new(StdoutPrinter::stdout()),
    }
}
