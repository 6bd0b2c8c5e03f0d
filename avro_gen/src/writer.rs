/* Output sink for generated files */

use crate::errors::{GenError, GenResult};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/* Upper bound on the text produced by one formatted write */
pub const LINE_BUFFER_SIZE: usize = 4096;

/* Writes formatted text to a file, one bounded chunk at a time. Implements
 * `write_fmt`, so `write!` and `writeln!` work and return `GenResult`. */
pub struct LineWriter<W: Write = BufWriter<File>> {
  path: PathBuf,
  out: W,
  line: String,
}

impl LineWriter {
  pub fn create(path: &Path) -> GenResult<Self> {
    let file = File::create(path).map_err(|source| GenError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Self::new(path, BufWriter::new(file)))
  }
}

impl<W: Write> LineWriter<W> {
  pub fn new(path: &Path, out: W) -> Self {
    Self {
      path: path.to_path_buf(),
      out,
      line: String::with_capacity(LINE_BUFFER_SIZE),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> GenResult<()> {
    self.line.clear();
    fmt::write(&mut self.line, args).map_err(|_| GenError::Io {
      path: self.path.clone(),
      source: std::io::Error::other("formatting failed"),
    })?;
    if self.line.len() >= LINE_BUFFER_SIZE {
      return Err(GenError::LineOverflow {
        len: self.line.len(),
        limit: LINE_BUFFER_SIZE,
      });
    }
    self.out.write_all(self.line.as_bytes()).map_err(|source| GenError::Io {
      path: self.path.clone(),
      source,
    })
  }

  pub fn finish(mut self) -> GenResult<W> {
    self.out.flush().map_err(|source| GenError::Io {
      path: self.path.clone(),
      source,
    })?;
    Ok(self.out)
  }
}
