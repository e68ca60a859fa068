use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    log::{log_error::SinkError, log_sink::LogSink, message_handle::LogMessagePtr},
    util::time,
};

// -----------------------------------------------------------------------------
// COMPILE-TIME CONFIGURATION
// -----------------------------------------------------------------------------

/// Flush to disk every 100 lines if debugging/tracing (to see crashes near real-time).
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 100;

/// Flush to disk every 1000 lines in production/default (to save I/O & CPU).
#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 1_000;

// -----------------------------------------------------------------------------

/// Sink that appends one line per record to a per-process log file.
///
/// Output is buffered and pushed to disk on every pipeline flush, every
/// `FLUSH_BATCH_SIZE` lines, and when the sink is dropped.
pub struct FileSink {
    out: BufWriter<Box<dyn Write + Send>>,
    file_path: PathBuf,
    lines_written: u32,
}

impl FileSink {
    /// Opens a fresh log file in `dir`.
    ///
    /// This function:
    /// 1. Creates the target directory if it is missing.
    /// 2. Generates a unique filename based on the timestamp and process ID (PID).
    /// 3. Falls back to a file in the temp dir, then to a discarding writer.
    ///    It never panics.
    ///
    /// # Example Filename
    /// `logs/rustylog-20251102_023045-pid1234.log`
    pub fn create<D: AsRef<Path>>(dir: D, prefix: &str) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let ts = time::timestamp_for_filename();
        let pid = std::process::id();
        let fname = if prefix.is_empty() {
            format!("{ts}-pid{pid}.log")
        } else {
            format!("{prefix}-{ts}-pid{pid}.log")
        };
        let wanted = dir.join(&fname);

        // Try target file -> temp file -> sink (never panic).
        let candidates = [wanted.clone(), std::env::temp_dir().join(&fname)];
        let (writer, file_path): (Box<dyn Write + Send>, PathBuf) = match open_first(&candidates)
        {
            Some((f, path)) => (Box::new(f), path),
            None => {
                eprintln!(
                    "[FileSink] cannot open {} nor its temp-dir fallback, records are discarded",
                    wanted.display()
                );
                (Box::new(io::sink()), wanted)
            }
        };

        Self {
            out: BufWriter::new(writer),
            file_path,
            lines_written: 0,
        }
    }

    /// Returns the path of the log file.
    ///
    /// When neither the wanted file nor the temp-dir fallback could be opened
    /// this is the wanted path, which does not exist; a `[FileSink]` line on
    /// stderr reports it.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl LogSink for FileSink {
    fn receive(&mut self, message: LogMessagePtr) -> Result<(), SinkError> {
        writeln!(&mut self.out, "{}", &*message)?;
        self.lines_written = self.lines_written.wrapping_add(1);

        if self.lines_written.is_multiple_of(FLUSH_BATCH_SIZE) {
            self.out.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Opens the first candidate that accepts appends.
fn open_first(candidates: &[PathBuf]) -> Option<(fs::File, PathBuf)> {
    candidates
        .iter()
        .find_map(|path| open_append(path).ok().map(|f| (f, path.clone())))
}
