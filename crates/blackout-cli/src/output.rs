//! Redacted file output and the statistics sink

use anyhow::Context;
use blackout_core::Statistics;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Writes to a temporary sibling file and renames it over the target on commit.
///
/// Dropping the writer without committing removes the temporary file.
pub struct AtomicWriter {
    temp_path: PathBuf,
    final_path: PathBuf,
    file: Option<File>,
}

impl AtomicWriter {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let final_path = path.as_ref().to_path_buf();

        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = Self::temp_path(&final_path);
        let file = File::create(&temp_path)?;

        Ok(Self {
            temp_path,
            final_path,
            file: Some(file),
        })
    }

    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(data),
            None => Err(io::Error::other("writer already committed")),
        }
    }

    pub fn commit(mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&self.temp_path, &self.final_path)
    }

    fn temp_path(final_path: &Path) -> PathBuf {
        let mut temp = final_path.as_os_str().to_owned();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        // Gone already after a successful rename
        let _ = fs::remove_file(&self.temp_path);
    }
}

/// Write `data` to `path` through an [`AtomicWriter`]
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut writer = AtomicWriter::new(path)?;
    writer.write(data)?;
    writer.commit()
}

/// `<output_dir>/<input file name><suffix>`
pub fn output_path(output_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    output_dir.join(format!("{file_name}{suffix}"))
}

/// Output path for `input` that is not in `taken`.
///
/// The first file with a given name gets the plain `output_path`; later ones get a ` (n)`
/// marker before the suffix, counting from 2.
pub fn unique_output_path(
    output_dir: &Path,
    input: &Path,
    suffix: &str,
    taken: &HashSet<PathBuf>,
) -> PathBuf {
    let mut path = output_path(output_dir, input, suffix);
    let mut n = 1;
    while taken.contains(&path) {
        n += 1;
        path = output_path(output_dir, input, &format!(" ({n}){suffix}"));
    }
    path
}

/// Where the run statistics go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsSink {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl FromStr for StatsSink {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "stdout" => StatsSink::Stdout,
            "stderr" => StatsSink::Stderr,
            _ => StatsSink::File(PathBuf::from(shellexpand::tilde(s).into_owned())),
        })
    }
}

impl StatsSink {
    /// Serialize the statistics as pretty JSON to this sink
    pub fn write(&self, statistics: &Statistics) -> anyhow::Result<()> {
        let mut json = serde_json::to_string_pretty(statistics)?;
        json.push('\n');

        match self {
            StatsSink::Stdout => io::stdout()
                .lock()
                .write_all(json.as_bytes())
                .context("writing statistics to stdout")?,
            StatsSink::Stderr => io::stderr()
                .lock()
                .write_all(json.as_bytes())
                .context("writing statistics to stderr")?,
            StatsSink::File(path) => write_atomic(path, json.as_bytes())
                .with_context(|| format!("writing statistics to {}", path.display()))?,
        }

        Ok(())
    }
}
