//! Common test fixtures for temperature-field tests.
//!
//! Sample files are written into a fresh temporary directory that is
//! removed when the returned [`SampleFile`] is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Three-sample file with decimal commas: x=[0,1,0], y=[0,0,1], T=[10,20,30].
pub const END_TO_END_COMMA: &str = "0,0 0,0 10,0\n1,0 0,0 20,0\n0,0 1,0 30,0\n";

/// Same samples as [`END_TO_END_COMMA`] written with decimal points.
pub const END_TO_END_DOT: &str = "0.0 0.0 10.0\n1.0 0.0 20.0\n0.0 1.0 30.0\n";

/// Five lines, two of which have the wrong field count.
pub const MIXED_ROWS: &str = "\
0 0 5
1 1
1 0 15 99
0 1 25
1 1 35
";

/// All samples on the line x = 2.
pub const VERTICAL_LINE: &str = "2 0 10\n2 1 20\n2 5 30\n";

/// A sample file living in its own temporary directory.
#[derive(Debug)]
pub struct SampleFile {
    dir: TempDir,
    path: PathBuf,
}

impl SampleFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the file, handy for writing outputs next to it.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Writes `contents` to `samples.txt` in a new temporary directory.
///
/// # Panics
///
/// Panics if the temporary directory or file cannot be created.
pub fn write_sample_file(contents: &str) -> SampleFile {
    write_named_sample_file("samples.txt", contents)
}

/// Writes `contents` to `name` in a new temporary directory.
pub fn write_named_sample_file(name: &str, contents: &str) -> SampleFile {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write sample file");
    SampleFile { dir, path }
}
