//! Command-line plumbing shared by the Gaussian wrangling utilities

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, error::ErrorKind};
use gauss::{
    Error,
    error::{GOOD_RET, INPUT_ERROR},
    files::{self, Mode},
};

pub mod config;

/// parse the command line into `T`. requests for help or the version are
/// printed and turned into a successful exit code, and any other problem with
/// the arguments is an input error
pub fn parse_args<T: Parser>() -> Result<T, ExitCode> {
    T::try_parse().map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                ExitCode::from(GOOD_RET)
            }
            _ => ExitCode::from(INPUT_ERROR),
        }
    })
}

/// print `msg` to stderr, where it is visible without `RUST_LOG`
pub fn warning(msg: impl Display) {
    eprintln!("WARNING: {msg}");
}

/// describe `e` on stderr and return the matching exit code
pub fn report(e: &Error) -> ExitCode {
    match e {
        Error::Input(_) => warning(e),
        Error::Io(..) => warning(format_args!("Problems reading file: {e}")),
        Error::InvalidData(_) => {
            warning(format_args!("Problems reading data: {e}"))
        }
    }
    ExitCode::from(e.code())
}

pub fn finish(res: Result<(), Error>) -> ExitCode {
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// `path` if it names an existing file. used for default list and config
/// files that are only read when present
pub fn if_exists(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    path.is_file().then(|| path.to_path_buf())
}

/// An output file that is truncated on its first write and appended to
/// afterward
#[derive(Debug)]
pub struct OutFile {
    path: PathBuf,
    mode: Mode,
}

impl OutFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: Mode::Write,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// write `lines`, announcing the file name the first time
    pub fn write<I>(&mut self, lines: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        files::write_lines(lines, &self.path, self.mode)?;
        if self.mode == Mode::Write {
            println!("Wrote file: {}", self.path.display());
            self.mode = Mode::Append;
        }
        Ok(())
    }
}

/// create `dir` and any missing parents
pub fn make_dir(dir: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn out_file_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.pdb");
        std::fs::write(&path, "stale\n").unwrap();
        let mut out = OutFile::new(&path);
        out.write(["first"]).unwrap();
        out.write(["second"]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn exists() {
        assert!(if_exists("Cargo.toml").is_some());
        assert!(if_exists("not_here.toml").is_none());
        assert!(if_exists("src").is_none());
    }
}
