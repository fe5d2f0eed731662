//! Resolving the set of files a utility should process, naming its outputs,
//! and writing them

use std::{
    fmt::Display,
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::Error;

/// Read `list`, returning one path per non-blank line in file order.
/// Surrounding whitespace is trimmed and duplicates are kept
pub fn read_list(list: impl AsRef<Path>) -> Result<Vec<PathBuf>, Error> {
    let list = list.as_ref();
    let f = File::open(list).map_err(|e| Error::io(list, e))?;
    let mut ret = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line.map_err(|e| Error::io(list, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        ret.push(PathBuf::from(line));
    }
    Ok(ret)
}

/// Combine the contents of the optional `list` file with the optional single
/// `file`, which goes last. Every resulting path must exist: missing files are
/// all reported in a single [Error::Io]. Having nothing to process at all is
/// an [Error::Input]
pub fn gather(
    file: Option<&Path>,
    list: Option<&Path>,
) -> Result<Vec<PathBuf>, Error> {
    let mut files = match list {
        Some(list) => read_list(list)?,
        None => Vec::new(),
    };
    if let Some(file) = file {
        files.push(file.to_path_buf());
    }
    if files.is_empty() {
        return Err(Error::Input(String::from(
            "No files to process: no single file specified and no list of \
             files found",
        )));
    }
    check_exist(&files)?;
    log::debug!("gathered {} files", files.len());
    Ok(files)
}

/// return an error naming every path in `files` that is not a readable file
pub fn check_exist(files: &[PathBuf]) -> Result<(), Error> {
    let mut missing: Vec<_> = files
        .iter()
        .filter(|f| !f.is_file())
        .map(|f| f.display().to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    missing.dedup();
    Err(Error::Io(
        format!(
            "Could not find the following file(s):\n    {}",
            missing.join("\n    ")
        ),
        std::io::ErrorKind::NotFound,
    ))
}

/// Build an output name from `src` by swapping its extension for `ext`, which
/// should include any leading dot or separator (".pdb", "_opt.com"). The new
/// file goes in `dir` if one is given and next to `src` otherwise
pub fn out_fname(
    src: impl AsRef<Path>,
    ext: &str,
    dir: Option<&Path>,
) -> PathBuf {
    let src = src.as_ref();
    let mut name = src.file_stem().unwrap_or_default().to_os_string();
    name.push(ext);
    match dir {
        Some(dir) => dir.join(name),
        None => src.with_file_name(name),
    }
}

/// Whether [write_lines] should replace or extend an existing file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Write,
    Append,
}

/// write each entry of `lines` followed by a newline to `path`
pub fn write_lines<I>(lines: I, path: &Path, mode: Mode) -> Result<(), Error>
where
    I: IntoIterator,
    I::Item: Display,
{
    let f = match mode {
        Mode::Write => File::create(path),
        Mode::Append => {
            OpenOptions::new().create(true).append(true).open(path)
        }
    }
    .map_err(|e| Error::io(path, e))?;
    let mut w = BufWriter::new(f);
    for line in lines {
        writeln!(w, "{line}").map_err(|e| Error::io(path, e))?;
    }
    w.flush().map_err(|e| Error::io(path, e))
}

/// join `fields` into one CSV line. a field containing a separator, a quote
/// or a line break is quoted, with any quotes inside it doubled
pub fn csv_line<I>(fields: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let quoted: Vec<_> = fields
        .into_iter()
        .map(|field| {
            let field = field.as_ref();
            if field.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                field.to_owned()
            }
        })
        .collect();
    quoted.join(",")
}
