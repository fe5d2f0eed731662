//! Streaming the geometry steps out of a Gaussian log file

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    Error,
    section::{CoordRow, Line, Section},
};

/// One atom from an orientation table, with its element already resolved
#[derive(Clone, Debug, PartialEq)]
pub struct LogAtom {
    pub element: &'static str,
    pub xyz: [f64; 3],
}

impl TryFrom<CoordRow> for LogAtom {
    type Error = Error;

    fn try_from(row: CoordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            element: row.element()?,
            xyz: row.xyz,
        })
    }
}

/// The coordinates of one geometry step and the energy line that closed it
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub atoms: Vec<LogAtom>,
    /// the trimmed energy marker line, if one has been seen
    pub remark: Option<String>,
}

/// Feeds lines through the [Section] state machine, collecting the rows of
/// the current orientation table
#[derive(Debug, Default)]
pub struct SectionParser {
    section: Section,
    atoms: Vec<LogAtom>,
    remark: Option<String>,
}

impl SectionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// process a single raw line. returns a [Record] when `line` is an energy
    /// marker closing a step that had coordinates
    pub fn feed(&mut self, line: &str) -> Result<Option<Record>, Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let line = Line::classify(line);
        let next = self.section.next(&line);
        if self.section.starts_table(next) {
            self.atoms.clear();
        }
        let mut ret = None;
        match line {
            Line::Coord(row) if next == Section::Atoms => {
                self.atoms.push(row.try_into()?);
            }
            Line::Marker(m) => {
                self.remark = Some(m.to_owned());
                if !self.atoms.is_empty() {
                    ret = Some(Record {
                        atoms: self.atoms.clone(),
                        remark: self.remark.clone(),
                    });
                }
            }
            _ => {}
        }
        self.section = next;
        Ok(ret)
    }

    /// the most recent coordinates and energy line at the end of the file,
    /// or `None` if no coordinates were ever found
    pub fn finish(self) -> Option<Record> {
        if self.atoms.is_empty() {
            return None;
        }
        Some(Record {
            atoms: self.atoms,
            remark: self.remark,
        })
    }
}

/// Whether [scan] should keep going after handing off a record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// run every line of `r` through a [SectionParser], calling `f` on each
/// record as soon as it is closed. returns the parser's final state for
/// callers that only want the last coordinates
pub fn scan<R, F>(r: R, mut f: F) -> Result<Option<Record>, Error>
where
    R: BufRead,
    F: FnMut(Record) -> Result<Flow, Error>,
{
    let mut parser = SectionParser::new();
    for line in r.lines() {
        let line = line.map_err(|e| {
            Error::InvalidData(format!("failed to read line with {e}"))
        })?;
        if let Some(rec) = parser.feed(&line)? {
            if f(rec)? == Flow::Stop {
                return Ok(None);
            }
        }
    }
    Ok(parser.finish())
}

/// [scan] the file at `path`
pub fn scan_file<F>(path: impl AsRef<Path>, f: F) -> Result<Option<Record>, Error>
where
    F: FnMut(Record) -> Result<Flow, Error>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    log::debug!("scanning {}", path.display());
    scan(BufReader::new(file), f)
}

/// collect every record in `path` along with the final coordinates
pub fn read_records(
    path: impl AsRef<Path>,
) -> Result<(Vec<Record>, Option<Record>), Error> {
    let mut records = Vec::new();
    let last = scan_file(path, |rec| {
        records.push(rec);
        Ok(Flow::Continue)
    })?;
    Ok((records, last))
}
