//! Geometry optimization convergence tables in Gaussian log files

use std::{
    cmp::Ordering,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::OnceLock,
};

use regex::Regex;

use crate::Error;

/// the value recorded for an item Gaussian printed as asterisks because it
/// overflowed its field
pub const OVERFLOW_VALUE: f64 = 9.999999;

/// the convergence penalty for each overflowed item
pub const OVERFLOW_PENALTY: f64 = 2000.0;

pub const CSV_HEADER: [&str; 8] = [
    "File",
    "step_number",
    "Max Force",
    "RMS Force",
    "Max Displacement",
    "RMS Displacement",
    "Convergence",
    "Convergence_Error",
];

static CELL: OnceLock<[Regex; 2]> = OnceLock::new();

fn patterns() -> &'static [Regex; 2] {
    CELL.get_or_init(|| {
        [
            Regex::new(r"^Step number\s+(\d+)").unwrap(),
            Regex::new(r"^Item\s+Value\s+Threshold\s+Converged\?").unwrap(),
        ]
    })
}

/// The convergence table printed after one optimization step:
///
/// ```text
///          Item               Value     Threshold  Converged?
///  Maximum Force            0.000123     0.000450     YES
///  RMS     Force            0.000045     0.000300     YES
///  Maximum Displacement     0.001234     0.001800     YES
///  RMS     Displacement     0.000567     0.001200     YES
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StepConvergence {
    pub step: usize,
    pub max_force: f64,
    pub rms_force: f64,
    pub max_displ: f64,
    pub rms_displ: f64,
    /// the sum of each value divided by its threshold
    pub convergence: f64,
    /// whether any value exceeded its threshold or overflowed
    pub error: bool,
}

/// one row of the table: its value, its contribution to the convergence,
/// and whether it is out of bounds
fn parse_item(line: &str) -> Result<(f64, f64, bool), Error> {
    let fields: Vec<_> = line.split_whitespace().collect();
    let [_, _, value, threshold, ..] = fields[..] else {
        return Err(Error::InvalidData(format!(
            "incomplete convergence table line '{line}'"
        )));
    };
    if value.contains('*') {
        return Ok((OVERFLOW_VALUE, OVERFLOW_PENALTY, true));
    }
    let num = |s: &str| -> Result<f64, Error> {
        s.parse().map_err(|_| {
            Error::InvalidData(format!(
                "failed to parse '{s}' from convergence line '{line}'"
            ))
        })
    };
    let value = num(value)?;
    let ratio = value / num(threshold)?;
    Ok((value, ratio, ratio > 1.0))
}

/// collect the convergence table of every optimization step in `r`, stopping
/// after step `last_step` if it is given. a repeated step number, as in a
/// scan that restarts its count, is renumbered to follow the previous step.
/// a table interrupted before its fourth row is dropped
pub fn scan(
    r: impl BufRead,
    last_step: Option<usize>,
) -> Result<Vec<StepConvergence>, Error> {
    let [step_re, header] = patterns();
    let mut ret: Vec<StepConvergence> = Vec::new();
    let mut step = None;
    let mut table: Option<Vec<(f64, f64, bool)>> = None;
    for line in r.lines() {
        let line = line.map_err(|e| {
            Error::InvalidData(format!("failed to read line with {e}"))
        })?;
        let line = line.trim();
        if let Some(items) = &mut table {
            if line.starts_with("Maximum") || line.starts_with("RMS") {
                items.push(parse_item(line)?);
                if items.len() < 4 {
                    continue;
                }
                let next = ret.last().map_or(1, |s| s.step + 1);
                let mut num = step.take().unwrap_or(next);
                if ret.iter().any(|s| s.step == num) {
                    num = next;
                }
                let [max_force, rms_force, max_displ, rms_displ] =
                    [0, 1, 2, 3].map(|i| items[i].0);
                ret.push(StepConvergence {
                    step: num,
                    max_force,
                    rms_force,
                    max_displ,
                    rms_displ,
                    convergence: items.iter().map(|i| i.1).sum(),
                    error: items.iter().any(|i| i.2),
                });
                table = None;
                if last_step == Some(num) {
                    break;
                }
                continue;
            }
            log::debug!("incomplete convergence table ended by '{line}'");
            table = None;
        }
        if let Some(c) = step_re.captures(line) {
            step = c[1].parse().ok();
        } else if header.is_match(line) {
            table = Some(Vec::with_capacity(4));
        }
    }
    Ok(ret)
}

/// [scan] the file at `path`
pub fn load(
    path: impl AsRef<Path>,
    last_step: Option<usize>,
) -> Result<Vec<StepConvergence>, Error> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    scan(BufReader::new(f), last_step).map_err(|e| match e {
        Error::InvalidData(msg) => {
            Error::InvalidData(format!("{msg} in file {}", path.display()))
        }
        e => e,
    })
}

/// up to `n` of `steps`, best converged first. ties keep their file order
pub fn best(steps: &[StepConvergence], n: usize) -> Vec<&StepConvergence> {
    let mut ret: Vec<_> = steps.iter().collect();
    ret.sort_by(|a, b| {
        a.convergence
            .partial_cmp(&b.convergence)
            .unwrap_or(Ordering::Equal)
    });
    ret.truncate(n);
    ret
}

/// `True` or `False`, the way the convergence reports spell them
pub fn flag(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

impl StepConvergence {
    /// the fields of [CSV_HEADER] for this step of `file`, rounded to six
    /// decimal places
    pub fn csv_row(&self, file: &str) -> Vec<String> {
        let mut ret = vec![file.to_owned(), self.step.to_string()];
        ret.extend(
            [
                self.max_force,
                self.rms_force,
                self.max_displ,
                self.rms_displ,
                self.convergence,
            ]
            .map(|x| round6(x).to_string()),
        );
        ret.push(flag(self.error).to_owned());
        ret
    }
}
