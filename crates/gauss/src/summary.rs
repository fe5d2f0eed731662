//! Pulling the headline numbers out of a finished Gaussian log file

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::OnceLock,
};

use regex::Regex;
use serde::Serialize;

use crate::{Error, files};

static CELL: OnceLock<[Regex; 10]> = OnceLock::new();

fn patterns() -> &'static [Regex; 10] {
    CELL.get_or_init(|| {
        [
            Regex::new(r"^Stoichiometry\s+(\S+)").unwrap(),
            Regex::new(r"^Charge =\s*(-?\d+)\s+Multiplicity =\s*(\d+)")
                .unwrap(),
            Regex::new(r"^SCF Done:\s+E\(\S+\)\s+=\s+(\S+)").unwrap(),
            Regex::new(r"Tot=\s*(\S+)").unwrap(),
            Regex::new(r"^Zero-point correction=\s+(\S+)").unwrap(),
            Regex::new(r"^Sum of electronic and thermal Enthalpies=\s+(\S+)")
                .unwrap(),
            Regex::new(
                r"^Sum of electronic and thermal Free Energies=\s+(\S+)",
            )
            .unwrap(),
            Regex::new(r"^Counterpoise corrected energy =\s+(\S+)").unwrap(),
            Regex::new(r"^The wavefunction (is stable|has an? .*instability)")
                .unwrap(),
            Regex::new(r"^Frequencies --\s+(\S+)(?:\s+(\S+))?").unwrap(),
        ]
    })
}

/// The kinds of job whose results must be present in every log
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    /// counterpoise correction
    Counterpoise,
    /// wavefunction stability test
    Stable,
}

impl std::str::FromStr for JobKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cp" => Ok(Self::Counterpoise),
            "stable" => Ok(Self::Stable),
            _ => Err(Error::Input(format!(
                "unrecognized job type '{s}'. options are cp and stable"
            ))),
        }
    }
}

/// One row of output from `read_gausslog`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub file: String,
    pub stoich: Option<String>,
    pub charge: Option<i32>,
    pub mult: Option<u32>,
    pub functional: Option<String>,
    pub basis: Option<String>,
    /// the last SCF energy in the file
    pub energy: Option<f64>,
    /// total dipole moment in Debye
    pub dipole: Option<f64>,
    pub zpe: Option<f64>,
    pub h298: Option<f64>,
    pub g298: Option<f64>,
    pub counterpoise: Option<f64>,
    pub stable: Option<bool>,
    pub freq1: Option<f64>,
    pub freq2: Option<f64>,
}

pub const CSV_HEADER: [&str; 15] = [
    "File Name",
    "Stoichiometry",
    "Charge",
    "Mult",
    "Functional",
    "Basis Set",
    "Energy (Hartrees)",
    "Dipole (Debye)",
    "ZPE (Hartrees)",
    "H298 (Hartrees)",
    "G298 (Hartrees)",
    "Counterpoise Corrected Energy (Hartrees)",
    "Stable",
    "Freq 1",
    "Freq 2",
];

fn parse_num<T: std::str::FromStr>(s: &str, line: &str) -> Result<T, Error> {
    s.parse().map_err(|_| {
        Error::InvalidData(format!("failed to parse '{s}' from line '{line}'"))
    })
}

impl Summary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut ret = Self::from_reader(BufReader::new(f))
            .map_err(|e| match e {
                Error::InvalidData(msg) => Error::InvalidData(format!(
                    "{msg} in file {}",
                    path.display()
                )),
                e => e,
            })?;
        ret.file = path.display().to_string();
        Ok(ret)
    }

    pub fn from_reader(r: impl BufRead) -> Result<Self, Error> {
        let [
            stoich,
            charge,
            scf,
            tot,
            zpe,
            h298,
            g298,
            cp,
            stable,
            freqs,
        ] = patterns();
        let mut ret = Self::default();
        let mut in_dipole = false;
        for line in r.lines() {
            let line = line.map_err(|e| {
                Error::InvalidData(format!("failed to read line with {e}"))
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if in_dipole {
                in_dipole = false;
                if let Some(c) = tot.captures(line) {
                    ret.dipole = Some(parse_num(&c[1], line)?);
                }
                continue;
            }
            if line.starts_with("Dipole moment (field-independent basis") {
                in_dipole = true;
            } else if line.starts_with('#') && ret.functional.is_none() {
                if let Some((func, basis)) = line
                    .split_whitespace()
                    .find_map(|field| field.split_once('/'))
                {
                    ret.functional = Some(func.to_owned());
                    ret.basis = Some(basis.to_owned());
                }
            } else if let Some(c) = stoich.captures(line) {
                ret.stoich = Some(c[1].to_owned());
            } else if let Some(c) = charge.captures(line) {
                if ret.charge.is_none() {
                    ret.charge = Some(parse_num(&c[1], line)?);
                    ret.mult = Some(parse_num(&c[2], line)?);
                }
            } else if let Some(c) = scf.captures(line) {
                ret.energy = Some(parse_num(&c[1], line)?);
            } else if let Some(c) = zpe.captures(line) {
                ret.zpe = Some(parse_num(&c[1], line)?);
            } else if let Some(c) = h298.captures(line) {
                ret.h298 = Some(parse_num(&c[1], line)?);
            } else if let Some(c) = g298.captures(line) {
                ret.g298 = Some(parse_num(&c[1], line)?);
            } else if let Some(c) = cp.captures(line) {
                ret.counterpoise = Some(parse_num(&c[1], line)?);
            } else if let Some(c) = stable.captures(line) {
                ret.stable = Some(&c[1] == "is stable");
            } else if let Some(c) = freqs.captures(line) {
                // only the first block of frequencies holds the lowest two
                if ret.freq1.is_none() {
                    ret.freq1 = Some(parse_num(&c[1], line)?);
                    ret.freq2 = c
                        .get(2)
                        .map(|m| parse_num(m.as_str(), line))
                        .transpose()?;
                }
            }
        }
        Ok(ret)
    }

    /// an error if the result `kind` is supposed to produce is missing
    pub fn require(&self, kind: JobKind) -> Result<(), Error> {
        let (missing, what) = match kind {
            JobKind::Counterpoise => {
                (self.counterpoise.is_none(), "counterpoise corrected energy")
            }
            JobKind::Stable => {
                (self.stable.is_none(), "wavefunction stability result")
            }
        };
        if missing {
            return Err(Error::InvalidData(format!(
                "did not find a {what} in file {}",
                self.file
            )));
        }
        Ok(())
    }

    /// the fields of [CSV_HEADER] for this summary. missing values are left
    /// empty, and fields containing commas, like `6-31+g(d,p)`, are quoted
    pub fn csv_row(&self) -> String {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(T::to_string).unwrap_or_default()
        }
        let fields = [
            self.file.clone(),
            opt(&self.stoich),
            opt(&self.charge),
            opt(&self.mult),
            opt(&self.functional),
            opt(&self.basis),
            opt(&self.energy),
            opt(&self.dipole),
            opt(&self.zpe),
            opt(&self.h298),
            opt(&self.g298),
            opt(&self.counterpoise),
            opt(&self.stable),
            opt(&self.freq1),
            opt(&self.freq2),
        ];
        files::csv_line(fields)
    }
}
