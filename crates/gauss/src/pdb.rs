//! Fixed-column PDB records and templates

use std::{fmt::Display, path::Path, str::FromStr};

use crate::{Error, element};

/// An `ATOM` or `HETATM` record. Everything except the coordinates is kept as
/// the raw column text so that a parsed line renders back unchanged:
///
/// ```text
/// HETATM    1  O   UNL     1       0.000   0.000   0.117  1.00  0.00           O
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PdbAtom {
    /// columns 1-6
    pub record: String,
    /// columns 7-11
    pub serial: String,
    /// columns 12-17, including the alternate location indicator
    pub name: String,
    /// columns 18-22, residue name and chain
    pub residue: String,
    /// columns 23-26
    pub mol_num: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// column 55 onward: occupancy, temperature factor, and element
    pub rest: String,
}

impl PdbAtom {
    /// A new `HETATM` record for atom number `serial` (1-based) of type
    /// `atom_type` and element `element`, at the origin
    pub fn new(serial: usize, atom_type: &str, element: &str) -> Self {
        Self {
            record: "HETATM".to_owned(),
            serial: format!("{serial:5}"),
            name: format!(" {atom_type:4} "),
            residue: "UNL  ".to_owned(),
            mol_num: 1,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rest: format!("  1.00  0.00          {element:>2}"),
        }
    }

    /// the element symbol from columns 77-78, or from the atom name when
    /// those are blank
    pub fn element(&self) -> &str {
        match self.rest.get(22..).map(str::trim) {
            Some(e) if !e.is_empty() => e,
            _ => element::label_element(self.name.trim()),
        }
    }

    pub fn set_coords(&mut self, [x, y, z]: [f64; 3]) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    fn is_atom_line(line: &str) -> bool {
        line.starts_with("ATOM  ") || line.starts_with("HETATM")
    }
}

impl Display for PdbAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}{:4}    {:8.3}{:8.3}{:8.3}{}",
            self.record,
            self.serial,
            self.name,
            self.residue,
            self.mol_num,
            self.x,
            self.y,
            self.z,
            self.rest
        )
    }
}

impl FromStr for PdbAtom {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let col = |start: usize, end: usize| {
            s.get(start..end).ok_or_else(|| {
                Error::InvalidData(format!(
                    "PDB atom line too short for columns {}-{end}: '{s}'",
                    start + 1
                ))
            })
        };
        let num = |start: usize, end: usize| -> Result<f64, Error> {
            let field = col(start, end)?;
            field.trim().parse().map_err(|_| {
                Error::InvalidData(format!(
                    "failed to parse '{field}' as a coordinate in PDB line \
                     '{s}'"
                ))
            })
        };
        let mol = col(22, 26)?;
        Ok(Self {
            record: col(0, 6)?.to_owned(),
            serial: col(6, 11)?.to_owned(),
            name: col(11, 17)?.to_owned(),
            residue: col(17, 22)?.to_owned(),
            mol_num: mol.trim().parse().map_err(|_| {
                Error::InvalidData(format!(
                    "failed to parse '{mol}' as a molecule number in PDB \
                     line '{s}'"
                ))
            })?,
            x: num(30, 38)?,
            y: num(38, 46)?,
            z: num(46, 54)?,
            rest: s.get(54..).unwrap_or("").to_owned(),
        })
    }
}

/// One structure from a PDB file that may hold several
#[derive(Clone, Debug, PartialEq)]
pub struct PdbStructure {
    /// the number of `MODEL` records seen up to this structure, if any
    pub model: Option<usize>,
    pub atoms: Vec<PdbAtom>,
}

/// split the contents of a PDB file into the structures it holds. a structure
/// ends at an `END` or `ENDMDL` record or at the end of the file, and those
/// without atoms are skipped
pub fn structures(s: &str) -> Result<Vec<PdbStructure>, Error> {
    let mut ret = Vec::new();
    let mut models = 0;
    let mut atoms = Vec::new();
    let mut close = |atoms: &mut Vec<PdbAtom>, models: usize| {
        if !atoms.is_empty() {
            ret.push(PdbStructure {
                model: (models > 0).then_some(models),
                atoms: std::mem::take(atoms),
            });
        }
    };
    for line in s.lines() {
        let line = line.trim_end();
        if line.starts_with("MODEL") {
            models += 1;
        } else if PdbAtom::is_atom_line(line) {
            atoms.push(line.parse()?);
        } else if line == "END" || line.starts_with("ENDMDL") {
            close(&mut atoms, models);
        }
    }
    close(&mut atoms, models);
    Ok(ret)
}

/// [structures] from the file at `path`
pub fn load_structures(
    path: impl AsRef<Path>,
) -> Result<Vec<PdbStructure>, Error> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    structures(&contents).map_err(|e| match e {
        Error::InvalidData(msg) => {
            Error::InvalidData(format!("{}: {msg}", path.display()))
        }
        e => e,
    })
}

/// A PDB file split into the lines before the first atom record, the atom
/// records, and everything after them
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PdbTemplate {
    pub head: Vec<String>,
    pub atoms: Vec<PdbAtom>,
    pub tail: Vec<String>,
}

impl FromStr for PdbTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ret = Self::default();
        for line in s.lines() {
            let line = line.trim_end();
            if PdbAtom::is_atom_line(line) && ret.tail.is_empty() {
                ret.atoms.push(line.parse()?);
            } else if ret.atoms.is_empty() {
                ret.head.push(line.to_owned());
            } else {
                ret.tail.push(line.to_owned());
            }
        }
        Ok(ret)
    }
}

impl PdbTemplate {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        contents.parse()
    }

    /// A template without atoms, titled with `title` and closed with `END`
    pub fn titled(title: impl Display) -> Self {
        Self {
            head: vec![format!("TITLE     {title}")],
            atoms: Vec::new(),
            tail: vec!["END".to_owned()],
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// the lines of one output record: the template head, then `remark`
    /// formatted as a `REMARK` line if present, then `atoms` and the tail
    pub fn render(&self, remark: Option<&str>, atoms: &[PdbAtom]) -> Vec<String> {
        let mut ret = self.head.clone();
        if let Some(remark) = remark {
            ret.push(format!("REMARK    {remark}"));
        }
        ret.extend(atoms.iter().map(PdbAtom::to_string));
        ret.extend(self.tail.iter().cloned());
        ret
    }
}
