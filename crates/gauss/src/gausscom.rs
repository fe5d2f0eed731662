//! Gaussian input (`.com`) files

use std::{path::Path, str::FromStr};

use crate::{Error, element};

/// One line of a molecule specification, like `C(Fragment=1)  0.0 0.0 0.0`
#[derive(Clone, Debug, PartialEq)]
pub struct ComAtom {
    /// the atom label, including any annotation in parentheses
    pub label: String,
    /// the last three fields of the line, if they are numbers. templates are
    /// allowed to leave them out
    pub xyz: Option<[f64; 3]>,
    /// the optional freeze code between the label and the coordinates: 0
    /// optimizes the atom and -1 holds it fixed
    pub freeze: Option<i32>,
}

impl ComAtom {
    pub fn new(label: impl Into<String>, xyz: [f64; 3]) -> Self {
        Self {
            label: label.into(),
            xyz: Some(xyz),
            freeze: None,
        }
    }

    /// a copy of `self`, keeping the label and freeze code, at `xyz`
    pub fn moved_to(&self, xyz: [f64; 3]) -> Self {
        Self {
            xyz: Some(xyz),
            ..self.clone()
        }
    }

    pub fn element(&self) -> &str {
        element::label_element(&self.label)
    }
}

impl FromStr for ComAtom {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = s.split_whitespace().collect();
        let Some(label) = fields.first() else {
            return Err(Error::InvalidData(
                "empty line in molecule specification".to_owned(),
            ));
        };
        let xyz = match fields[1..] {
            [.., x, y, z] => match (x.parse::<f64>(), y.parse(), z.parse()) {
                (Ok(x), Ok(y), Ok(z)) => Some([x, y, z]),
                _ => None,
            },
            _ => None,
        };
        let freeze = match fields[..] {
            [_, code, _, _, _] => code.parse().ok(),
            _ => None,
        };
        Ok(Self {
            label: label.to_string(),
            xyz,
            freeze,
        })
    }
}

impl std::fmt::Display for ComAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.freeze {
            Some(code) => write!(f, "{:2}{code:>8}      ", self.label)?,
            None => write!(f, "{}      ", self.label)?,
        }
        if let Some([x, y, z]) = self.xyz {
            write!(f, "{x:12.6}{y:12.6}{z:12.6}")?;
        }
        Ok(())
    }
}

/// A Gaussian input file split into the route and title section ending with
/// the charge and multiplicity line, the molecule specification, and
/// everything from the blank line after the molecule onward
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComFile {
    pub head: Vec<String>,
    pub atoms: Vec<ComAtom>,
    /// always starts with the blank line closing the molecule specification
    pub tail: Vec<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Part {
    /// the number of blank lines seen so far
    Head(usize),
    Atoms,
    Tail,
}

impl FromStr for ComFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ret, complete) = Self::split(s)?;
        if !complete {
            return Err(Error::InvalidData(
                "did not find the charge and multiplicity line after the \
                 title section"
                    .to_owned(),
            ));
        }
        Ok(ret)
    }
}

/// whether `line` holds a charge and multiplicity, possibly for each
/// fragment: an even number of integers, at least two
pub fn is_charge_line(line: &str) -> bool {
    let fields: Vec<_> = line.split_whitespace().collect();
    fields.len() >= 2
        && fields.len() % 2 == 0
        && fields.iter().all(|f| f.parse::<i32>().is_ok())
}

impl ComFile {
    /// split `s` into its parts, also returning whether the head was closed
    /// by a charge and multiplicity line
    fn split(s: &str) -> Result<(Self, bool), Error> {
        let mut ret = Self {
            tail: vec![String::new()],
            ..Self::default()
        };
        let mut part = Part::Head(0);
        for line in s.lines() {
            let line = line.trim();
            match part {
                Part::Head(blanks) => {
                    ret.head.push(line.to_owned());
                    if line.is_empty() {
                        part = Part::Head(blanks + 1);
                    } else if blanks == 2 {
                        // charge and multiplicity
                        part = Part::Atoms;
                    }
                }
                Part::Atoms if line.is_empty() => part = Part::Tail,
                Part::Atoms => ret.atoms.push(line.parse()?),
                Part::Tail => ret.tail.push(line.to_owned()),
            }
        }
        Ok((ret, !matches!(part, Part::Head(_))))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        contents.parse().map_err(|e| match e {
            Error::InvalidData(msg) => {
                Error::InvalidData(format!("{}: {msg}", path.display()))
            }
            e => e,
        })
    }

    /// load a template, which may stop anywhere after the route section. the
    /// head is padded with blank lines to the five a minimal input needs, and
    /// the tail to the two blank lines Gaussian expects at the end
    pub fn load_template(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let (mut ret, _) = Self::split(&contents).map_err(|e| match e {
            Error::InvalidData(msg) => {
                Error::InvalidData(format!("{}: {msg}", path.display()))
            }
            e => e,
        })?;
        while ret.head.len() < 5 {
            ret.head.push(String::new());
        }
        while !ret.tail.ends_with(&[String::new(), String::new()]) {
            ret.tail.push(String::new());
        }
        Ok(ret)
    }

    /// the last line of the head if it holds a charge and multiplicity
    pub fn charge_line(&self) -> Option<&str> {
        self.head
            .last()
            .map(String::as_str)
            .filter(|line| is_charge_line(line))
    }

    /// replace the charge and multiplicity line at the end of the head
    pub fn set_charge_line(&mut self, line: &str) {
        match self.head.last_mut() {
            Some(last) => *last = line.to_owned(),
            None => self.head.push(line.to_owned()),
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// the coordinates of every atom, as an error if any atom is missing
    /// them
    pub fn coords(&self) -> Result<Vec<[f64; 3]>, Error> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| {
                atom.xyz.ok_or_else(|| {
                    Error::InvalidData(format!(
                        "no Cartesian coordinates for atom number {}",
                        i + 1
                    ))
                })
            })
            .collect()
    }

    /// the lines of the file with `atoms` in place of the molecule
    /// specification
    pub fn render(&self, atoms: &[ComAtom]) -> Vec<String> {
        let mut ret = self.head.clone();
        ret.extend(atoms.iter().map(ComAtom::to_string));
        ret.extend(self.tail.iter().cloned());
        ret
    }
}
