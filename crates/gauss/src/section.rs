//! Line classification and the HEAD/ATOMS/TAIL state machine used to walk
//! the coordinate tables of a Gaussian log file

use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, element};

/// number of lines between the coordinate table header and its first row:
/// the column names and a separator
pub const PREAMBLE_LINES: usize = 2;

static CELL: OnceLock<[Regex; 2]> = OnceLock::new();

fn patterns() -> &'static [Regex; 2] {
    CELL.get_or_init(|| {
        [
            Regex::new(r"^SCF Done:").unwrap(),
            Regex::new(r"^Center\s+Atomic\s+Atomic\s+Coordinates").unwrap(),
        ]
    })
}

/// One row of a Gaussian orientation table:
///
/// ```text
///      1          8           0        0.000000    0.000000    0.117300
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CoordRow {
    pub center: usize,
    /// negative for dummy atoms
    pub atomic_number: i64,
    pub xyz: [f64; 3],
}

impl CoordRow {
    /// parse a trimmed table row, returning `None` for anything that is not
    /// exactly three integers followed by three floats. the atomic number may
    /// be negative so dummy atoms still count as table rows
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<_> = line.split_whitespace().collect();
        let [center, atomic_number, ty, x, y, z] = fields[..] else {
            return None;
        };
        let _: i64 = ty.parse().ok()?;
        Some(Self {
            center: center.parse().ok()?,
            atomic_number: atomic_number.parse().ok()?,
            xyz: [x.parse().ok()?, y.parse().ok()?, z.parse().ok()?],
        })
    }

    pub fn element(&self) -> Result<&'static str, Error> {
        element::symbol(self.atomic_number)
    }
}

/// The kinds of non-blank line the section parser cares about
#[derive(Debug, PartialEq)]
pub enum Line<'a> {
    /// an energy report closing one geometry step
    Marker(&'a str),
    /// the header of an orientation table
    CoordHeader,
    Coord(CoordRow),
    Other(&'a str),
}

impl<'a> Line<'a> {
    /// classify a trimmed, non-blank line
    pub fn classify(line: &'a str) -> Self {
        let [energy, header] = patterns();
        if energy.is_match(line) {
            Line::Marker(line)
        } else if header.is_match(line) {
            Line::CoordHeader
        } else if let Some(row) = CoordRow::parse(line) {
            Line::Coord(row)
        } else {
            Line::Other(line)
        }
    }
}

/// Progress through the header of an orientation table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preamble {
    /// no table header seen yet
    Waiting,
    /// the header was seen and this many preamble lines remain
    Skipping(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Head(Preamble),
    Atoms,
    Tail,
}

impl Default for Section {
    fn default() -> Self {
        Self::Head(Preamble::Waiting)
    }
}

impl Section {
    /// the section after seeing `line` in `self`. an energy marker always
    /// restarts at the head, and only an unbroken run of coordinate rows
    /// keeps the parser in `Atoms`
    pub fn next(self, line: &Line) -> Self {
        use Preamble::*;
        use Section::*;
        match (self, line) {
            (_, Line::Marker(_)) => Head(Waiting),
            (Head(Waiting), Line::CoordHeader) => {
                Head(Skipping(PREAMBLE_LINES))
            }
            (Head(Waiting), _) => Head(Waiting),
            (Head(Skipping(n)), _) if n <= 1 => Atoms,
            (Head(Skipping(n)), _) => Head(Skipping(n - 1)),
            (Atoms, Line::Coord(_)) => Atoms,
            (Atoms, _) => Tail,
            (Tail, _) => Tail,
        }
    }

    /// whether the transition from `self` to `next` starts a new table
    pub fn starts_table(self, next: Self) -> bool {
        self == Section::Head(Preamble::Waiting)
            && next == Section::Head(Preamble::Skipping(PREAMBLE_LINES))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use Preamble::*;
    use Section::*;

    const HEADER: &str =
        "Center     Atomic      Atomic             Coordinates (Angstroms)";
    const COLUMNS: &str =
        "Number     Number       Type             X           Y           Z";
    const SEP: &str =
        "---------------------------------------------------------------------";
    const ROW: &str =
        "1          8           0        0.000000    0.000000    0.117300";
    const SCF: &str =
        "SCF Done:  E(RB3LYP) =  -76.4089533205     A.U. after   10 cycles";

    #[test]
    fn classify() {
        assert_eq!(Line::classify(SCF), Line::Marker(SCF));
        assert_eq!(Line::classify(HEADER), Line::CoordHeader);
        assert_eq!(
            Line::classify(ROW),
            Line::Coord(CoordRow {
                center: 1,
                atomic_number: 8,
                xyz: [0.0, 0.0, 0.1173],
            })
        );
        assert_eq!(Line::classify(COLUMNS), Line::Other(COLUMNS));
        assert_eq!(Line::classify(SEP), Line::Other(SEP));
    }

    #[test]
    fn dummy_atom_row() {
        let row = "2         -1           0        0.000000    0.000000    1.000000";
        let Line::Coord(got) = Line::classify(row) else {
            panic!("dummy atom row not classified as a coordinate");
        };
        assert_eq!(got.atomic_number, -1);
        assert!(got.element().unwrap_err().is_invalid_data());
        assert_eq!(Atoms.next(&Line::classify(row)), Atoms);
    }

    #[test_case("1 8 0 0.0 0.0" ; "too few fields")]
    #[test_case("1 8 0 0.0 0.0 0.0 0.0" ; "too many fields")]
    #[test_case("a 8 0 0.0 0.0 0.0" ; "bad center")]
    #[test_case("1 8 0 0.0 x 0.0" ; "bad coordinate")]
    fn not_rows(line: &str) {
        assert!(CoordRow::parse(line).is_none());
    }

    #[test]
    fn walk_table() {
        let lines = [HEADER, COLUMNS, SEP, ROW, ROW, SEP, "Rotational", SCF];
        let want = [
            Head(Skipping(2)),
            Head(Skipping(1)),
            Atoms,
            Atoms,
            Atoms,
            Tail,
            Tail,
            Head(Waiting),
        ];
        let mut section = Section::default();
        for (line, want) in lines.iter().zip(want) {
            section = section.next(&Line::classify(line));
            assert_eq!(section, want, "after {line}");
        }
    }

    #[test_case(Head(Waiting))]
    #[test_case(Head(Skipping(1)))]
    #[test_case(Atoms)]
    #[test_case(Tail)]
    fn marker_restarts(from: Section) {
        assert_eq!(from.next(&Line::Marker(SCF)), Head(Waiting));
    }

    #[test]
    fn header_ignored_outside_head() {
        assert_eq!(Tail.next(&Line::CoordHeader), Tail);
        assert_eq!(Atoms.next(&Line::CoordHeader), Tail);
    }

    #[test]
    fn starts_table() {
        let s = Section::default();
        assert!(s.starts_table(s.next(&Line::CoordHeader)));
        assert!(!s.starts_table(s.next(&Line::Other("x"))));
    }
}
