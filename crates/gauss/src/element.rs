//! Element symbols by atomic number and from Gaussian atom labels

use crate::Error;

pub const NUMBER_TO_SYMBOL: [&str; 55] = [
    "X", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg",
    "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn",
    "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb",
    "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe",
];

/// look up the element symbol for `atomic_number`. only H through Xe are
/// supported, so dummy atoms (negative numbers in Gaussian's tables) and
/// ghost atoms (zero) are errors
pub fn symbol(atomic_number: i64) -> Result<&'static str, Error> {
    let idx = usize::try_from(atomic_number).ok().filter(|&i| i > 0);
    match idx.and_then(|i| NUMBER_TO_SYMBOL.get(i)) {
        Some(s) => Ok(s),
        _ => Err(Error::InvalidData(format!(
            "Currently, this code only expects atomic numbers up to {} ({}), \
             and the atomic number read was {atomic_number}",
            NUMBER_TO_SYMBOL.len() - 1,
            NUMBER_TO_SYMBOL[NUMBER_TO_SYMBOL.len() - 1],
        ))),
    }
}

/// strip any Gaussian annotation like `(Fragment=1)` or an atom-number suffix
/// from an atom label, leaving the element symbol
pub fn label_element(label: &str) -> &str {
    let label = label.split('(').next().unwrap_or(label);
    label.trim_end_matches(|c: char| c.is_ascii_digit()).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(symbol(1).unwrap(), "H");
        assert_eq!(symbol(36).unwrap(), "Kr");
        assert_eq!(symbol(54).unwrap(), "Xe");
        assert!(symbol(0).unwrap_err().is_invalid_data());
        assert!(symbol(55).unwrap_err().is_invalid_data());
        assert!(symbol(-1).unwrap_err().is_invalid_data());
    }

    #[test]
    fn labels() {
        assert_eq!(label_element("C(Fragment=2)"), "C");
        assert_eq!(label_element("Cl12"), "Cl");
        assert_eq!(label_element("O"), "O");
    }
}
