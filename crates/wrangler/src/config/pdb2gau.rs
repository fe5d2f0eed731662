//! Configuration settings for pdbs2gausscoms

use std::path::{Path, PathBuf};

use gauss::Error;
use serde::Deserialize;

pub const DEFAULT_CONFIG: &str = "pdb2gau.toml";

pub const DEFAULT_LIST: &str = "pdb_list.txt";

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// The Gaussian input template whose head and tail surround the
    /// coordinates from each PDB structure.
    gau_tpl_file: Option<PathBuf>,

    /// A file listing PDB files to convert, one per line.
    pdb_list_file: Option<PathBuf>,

    /// A single PDB file to convert.
    pdb_file: Option<PathBuf>,

    /// Drop the last atom of every structure, usually a capping hydrogen.
    remove_final_h: Option<bool>,

    /// Convert only the first structure in each PDB file.
    first_only: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct Config {
    pub gau_tpl_file: Option<PathBuf>,
    pub pdb_list_file: Option<PathBuf>,
    pub pdb_file: Option<PathBuf>,
    pub remove_final_h: bool,
    pub first_only: bool,
}

impl From<RawConfig> for Config {
    fn from(rc: RawConfig) -> Self {
        Self {
            gau_tpl_file: rc.gau_tpl_file,
            pdb_list_file: rc.pdb_list_file,
            pdb_file: rc.pdb_file,
            remove_final_h: rc.remove_final_h.unwrap_or(false),
            first_only: rc.first_only.unwrap_or(false),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&contents).map_err(|e| {
            Error::Input(format!(
                "failed to deserialize config file '{}' with {e}",
                path.display()
            ))
        })
    }

    /// load `path` if it was named explicitly or if it exists
    pub fn load_or_default(
        path: impl AsRef<Path>,
        explicit: bool,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        if explicit || path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// the template file, which must be given somewhere
    pub fn template(&self) -> Result<&Path, Error> {
        self.gau_tpl_file.as_deref().ok_or_else(|| {
            Error::Input(format!(
                "Did not find 'gau_tpl_file' in a config file ({DEFAULT_CONFIG} \
                 by default) and did not specify a template with '-t'. A \
                 template is needed to run this program."
            ))
        })
    }
}
