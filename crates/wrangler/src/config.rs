//! Configuration settings for gausslog2pdb, and for pdbs2gausscoms in
//! [pdb2gau]

use std::path::{Path, PathBuf};

use gauss::Error;
use serde::Deserialize;

pub mod pdb2gau;

#[cfg(test)]
mod tests;

/// The config file read when none is given on the command line. It is fine
/// for it not to exist
pub const DEFAULT_CONFIG: &str = "gausslog2pdb.toml";

/// The list of log files read when no list is given anywhere. Also optional
pub const DEFAULT_LIST: &str = "log_list.txt";

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// A file containing the names of Gaussian log files to convert, one per
    /// line.
    gausslog_list_file: Option<PathBuf>,

    /// A single Gaussian log file to convert. It is processed after any files
    /// from `gausslog_list_file`.
    gausslog_file: Option<PathBuf>,

    /// A PDB file supplying everything but the coordinates of the output. The
    /// number of atoms must match the log files.
    pdb_tpl_file: Option<PathBuf>,

    /// Where to write the PDB files. Defaults to the directory of each log
    /// file.
    output_directory: Option<PathBuf>,

    /// The base name of the output file, instead of the name of each log
    /// file.
    output_file_name: Option<String>,

    /// Write only the first set of coordinates from each log.
    only_first_coords: Option<bool>,

    /// Write only the last set of coordinates from each log.
    only_final_coords: Option<bool>,

    /// Write the final coordinates of every log into a single file named by
    /// `output_file_name`.
    combine_logs: Option<bool>,

    /// Without a template, name each atom by its element and position, like
    /// C1, H2, H3.
    add_nums_to_type: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct Config {
    pub gausslog_list_file: Option<PathBuf>,
    pub gausslog_file: Option<PathBuf>,
    pub pdb_tpl_file: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub output_file_name: Option<String>,
    pub only_first_coords: bool,
    pub only_final_coords: bool,
    pub combine_logs: bool,
    pub add_nums_to_type: bool,
}

impl From<RawConfig> for Config {
    fn from(rc: RawConfig) -> Self {
        Self {
            gausslog_list_file: rc.gausslog_list_file,
            gausslog_file: rc.gausslog_file,
            pdb_tpl_file: rc.pdb_tpl_file,
            output_directory: rc.output_directory,
            output_file_name: rc.output_file_name,
            only_first_coords: rc.only_first_coords.unwrap_or(false),
            only_final_coords: rc.only_final_coords.unwrap_or(false),
            combine_logs: rc.combine_logs.unwrap_or(false),
            add_nums_to_type: rc.add_nums_to_type.unwrap_or(false),
        }
    }
}

impl Config {
    /// load a [Config] from the TOML file at `path`
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

    /// load `path` if it was named explicitly or if it exists. a missing
    /// default config gives the default settings
    pub fn load_or_default(
        path: impl AsRef<Path>,
        explicit: bool,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        if explicit || path.is_file() {
            Self::load(path)
        } else {
            log::debug!("no config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// check the combination of settings, forcing final-only output when
    /// logs are combined. returns any warning to show the user
    pub fn validate(&mut self) -> Result<Option<&'static str>, Error> {
        if self.combine_logs && self.output_file_name.is_none() {
            return Err(Error::InvalidData(
                "When combining outputs from multiple log files into one pdb, \
                 specify the output file name"
                    .to_owned(),
            ));
        }
        let mut warning = None;
        if self.combine_logs && !self.only_final_coords {
            warning = Some(
                "When combining outputs from multiple log files into one pdb, \
                 only the last coordinates of each log file will be kept.",
            );
            self.only_final_coords = true;
        }
        if self.only_first_coords && self.only_final_coords {
            return Err(Error::InvalidData(
                "Cannot specify both 'only_first_coords' and \
                 'only_final_coords'"
                    .to_owned(),
            ));
        }
        Ok(warning)
    }
}
