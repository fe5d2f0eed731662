use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use gauss::{
    Error, files,
    gausscom::{ComAtom, ComFile},
    pdb::{self, PdbAtom},
};
use wrangler::{
    OutFile,
    config::pdb2gau::{Config, DEFAULT_CONFIG, DEFAULT_LIST},
    finish, if_exists, parse_args,
};

/// Create Gaussian input files from the structures in PDB files, given a
/// template input file
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// A TOML configuration file. Defaults to pdb2gau.toml, which is only
    /// read if it exists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The Gaussian input template. Overrides gau_tpl_file in the config
    #[arg(short, long)]
    tpl_file: Option<PathBuf>,

    /// A file listing PDB files. Overrides pdb_list_file in the config, and
    /// defaults to pdb_list.txt if it exists
    #[arg(short = 'l', long)]
    pdb_list_file: Option<PathBuf>,

    /// A PDB file to convert. Overrides pdb_file in the config
    #[arg(short, long)]
    pdb_file: Option<PathBuf>,

    /// Drop the last atom of each structure
    #[arg(short, long)]
    remove_final_h: bool,

    /// Only convert the first structure in each PDB file
    #[arg(short = 'a', long)]
    first_only: bool,
}

impl Args {
    fn apply(self, cfg: &mut Config) {
        if self.tpl_file.is_some() {
            cfg.gau_tpl_file = self.tpl_file;
        }
        if self.pdb_list_file.is_some() {
            cfg.pdb_list_file = self.pdb_list_file;
        }
        if self.pdb_file.is_some() {
            cfg.pdb_file = self.pdb_file;
        }
        cfg.remove_final_h |= self.remove_final_h;
        cfg.first_only |= self.first_only;
    }
}

fn com_atoms(atoms: &[PdbAtom], remove_final_h: bool) -> Vec<ComAtom> {
    let keep = if remove_final_h {
        atoms.len().saturating_sub(1)
    } else {
        atoms.len()
    };
    atoms[..keep]
        .iter()
        .map(|atom| ComAtom::new(atom.element(), [atom.x, atom.y, atom.z]))
        .collect()
}

fn run(args: Args) -> Result<(), Error> {
    let explicit = args.config.is_some();
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut cfg = Config::load_or_default(&path, explicit)?;
    args.apply(&mut cfg);

    let tpl_path = cfg.template()?;
    let tpl = ComFile::load_template(tpl_path)?;
    if tpl.charge_line().is_none() {
        return Err(Error::InvalidData(format!(
            "the tpl file {} must end its head with the charge and \
             multiplicity line",
            tpl_path.display()
        )));
    }
    let list = cfg.pdb_list_file.clone().or_else(|| if_exists(DEFAULT_LIST));
    let pdbs = files::gather(cfg.pdb_file.as_deref(), list.as_deref())?;
    for pdb_file in &pdbs {
        let structures = pdb::load_structures(pdb_file)?;
        if structures.is_empty() {
            return Err(Error::InvalidData(format!(
                "Did not find any atoms in PDB file {}",
                pdb_file.display()
            )));
        }
        let several = structures.len() > 1;
        for (i, s) in structures.iter().enumerate() {
            // structures without MODEL records are numbered by position
            let num = s.model.or(several.then_some(i + 1));
            let suffix = match num {
                Some(n) => format!("_{n}.com"),
                None => ".com".to_owned(),
            };
            let atoms = com_atoms(&s.atoms, cfg.remove_final_h);
            OutFile::new(files::out_fname(pdb_file, &suffix, None))
                .write(tpl.render(&atoms))?;
            if cfg.first_only {
                break;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    finish(run(args))
}
