use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use gauss::{
    Error, files,
    gausscom::{ComAtom, ComFile},
    gausslog::{self, Flow, LogAtom},
};
use wrangler::{OutFile, finish, if_exists, parse_args};

/// Create Gaussian input files from the final coordinates in Gaussian log
/// files, given a template input file
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// A Gaussian log file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// A file listing Gaussian log files. Defaults to list.txt if it exists
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// The Gaussian input template
    #[arg(short, long)]
    tpl: PathBuf,
}

const DEFAULT_LIST: &str = "list.txt";

/// the molecule specification for `atoms`. a template with atoms must agree
/// on every element, and its labels are kept to preserve annotations like
/// fragment numbers and freeze codes
fn com_atoms(
    log: &Path,
    atoms: &[LogAtom],
    tpl: &ComFile,
) -> Result<Vec<ComAtom>, Error> {
    if tpl.atoms.is_empty() {
        return Ok(atoms
            .iter()
            .map(|atom| ComAtom::new(atom.element, atom.xyz))
            .collect());
    }
    if atoms.len() != tpl.num_atoms() {
        return Err(Error::InvalidData(format!(
            "In gausslog file: {}\n  found {} atoms, but the tpl expects {} \
             atoms",
            log.display(),
            atoms.len(),
            tpl.num_atoms()
        )));
    }
    atoms
        .iter()
        .zip(&tpl.atoms)
        .enumerate()
        .map(|(i, (atom, tpl_atom))| {
            if tpl_atom.element() != atom.element {
                return Err(Error::InvalidData(format!(
                    "For atom number {}, {} has atom type {}, while the \
                     template has atom type {}",
                    i + 1,
                    log.display(),
                    atom.element,
                    tpl_atom.element()
                )));
            }
            Ok(tpl_atom.moved_to(atom.xyz))
        })
        .collect()
}

fn run(args: Args) -> Result<(), Error> {
    let list = args.list.clone().or_else(|| if_exists(DEFAULT_LIST));
    let logs = files::gather(args.file.as_deref(), list.as_deref())?;
    let tpl = ComFile::load_template(&args.tpl)?;
    if tpl.charge_line().is_none() {
        return Err(Error::InvalidData(format!(
            "the tpl file {} must end its head with the charge and \
             multiplicity line",
            args.tpl.display()
        )));
    }
    let suffix = format!(
        "_{}.com",
        args.tpl.file_stem().unwrap_or_default().to_string_lossy()
    );
    for log in &logs {
        let last = gausslog::scan_file(log, |_| Ok(Flow::Continue))?
            .ok_or_else(|| {
                Error::InvalidData(format!(
                    "Did not find Gaussian output coordinates in file {}",
                    log.display()
                ))
            })?;
        let atoms = com_atoms(log, &last.atoms, &tpl)?;
        OutFile::new(files::out_fname(log, &suffix, None))
            .write(tpl.render(&atoms))?;
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
