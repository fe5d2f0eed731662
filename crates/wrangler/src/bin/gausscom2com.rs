use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use gauss::{
    Error, files,
    gausscom::{ComAtom, ComFile},
};
use wrangler::{OutFile, finish, make_dir, parse_args};

/// Create Gaussian input files from the coordinates in other Gaussian input
/// files, given a template input file. Each output is named after the file
/// its coordinates came from
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// Take the charge and multiplicity from each input file instead of the
    /// template
    #[arg(short, long)]
    charge_read_com: bool,

    /// A Gaussian input file with the coordinates to use
    #[arg(short = 'f', long)]
    com_file: Option<PathBuf>,

    /// A file listing Gaussian input files
    #[arg(short, long)]
    list_file: Option<PathBuf>,

    /// Where to write the new input files. Required when it would otherwise
    /// be the directory of an input file, since that input would be
    /// overwritten
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// The Gaussian input template
    #[arg(short, long)]
    tpl_file: PathBuf,
}

/// the molecule specification from `input` in the style of `tpl`. a template
/// with atoms must agree with `input` on the number and type of atoms, and
/// lends it its labels and freeze codes
fn com_atoms(
    com: &Path,
    input: &ComFile,
    tpl: &ComFile,
) -> Result<Vec<ComAtom>, Error> {
    let coords = input
        .coords()
        .map_err(|e| Error::InvalidData(format!("{}: {e}", com.display())))?;
    if tpl.atoms.is_empty() {
        return Ok(input
            .atoms
            .iter()
            .zip(coords)
            .map(|(atom, xyz)| atom.moved_to(xyz))
            .collect());
    }
    if input.num_atoms() != tpl.num_atoms() {
        return Err(Error::InvalidData(format!(
            "Problem while reading file: {}\nFound {} atoms in this file, \
             while the tpl file has {} atoms",
            com.display(),
            input.num_atoms(),
            tpl.num_atoms()
        )));
    }
    input
        .atoms
        .iter()
        .zip(&tpl.atoms)
        .zip(coords)
        .enumerate()
        .map(|(i, ((atom, tpl_atom), xyz))| {
            if atom.element() != tpl_atom.element() {
                return Err(Error::InvalidData(format!(
                    "Problem while reading file: {}\nAtom types do not match \
                     for atom number {}: file has type {} while tpl has type \
                     {}",
                    com.display(),
                    i + 1,
                    atom.element(),
                    tpl_atom.element()
                )));
            }
            Ok(tpl_atom.moved_to(xyz))
        })
        .collect()
}

/// whether `out` already exists as the same file as `input`
fn is_same_file(out: &Path, input: &Path) -> bool {
    match (std::fs::canonicalize(out), std::fs::canonicalize(input)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn run(args: Args) -> Result<(), Error> {
    let coms =
        files::gather(args.com_file.as_deref(), args.list_file.as_deref())?;
    let tpl = ComFile::load_template(&args.tpl_file)?;
    if !args.charge_read_com && tpl.charge_line().is_none() {
        return Err(Error::InvalidData(format!(
            "the tpl file {} must end its head with the charge and \
             multiplicity line unless the '-c' option is used",
            args.tpl_file.display()
        )));
    }
    if let Some(dir) = &args.out_dir {
        make_dir(dir)?;
    }
    for com in &coms {
        let input = ComFile::load(com)?;
        let mut out_tpl = tpl.clone();
        if args.charge_read_com {
            let Some(line) = input.charge_line() else {
                return Err(Error::InvalidData(format!(
                    "Problem while reading file: {}\nOption to read charge \
                     and multiplicity from the input file chosen, but found \
                     invalid data on the expected line: {}",
                    com.display(),
                    input.head.last().map_or("", String::as_str)
                )));
            };
            out_tpl.set_charge_line(line);
        }
        let atoms = com_atoms(com, &input, &tpl)?;
        let out = files::out_fname(com, ".com", args.out_dir.as_deref());
        if is_same_file(&out, com) {
            return Err(Error::InvalidData(format!(
                "Refusing to overwrite input file {} with its own output. \
                 Use '-o' to choose another directory",
                com.display()
            )));
        }
        OutFile::new(out).write(out_tpl.render(&atoms))?;
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
