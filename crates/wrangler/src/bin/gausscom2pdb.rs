use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use gauss::{Error, files, gausscom::ComFile, pdb::PdbTemplate};
use wrangler::{OutFile, finish, if_exists, make_dir, parse_args, warning};

/// Create PDB files from Gaussian input files, given a template PDB file
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// A Gaussian input file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// A file listing Gaussian input files. Defaults to gausscom_list.txt if
    /// it exists
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// The PDB template
    #[arg(short, long)]
    tpl: PathBuf,

    /// Where to write the PDB files. Defaults to the directory of each input
    /// file
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,
}

const DEFAULT_LIST: &str = "gausscom_list.txt";

fn run(args: Args) -> Result<(), Error> {
    let list = args.list.clone().or_else(|| if_exists(DEFAULT_LIST));
    let coms = files::gather(args.file.as_deref(), list.as_deref())?;
    let tpl = PdbTemplate::load(&args.tpl)?;
    if let Some(dir) = &args.out_dir {
        make_dir(dir)?;
    }
    for com in &coms {
        let input = ComFile::load(com)?;
        if input.num_atoms() != tpl.num_atoms() {
            return Err(Error::InvalidData(format!(
                "In gausscom file: {}\n  found {} atoms, but pdb expects {} \
                 atoms",
                com.display(),
                input.num_atoms(),
                tpl.num_atoms()
            )));
        }
        let coords = input.coords().map_err(|e| {
            Error::InvalidData(format!("{}: {e}", com.display()))
        })?;
        let mut atoms = tpl.atoms.clone();
        for (i, ((pdb, com_atom), xyz)) in
            atoms.iter_mut().zip(&input.atoms).zip(coords).enumerate()
        {
            if pdb.element() != com_atom.element() {
                warning(format_args!(
                    "Atom types do not match for atom number {}; pdb atom \
                     type is {} while gausscom type is {}",
                    i + 1,
                    pdb.element(),
                    com_atom.element()
                ));
            }
            pdb.set_coords(xyz);
        }
        let out = files::out_fname(com, ".pdb", args.out_dir.as_deref());
        OutFile::new(out).write(tpl.render(None, &atoms))?;
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
