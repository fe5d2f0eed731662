use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use gauss::{
    Error, files,
    gausslog::{self, Flow, LogAtom},
    pdb::{PdbAtom, PdbTemplate},
};
use wrangler::{
    OutFile,
    config::{Config, DEFAULT_CONFIG, DEFAULT_LIST},
    finish, if_exists, make_dir, parse_args, warning,
};

/// Create PDB files from the coordinates in Gaussian log files
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// A TOML configuration file. Defaults to gausslog2pdb.toml, which is
    /// only read if it exists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// A Gaussian log file. Overrides gausslog_file in the config
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// A file listing Gaussian log files. Overrides gausslog_list_file in
    /// the config
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// A PDB template file. Overrides pdb_tpl_file in the config
    #[arg(short, long)]
    tpl: Option<PathBuf>,

    /// The output directory. Overrides output_directory in the config
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// The name of the created PDB file, instead of the log file name
    #[arg(short, long)]
    out_fname: Option<String>,

    /// Only write the first set of coordinates from each log
    #[arg(short = 'a', long, default_value_t = false)]
    only_first: bool,

    /// Only write the last set of coordinates from each log
    #[arg(short = 'z', long, default_value_t = false)]
    only_final: bool,
}

impl Args {
    /// command-line values take precedence over the config file
    fn apply(self, cfg: &mut Config) {
        if self.file.is_some() {
            cfg.gausslog_file = self.file;
        }
        if self.list.is_some() {
            cfg.gausslog_list_file = self.list;
        }
        if self.tpl.is_some() {
            cfg.pdb_tpl_file = self.tpl;
        }
        if self.out_dir.is_some() {
            cfg.output_directory = self.out_dir;
        }
        if self.out_fname.is_some() {
            cfg.output_file_name = self.out_fname;
        }
        cfg.only_first_coords |= self.only_first;
        cfg.only_final_coords |= self.only_final;
    }
}

/// `type` for atom `idx`: its element, followed by its 1-based position if
/// `add_num`, truncated to fit the four-character name column
fn atom_type(element: &str, idx: usize, add_num: bool) -> String {
    let mut ret = element.to_owned();
    if add_num {
        let num = (idx + 1).to_string();
        let room = 4usize.saturating_sub(element.len());
        ret.push_str(&num[..room.min(num.len())]);
    }
    ret
}

/// convert `atoms` from `log` into PDB atoms, either by filling in the
/// coordinates of the template's atoms or by making new records
fn pdb_atoms(
    log: &Path,
    atoms: &[LogAtom],
    tpl: Option<&PdbTemplate>,
    add_nums: bool,
) -> Result<Vec<PdbAtom>, Error> {
    let Some(tpl) = tpl else {
        return Ok(atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| {
                let ty = atom_type(atom.element, i, add_nums);
                let mut ret = PdbAtom::new(i + 1, &ty, atom.element);
                ret.set_coords(atom.xyz);
                ret
            })
            .collect());
    };
    if atoms.len() != tpl.num_atoms() {
        return Err(Error::InvalidData(format!(
            "In gausslog file: {}\nfound {} atoms, while the pdb template has \
             {} atoms",
            log.display(),
            atoms.len(),
            tpl.num_atoms()
        )));
    }
    let mut ret = tpl.atoms.clone();
    for (i, (pdb, atom)) in ret.iter_mut().zip(atoms).enumerate() {
        if pdb.element() != atom.element {
            warning(format_args!(
                "Atom element types do not match for atom number {}; pdb atom \
                 type is {} while gausslog type is {}",
                i + 1,
                pdb.element(),
                atom.element
            ));
        }
        pdb.set_coords(atom.xyz);
    }
    Ok(ret)
}

fn process_log(
    cfg: &Config,
    log: &Path,
    tpl: Option<&PdbTemplate>,
    out: &mut OutFile,
) -> Result<(), Error> {
    let titled;
    let frame = match tpl {
        Some(tpl) => tpl,
        None => {
            titled = PdbTemplate::titled(log.display());
            &titled
        }
    };
    let mut write = |atoms: &[LogAtom], remark: Option<&str>| {
        let atoms = pdb_atoms(log, atoms, tpl, cfg.add_nums_to_type)?;
        out.write(frame.render(remark, &atoms))
    };
    let not_found = || {
        Error::InvalidData(format!(
            "Did not find Gaussian output coordinates in file {}",
            log.display()
        ))
    };

    if cfg.only_final_coords {
        let last = gausslog::scan_file(log, |_| Ok(Flow::Continue))?
            .ok_or_else(not_found)?;
        return write(&last.atoms, last.remark.as_deref());
    }

    let mut written = 0;
    gausslog::scan_file(log, |rec| {
        write(&rec.atoms, rec.remark.as_deref())?;
        written += 1;
        Ok(if cfg.only_first_coords {
            Flow::Stop
        } else {
            Flow::Continue
        })
    })?;
    log::debug!("wrote {written} records from {}", log.display());
    if written == 0 {
        return Err(not_found());
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Error> {
    let explicit = args.config.is_some();
    let config_file =
        args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut cfg = Config::load_or_default(&config_file, explicit)?;
    args.apply(&mut cfg);
    if let Some(w) = cfg.validate()? {
        warning(w);
    }
    let out_dir = cfg.output_directory.as_deref();
    if let Some(dir) = out_dir {
        make_dir(dir)?;
    }

    let list = cfg.gausslog_list_file.clone().or_else(|| if_exists(DEFAULT_LIST));
    let logs = files::gather(cfg.gausslog_file.as_deref(), list.as_deref())?;
    let tpl = cfg.pdb_tpl_file.as_ref().map(PdbTemplate::load).transpose()?;

    let mut combined = match (&cfg.output_file_name, cfg.combine_logs) {
        (Some(name), true) => {
            Some(OutFile::new(files::out_fname(name, ".pdb", out_dir)))
        }
        _ => None,
    };
    for log in &logs {
        let mut own;
        let out = match combined.as_mut() {
            Some(out) => out,
            None => {
                let src = cfg
                    .output_file_name
                    .as_deref()
                    .map(Path::new)
                    .unwrap_or(log.as_path());
                own = OutFile::new(files::out_fname(src, ".pdb", out_dir));
                &mut own
            }
        };
        process_log(&cfg, log, tpl.as_ref(), out)?;
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
