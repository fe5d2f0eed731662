use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use gauss::{
    Error,
    classify::SignatureSet,
    converge::{self, StepConvergence},
    files,
};
use wrangler::{OutFile, finish, make_dir, parse_args, warning};

/// Check Gaussian output files for normal termination, moving completed ones
/// into a separate directory, or report how close their geometry
/// optimizations are to convergence
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// Print the convergence of every optimization step
    #[arg(short, long)]
    all: bool,

    /// Print the (up to) 10 best converged steps, sorted by convergence
    #[arg(short, long)]
    best: bool,

    /// The directory to search for output files, without descending into
    /// subdirectories
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// A directory to search for output files, including its subdirectories.
    /// Takes precedence over `directory`
    #[arg(long)]
    dir_subdirs: Option<PathBuf>,

    /// The extension of the output files to look for in `directory`
    #[arg(short, long, default_value_t = String::from(".log"))]
    extension: String,

    /// A single file to check. Overrides the directory search
    #[arg(short, long)]
    file_name: Option<PathBuf>,

    /// A file listing the files to check. Overrides the directory search
    #[arg(short = 'l', long)]
    file_list: Option<PathBuf>,

    /// Where to move output files that terminated normally
    #[arg(short, long, default_value = "for_hartree")]
    output_directory: PathBuf,

    /// Write the convergence of each step to a CSV file named after each
    /// output file, skipping the termination check
    #[arg(short, long)]
    step_converg: bool,

    /// Read the convergence of each step only up to this step number, then
    /// print them sorted by convergence
    #[arg(short, long)]
    to_step: Option<usize>,

    /// Print the final convergence of each output file, skipping the
    /// termination check
    #[arg(short = 'z', long)]
    final_converg: bool,
}

/// How to report convergence instead of checking for termination
#[derive(Clone, Copy, Debug, PartialEq)]
enum Report {
    /// every step, to a CSV file per output
    Csv,
    /// every step, in file order
    All,
    /// the best ten steps
    Best,
    /// the best steps up to this step number
    ToStep(usize),
    /// only the last step
    Final,
}

impl Args {
    /// the convergence report requested, if any. any of the per-step options
    /// excludes the final convergence report
    fn report(&self) -> Result<Option<Report>, Error> {
        let step = if let Some(n) = self.to_step {
            if n == 0 {
                return Err(Error::Input(
                    "When the '-t' option is used, a positive step number \
                     must be provided."
                        .to_owned(),
                ));
            }
            Some(Report::ToStep(n))
        } else if self.best {
            Some(Report::Best)
        } else if self.all {
            Some(Report::All)
        } else if self.step_converg {
            Some(Report::Csv)
        } else {
            None
        };
        match (step, self.final_converg) {
            (Some(_), true) => Err(Error::Input(
                "Choose either the '-a', '-b', '-s', '-t', or '-z' option."
                    .to_owned(),
            )),
            (None, true) => Ok(Some(Report::Final)),
            (step, false) => Ok(step),
        }
    }
}

/// the files directly inside `dir` whose names end with `ext`, sorted
fn search_dir(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Err(Error::InvalidData(format!(
            "Could not find the specified input directory '{}'",
            dir.display()
        )));
    }
    let mut ret = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(ext));
        if matches && path.is_file() {
            // report files in the current directory by bare name
            match path.strip_prefix(".") {
                Ok(rel) => ret.push(rel.to_path_buf()),
                Err(_) => ret.push(path),
            }
        }
    }
    if ret.is_empty() {
        return Err(Error::InvalidData(format!(
            "Could not find files with extension '{ext}' in directory '{}'",
            dir.display()
        )));
    }
    ret.sort();
    Ok(ret)
}

#[derive(Default)]
struct Outcomes {
    completed: Vec<PathBuf>,
    failed: Vec<PathBuf>,
    running: Vec<PathBuf>,
}

/// every file below `dir` whose name ends with `ext`, sorted
fn search_tree(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, Error> {
    let mut ret = Vec::new();
    let mut dirs = vec![dir.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        if !dir.is_dir() {
            return Err(Error::InvalidData(format!(
                "Could not find the specified input directory '{}'",
                dir.display()
            )));
        }
        for entry in std::fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))? {
            let path = entry.map_err(|e| Error::io(&dir, e))?.path();
            if path.is_dir() {
                dirs.push(path);
            } else if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(ext))
            {
                ret.push(path);
            }
        }
    }
    if ret.is_empty() {
        return Err(Error::InvalidData(format!(
            "Could not find files with extension '{ext}' in directory '{}'",
            dir.display()
        )));
    }
    ret.sort();
    Ok(ret)
}

fn print_list(header: &str, list: &[PathBuf]) {
    println!("{header}");
    for f in list {
        println!("    {}", f.display());
    }
}

fn print_steps<'a>(steps: impl IntoIterator<Item = &'a StepConvergence>) {
    println!("    StepNum  Convergence");
    for step in steps {
        println!("    {:7} {:10.3}", step.step, step.convergence);
    }
}

fn check_convergence(outputs: &[PathBuf], report: Report) -> Result<(), Error> {
    if report == Report::Final {
        println!("{:36} {:11} {}", "File", "Convergence", "Convergence_Error");
    }
    let last_step = match report {
        Report::ToStep(n) => Some(n),
        _ => None,
    };
    for path in outputs {
        let steps = converge::load(path, last_step)?;
        let name = path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy();
        match report {
            Report::Final => match steps.last() {
                Some(last) => println!(
                    "{name:36} {:11.4} {}",
                    last.convergence,
                    converge::flag(last.error)
                ),
                None => println!("{name:36} {:>11} n/a", "not found"),
            },
            Report::ToStep(_) | Report::Best if steps.is_empty() => {
                println!("No convergence data found for file: {name}");
            }
            Report::ToStep(n) => {
                println!(
                    "Steps sorted by convergence to step number {n} for \
                     file: {name}"
                );
                print_steps(converge::best(&steps, n));
            }
            Report::Best => {
                println!(
                    "Best (up to 10) steps sorted by convergence for file: \
                     {name}"
                );
                print_steps(converge::best(&steps, 10));
            }
            Report::All => {
                println!("Convergence of all steps for file: {name}");
                print_steps(&steps);
            }
            Report::Csv => {
                let mut out = OutFile::new(files::out_fname(
                    path,
                    "_conv_steps.csv",
                    None,
                ));
                let mut lines = vec![files::csv_line(converge::CSV_HEADER)];
                lines.extend(
                    steps.iter().map(|s| files::csv_line(s.csv_row(&name))),
                );
                out.write(lines)?;
            }
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Error> {
    let report = args.report()?;
    let mut outputs =
        if args.file_name.is_some() || args.file_list.is_some() {
            files::gather(args.file_name.as_deref(), args.file_list.as_deref())?
        } else if let Some(dir) = &args.dir_subdirs {
            search_tree(dir, &args.extension)?
        } else {
            search_dir(&args.directory, &args.extension)?
        };
    outputs.sort();
    if let Some(report) = report {
        return check_convergence(&outputs, report);
    }
    make_dir(&args.output_directory)?;

    let sigs = SignatureSet::with_completion();
    let mut out = Outcomes::default();
    for path in outputs {
        let verdict = match sigs.classify_file(&path) {
            Ok(v) => v,
            Err(e) if e.is_invalid_data() => {
                warning(e);
                continue;
            }
            Err(e) => return Err(e),
        };
        if verdict.is_complete() {
            let dest = args
                .output_directory
                .join(path.file_name().unwrap_or(path.as_os_str()));
            std::fs::rename(&path, &dest).map_err(|e| Error::io(&path, e))?;
            log::debug!("moved {} to {}", path.display(), dest.display());
            out.completed.push(path);
        } else if verdict.needs_restart() {
            out.failed.push(path);
        } else {
            out.running.push(path);
        }
    }
    out.completed.sort();
    out.failed.sort();
    out.running.sort();

    if out.completed.is_empty() {
        println!("No normally completed files found.");
    } else {
        print_list("The following files completed normally:", &out.completed);
    }
    if !out.failed.is_empty() {
        print_list("The following files may have failed:", &out.failed);
    }
    if !out.running.is_empty() {
        print_list("The following files may still be running:", &out.running);
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
