use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use gauss::{Error, classify::SignatureSet, files};
use wrangler::{finish, parse_args};

/// Report Gaussian jobs that died in a way that usually means they should
/// simply be resubmitted
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// A file listing the log files to check, one per line. Defaults to
    /// list.txt when no single file is given
    #[arg(short, long)]
    list_file: Option<PathBuf>,

    /// A single log file to check, after any in the list
    #[arg(short, long)]
    file: Option<PathBuf>,
}

const DEFAULT_LIST: &str = "list.txt";

fn run(args: Args) -> Result<(), Error> {
    let list = match (&args.list_file, &args.file) {
        (Some(list), _) => Some(list.as_path()),
        (None, Some(_)) => None,
        (None, None) => Some(Path::new(DEFAULT_LIST)),
    };
    let logs = files::gather(args.file.as_deref(), list)?;
    let sigs = SignatureSet::failures();
    for log in logs {
        let verdict = sigs.classify_file(&log)?;
        if verdict.needs_restart() {
            if let Some(sig) = verdict.signature {
                log::info!("{} matched {}", log.display(), sig.name);
            }
            println!(
                "Need to restart: {}; last line is: {}",
                log.display(),
                verdict.last_line
            );
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
