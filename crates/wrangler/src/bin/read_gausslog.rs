use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use gauss::{
    Error, files,
    summary::{CSV_HEADER, JobKind, Summary},
};
use wrangler::{finish, parse_args};

/// Summarize the results in Gaussian log files
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// A Gaussian log file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// A file listing Gaussian log files
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// The type of calculation each log must contain the results of: cp or
    /// stable
    #[arg(short, long)]
    job_type: Option<JobKind>,

    /// Print the summaries as JSON instead of CSV
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn run(args: Args) -> Result<(), Error> {
    let logs = files::gather(args.file.as_deref(), args.list.as_deref())?;
    let mut summaries = Vec::with_capacity(logs.len());
    for log in &logs {
        let summary = Summary::load(log)?;
        if let Some(kind) = args.job_type {
            summary.require(kind)?;
        }
        summaries.push(summary);
    }
    if args.json {
        let s = serde_json::to_string_pretty(&summaries).map_err(|e| {
            Error::InvalidData(format!("failed to serialize summaries with {e}"))
        })?;
        println!("{s}");
    } else {
        println!("{}", CSV_HEADER.join(","));
        for summary in &summaries {
            println!("{}", summary.csv_row());
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
