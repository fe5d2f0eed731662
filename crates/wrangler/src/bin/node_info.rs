use std::process::ExitCode;

use clap::Parser;
use gauss::{
    Error,
    node::{CPUINFO, MEMINFO, NodeInfo, TEST_CPUINFO, TEST_MEMINFO},
};
use wrangler::{finish, parse_args};

/// Report the processors and memory Gaussian should use on this node. Assumes
/// the job has the whole node to itself
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// The name of the node the job is running on
    node_name: String,

    /// Read the bundled sample processor and memory files instead of /proc
    #[arg(short, long, default_value_t = false)]
    testing: bool,
}

fn run(args: Args) -> Result<(), Error> {
    let info = if args.testing {
        NodeInfo::probe(TEST_CPUINFO, TEST_MEMINFO)?
    } else {
        NodeInfo::probe(CPUINFO, MEMINFO)?
    };
    println!("{}", info.report(&args.node_name));
    println!("{} {}", info.proc_list(), info.mem_alloc());
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
