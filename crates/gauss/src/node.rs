//! Processor and memory counts for setting up a Gaussian job on one node

use std::{fmt::Display, path::Path, process::Command};

use crate::Error;

pub const CPUINFO: &str = "/proc/cpuinfo";
pub const MEMINFO: &str = "/proc/meminfo";

/// sample processor and memory files shipped with the crate
pub const TEST_CPUINFO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/cpuinfo");
pub const TEST_MEMINFO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/meminfo");

/// fraction of the total memory Gaussian may use
const TOTAL_FRAC: f64 = 0.75;

/// fraction of the currently free memory Gaussian may use
const FREE_FRAC: f64 = 0.85;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub first_proc: usize,
    pub last_proc: usize,
    /// total memory in kB
    pub mem_total: u64,
    /// free memory in kB
    pub mem_free: u64,
}

impl NodeInfo {
    /// gather processor information by running `grep ^processor` on
    /// `cpuinfo` and memory information from `meminfo`
    pub fn probe(
        cpuinfo: impl AsRef<Path>,
        meminfo: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        let cpuinfo = cpuinfo.as_ref();
        let meminfo = meminfo.as_ref();
        // grep exits with 2 for a missing file and for any other error
        std::fs::metadata(cpuinfo).map_err(|e| Error::io(cpuinfo, e))?;
        let output = Command::new("grep")
            .arg("^processor")
            .arg(cpuinfo)
            .output()
            .map_err(|e| Error::io("grep", e))?;
        if !output.status.success() {
            return Err(Error::InvalidData(format!(
                "grep ^processor {} failed with {}",
                cpuinfo.display(),
                output.status
            )));
        }
        let procs = String::from_utf8_lossy(&output.stdout);
        let mem =
            std::fs::read_to_string(meminfo).map_err(|e| Error::io(meminfo, e))?;
        log::debug!("read processor and memory info for {}", cpuinfo.display());
        Self::from_strs(&procs, &mem)
    }

    /// build a [NodeInfo] from the output of `grep ^processor` and the
    /// contents of a meminfo file
    pub fn from_strs(procs: &str, meminfo: &str) -> Result<Self, Error> {
        let ids = procs
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                l.split_whitespace()
                    .next_back()
                    .and_then(|id| id.parse::<usize>().ok())
                    .ok_or_else(|| {
                        Error::InvalidData(format!(
                            "failed to read a processor id from '{l}'"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let (Some(&first_proc), Some(&last_proc)) = (ids.first(), ids.last())
        else {
            return Err(Error::InvalidData("no processors found".to_owned()));
        };
        if last_proc < first_proc || last_proc - first_proc + 1 != ids.len() {
            return Err(Error::InvalidData(format!(
                "expected contiguous processors from {first_proc} to \
                 {last_proc}, found {}",
                ids.len()
            )));
        }

        let mut mem_total: Option<u64> = None;
        let mut mem_free: Option<u64> = None;
        for line in meminfo.lines() {
            let slot = if line.starts_with("MemTotal") {
                &mut mem_total
            } else if line.starts_with("MemFree") {
                &mut mem_free
            } else {
                continue;
            };
            let fields: Vec<_> = line.split_whitespace().collect();
            let [_, kb, "kB"] = fields[..] else {
                return Err(Error::InvalidData(format!(
                    "expected memory in kB, found '{line}'"
                )));
            };
            *slot = Some(kb.parse().map_err(|_| {
                Error::InvalidData(format!("failed to parse memory in '{line}'"))
            })?);
        }
        let (Some(mem_total), Some(mem_free)) = (mem_total, mem_free) else {
            return Err(Error::InvalidData(
                "did not find both MemTotal and MemFree".to_owned(),
            ));
        };

        Ok(Self {
            first_proc,
            last_proc,
            mem_total,
            mem_free,
        })
    }

    pub fn num_procs(&self) -> usize {
        self.last_proc - self.first_proc + 1
    }

    /// the processor range in the `first-last` form Gaussian expects
    pub fn proc_list(&self) -> String {
        format!("{}-{}", self.first_proc, self.last_proc)
    }

    /// memory to give Gaussian in kB: the smaller of 75% of the total and 85%
    /// of the free memory, truncated
    pub fn mem_alloc(&self) -> u64 {
        let total = TOTAL_FRAC * self.mem_total as f64;
        let free = FREE_FRAC * self.mem_free as f64;
        total.min(free) as u64
    }

    /// a human-readable description of the node and the allocation
    pub fn report(&self, node: impl Display) -> String {
        format!(
            "On node {node}, found {} processors, {} kB total memory and {} \
             kB free memory.\nWill instruct Gaussian to use up to {} \
             processors and {} kB of memory.",
            self.num_procs(),
            self.mem_total,
            self.mem_free,
            self.num_procs(),
            self.mem_alloc()
        )
    }
}
