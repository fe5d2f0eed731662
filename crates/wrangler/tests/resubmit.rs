use std::path::Path;

use assert_cmd::Command;
use tempfile::tempdir;

fn copy_in(dir: &Path, files: &[&str]) {
    for file in files {
        std::fs::copy(Path::new("testfiles").join(file), dir.join(file))
            .unwrap();
    }
}

#[test]
fn one_restart() {
    let dir = tempdir().unwrap();
    copy_in(dir.path(), &["failed_ntr.log", "normal.log"]);
    std::fs::write(dir.path().join("list.txt"), "failed_ntr.log\nnormal.log\n")
        .unwrap();
    let mut cmd = Command::cargo_bin("resubmit_slurm").unwrap();
    let assert = cmd.current_dir(&dir).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_eq!(
        stdout,
        "Need to restart: failed_ntr.log; last line is: NtrErr Called from \
         FileIO.\n"
    );
}

#[test]
fn single_file() {
    let mut cmd = Command::cargo_bin("resubmit_slurm").unwrap();
    cmd.args(["-f", "testfiles/water_opt.log"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn missing_list() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("resubmit_slurm").unwrap();
    cmd.current_dir(&dir).assert().code(2);
}

#[test]
fn missing_log() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("list.txt"), "ghost.log\n").unwrap();
    let mut cmd = Command::cargo_bin("resubmit_slurm").unwrap();
    let assert = cmd.current_dir(&dir).assert().code(2);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("ghost.log"), "{stderr}");
}

#[test]
fn empty_log() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("empty.log"), "\n\n").unwrap();
    let mut cmd = Command::cargo_bin("resubmit_slurm").unwrap();
    cmd.args(["-f", "empty.log"]).current_dir(&dir).assert().code(3);
}

#[test]
fn bad_argument() {
    let mut cmd = Command::cargo_bin("resubmit_slurm").unwrap();
    cmd.arg("--bogus").assert().code(1);
}

#[test]
fn help() {
    let mut cmd = Command::cargo_bin("resubmit_slurm").unwrap();
    cmd.arg("--help").assert().success();
}
