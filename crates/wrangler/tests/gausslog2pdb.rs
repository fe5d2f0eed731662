use std::{fs::read_to_string, path::Path};

use assert_cmd::Command;
use tempfile::{TempDir, tempdir};
use test_case::test_case;

fn setup() -> TempDir {
    let dir = tempdir().unwrap();
    for file in ["water_opt.log", "water.pdb"] {
        std::fs::copy(Path::new("testfiles").join(file), dir.path().join(file))
            .unwrap();
    }
    dir
}

fn count_records(s: &str) -> usize {
    s.lines().filter(|l| l.starts_with("REMARK    SCF Done")).count()
}

#[test_case(&[], "water_opt_all.pdb", 2 ; "all")]
#[test_case(&["-a"], "water_opt_first.pdb", 1 ; "first")]
#[test_case(&["-z", "-c", "nums.toml"], "water_opt_final.pdb", 1 ; "final")]
#[test_case(&["-t", "water.pdb", "-z"], "water_opt_tpl.pdb", 1 ; "template")]
fn modes(extra: &[&str], want: &str, records: usize) {
    let dir = setup();
    std::fs::write(dir.path().join("nums.toml"), "add_nums_to_type = true\n")
        .unwrap();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    cmd.args(["-f", "water_opt.log"])
        .args(extra)
        .current_dir(&dir)
        .assert()
        .success()
        .stdout("Wrote file: water_opt.pdb\n");
    let got = read_to_string(dir.path().join("water_opt.pdb")).unwrap();
    assert_eq!(count_records(&got), records);
    assert_eq!(got, read_to_string(Path::new("testfiles").join(want)).unwrap());
}

#[test]
fn template_preserved() {
    let dir = setup();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    cmd.args(["-f", "water_opt.log", "-t", "water.pdb"])
        .current_dir(&dir)
        .assert()
        .success();
    let got = read_to_string(dir.path().join("water_opt.pdb")).unwrap();
    let tpl = read_to_string(dir.path().join("water.pdb")).unwrap();
    // each record is the template plus one energy remark
    let tpl_lines: Vec<_> = tpl.lines().collect();
    let got_lines: Vec<_> = got.lines().collect();
    assert_eq!(got_lines.len(), 2 * (tpl_lines.len() + 1));
    for record in got_lines.chunks(tpl_lines.len() + 1) {
        assert_eq!(record[..2], tpl_lines[..2]);
        assert!(record[2].starts_with("REMARK    SCF Done:"));
        let atoms = record.iter().filter(|l| l.starts_with("HETATM")).count();
        assert_eq!(atoms, 3);
        assert_eq!(record[record.len() - 2..], tpl_lines[tpl_lines.len() - 2..]);
    }
}

#[test]
fn combined() {
    let dir = setup();
    std::fs::copy(
        dir.path().join("water_opt.log"),
        dir.path().join("water_copy.log"),
    )
    .unwrap();
    std::fs::write(dir.path().join("logs.txt"), "water_opt.log\nwater_copy.log\n")
        .unwrap();
    std::fs::write(
        dir.path().join("gausslog2pdb.toml"),
        "gausslog_list_file = \"logs.txt\"\n\
         output_file_name = \"both\"\n\
         output_directory = \"pdbs\"\n\
         combine_logs = true\n",
    )
    .unwrap();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    let assert = cmd.current_dir(&dir).assert().success();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("only the last coordinates"), "{stderr}");

    let got = read_to_string(dir.path().join("pdbs/both.pdb")).unwrap();
    assert_eq!(count_records(&got), 2);
    assert!(got.contains("TITLE     water_opt.log"));
    assert!(got.contains("TITLE     water_copy.log"));
}

#[test]
fn template_mismatch() {
    let dir = setup();
    let tpl = read_to_string(dir.path().join("water.pdb")).unwrap();
    let short: Vec<_> = tpl.lines().filter(|l| !l.contains("H3")).collect();
    std::fs::write(dir.path().join("short.pdb"), short.join("\n")).unwrap();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    cmd.args(["-f", "water_opt.log", "-t", "short.pdb"])
        .current_dir(&dir)
        .assert()
        .code(3);
}

#[test]
fn first_and_final() {
    let dir = setup();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    cmd.args(["-f", "water_opt.log", "-a", "-z"])
        .current_dir(&dir)
        .assert()
        .code(3);
}

#[test]
fn no_coordinates() {
    let dir = setup();
    std::fs::write(dir.path().join("empty.log"), " Entering Gaussian\n")
        .unwrap();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    cmd.args(["-f", "empty.log"]).current_dir(&dir).assert().code(3);
}

#[test]
fn nothing_to_do() {
    let dir = setup();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    cmd.current_dir(&dir).assert().code(1);
}

#[test]
fn missing_config() {
    let dir = setup();
    let mut cmd = Command::cargo_bin("gausslog2pdb").unwrap();
    cmd.args(["-f", "water_opt.log", "-c", "ghost.toml"])
        .current_dir(&dir)
        .assert()
        .code(2);
}
