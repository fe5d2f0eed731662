use std::path::Path;

use assert_cmd::Command;
use insta::assert_snapshot;
use tempfile::{TempDir, tempdir};

fn setup() -> TempDir {
    let dir = tempdir().unwrap();
    for file in ["water_opt.log", "failed_ntr.log", "normal.log"] {
        std::fs::copy(Path::new("testfiles").join(file), dir.path().join(file))
            .unwrap();
    }
    dir
}

#[test]
fn sort_directory() {
    let dir = setup();
    std::fs::write(dir.path().join("blank.log"), "\n   \n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "Normal termination of Gaussian")
        .unwrap();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd.current_dir(&dir).assert().success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_snapshot!(stdout, @r"
    The following files completed normally:
        water_opt.log
    The following files may have failed:
        failed_ntr.log
    The following files may still be running:
        normal.log
    ");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARNING:"), "{stderr}");
    assert!(stderr.contains("blank.log"), "{stderr}");

    let moved = dir.path().join("for_hartree/water_opt.log");
    assert!(moved.is_file());
    assert!(!dir.path().join("water_opt.log").exists());
    assert!(dir.path().join("failed_ntr.log").exists());
    assert!(dir.path().join("notes.txt").exists());
}

#[test]
fn subdirectory_paths() {
    let dir = setup();
    std::fs::create_dir(dir.path().join("logs")).unwrap();
    std::fs::rename(
        dir.path().join("failed_ntr.log"),
        dir.path().join("logs/failed_ntr.log"),
    )
    .unwrap();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["-d", "logs"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    No normally completed files found.
    The following files may have failed:
        logs/failed_ntr.log
    ");
}

#[test]
fn single_file() {
    let dir = setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["-f", "normal.log", "-o", "done"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    No normally completed files found.
    The following files may still be running:
        normal.log
    ");
    assert!(dir.path().join("done").is_dir());
}

#[test]
fn no_matching_files() {
    let dir = setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    cmd.args(["-e", ".out"]).current_dir(&dir).assert().code(3);
}

#[test]
fn missing_directory() {
    let dir = setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    cmd.args(["-d", "nowhere"]).current_dir(&dir).assert().code(3);
}

fn converge_setup() -> TempDir {
    let dir = setup();
    std::fs::copy("testfiles/water_conv.log", dir.path().join("water_conv.log"))
        .unwrap();
    dir
}

#[test]
fn final_convergence() {
    let dir = converge_setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    cmd.args(["-z", "-l", "list.txt"])
        .current_dir(&dir)
        .assert()
        .code(2);

    std::fs::write(dir.path().join("list.txt"), "water_opt.log\nwater_conv.log\n")
        .unwrap();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["-z", "-l", "list.txt"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    File                                 Convergence Convergence_Error
    water_conv.log                            0.4000 False
    water_opt.log                          not found n/a
    ");
    // no termination check, so nothing moves
    assert!(dir.path().join("water_opt.log").exists());
    assert!(!dir.path().join("for_hartree").exists());
}

#[test]
fn best_steps() {
    let dir = converge_setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["-b", "-f", "water_conv.log"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    Best (up to 10) steps sorted by convergence for file: water_conv.log
        StepNum  Convergence
              3      0.400
              1     87.580
              2   2001.722
    ");
}

#[test]
fn to_step() {
    let dir = converge_setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["-t", "2", "-f", "water_conv.log"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    Steps sorted by convergence to step number 2 for file: water_conv.log
        StepNum  Convergence
              1     87.580
              2   2001.722
    ");
}

#[test]
fn all_steps() {
    let dir = converge_setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["-a", "-f", "water_opt.log"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    Convergence of all steps for file: water_opt.log
        StepNum  Convergence
    ");

    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["-b", "-f", "water_opt.log"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @"No convergence data found for file: water_opt.log");
}

#[test]
fn step_csv() {
    let dir = converge_setup();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    cmd.args(["-s", "-f", "water_conv.log"])
        .current_dir(&dir)
        .assert()
        .success()
        .stdout("Wrote file: water_conv_conv_steps.csv\n");
    let got =
        std::fs::read_to_string(dir.path().join("water_conv_conv_steps.csv"))
            .unwrap();
    let lines: Vec<_> = got.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "File,step_number,Max Force,RMS Force,Max Displacement,\
         RMS Displacement,Convergence,Convergence_Error"
    );
    assert!(lines[1].starts_with("water_conv.log,1,0.012345,"), "{got}");
    assert!(lines[1].ends_with(",True"), "{got}");
    assert_eq!(
        lines[3],
        "water_conv.log,3,0.000045,0.00003,0.00018,0.00012,0.4,False"
    );
}

#[test]
fn conflicting_reports() {
    let dir = converge_setup();
    for args in [["-a", "-z"], ["-s", "-z"], ["-t", "0"]] {
        let mut cmd = Command::cargo_bin("check_gauss").unwrap();
        cmd.args(args).current_dir(&dir).assert().code(1);
    }
}

#[test]
fn subdirectories() {
    let dir = converge_setup();
    std::fs::create_dir_all(dir.path().join("runs/a")).unwrap();
    std::fs::rename(
        dir.path().join("water_conv.log"),
        dir.path().join("runs/a/water_conv.log"),
    )
    .unwrap();
    let mut cmd = Command::cargo_bin("check_gauss").unwrap();
    let assert = cmd
        .args(["--dir-subdirs", "runs", "-z"])
        .current_dir(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("water_conv.log                            0.4000 False"));
}
