use assert_cmd::Command;
use insta::assert_snapshot;

#[test]
fn csv() {
    let mut cmd = Command::cargo_bin("read_gausslog").unwrap();
    let assert = cmd.args(["-f", "testfiles/water_opt.log"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    File Name,Stoichiometry,Charge,Mult,Functional,Basis Set,Energy (Hartrees),Dipole (Debye),ZPE (Hartrees),H298 (Hartrees),G298 (Hartrees),Counterpoise Corrected Energy (Hartrees),Stable,Freq 1,Freq 2
    testfiles/water_opt.log,H2O,0,1,b3lyp,6-31g(d),-76.4089533205,2.0956,0.021112,-76.384062,-76.405487,,,1713.5049,3727.2156
    ");
}

#[test]
fn json() {
    let mut cmd = Command::cargo_bin("read_gausslog").unwrap();
    let assert = cmd
        .args(["-f", "testfiles/water_opt.log", "--json"])
        .assert()
        .success();
    let got: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let rows = got.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["stoich"], "H2O");
    assert_eq!(rows[0]["energy"], -76.4089533205);
    assert!(rows[0]["counterpoise"].is_null());
}

#[test]
fn missing_counterpoise() {
    let mut cmd = Command::cargo_bin("read_gausslog").unwrap();
    cmd.args(["-f", "testfiles/water_opt.log", "-j", "cp"])
        .assert()
        .code(3);
}

#[test]
fn unknown_job_type() {
    let mut cmd = Command::cargo_bin("read_gausslog").unwrap();
    cmd.args(["-f", "testfiles/water_opt.log", "-j", "freq"])
        .assert()
        .code(1);
}

#[test]
fn node_info() {
    let mut cmd = Command::cargo_bin("node_info").unwrap();
    let assert = cmd.args(["node1", "-t"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_snapshot!(stdout, @r"
    On node node1, found 4 processors, 196438496 kB total memory and 189742284 kB free memory.
    Will instruct Gaussian to use up to 4 processors and 147328872 kB of memory.
    0-3 147328872
    ");
}

#[test]
fn node_info_needs_name() {
    let mut cmd = Command::cargo_bin("node_info").unwrap();
    cmd.assert().code(1);
}
