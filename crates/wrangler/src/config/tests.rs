use super::*;

#[test]
fn config() {
    let got = Config::load("testfiles/gausslog2pdb.toml").unwrap();
    let want = Config {
        gausslog_list_file: Some(PathBuf::from("logs.txt")),
        gausslog_file: None,
        pdb_tpl_file: Some(PathBuf::from("water.pdb")),
        output_directory: Some(PathBuf::from("pdbs")),
        output_file_name: None,
        only_first_coords: false,
        only_final_coords: true,
        combine_logs: false,
        add_nums_to_type: true,
    };
    assert_eq!(got, want);
}

#[test]
fn unknown_key() {
    let got = Config::load("testfiles/unknown_key.toml").unwrap_err();
    assert_eq!(got.code(), gauss::error::INPUT_ERROR);
}

#[test]
fn missing_default() {
    let got = Config::load_or_default("testfiles/ghost.toml", false).unwrap();
    assert_eq!(got, Config::default());
    let got = Config::load_or_default("testfiles/ghost.toml", true);
    assert!(got.unwrap_err().is_io());
}

#[test]
fn combine_forces_final() {
    let mut got = Config::load("testfiles/combine.toml").unwrap();
    assert!(got.validate().unwrap_err().is_invalid_data());

    got.output_file_name = Some("all".to_owned());
    assert!(got.validate().unwrap().is_some());
    assert!(got.only_final_coords);
    // already final-only, nothing to warn about
    assert!(got.validate().unwrap().is_none());
}

#[test]
fn first_and_final() {
    let mut got = Config {
        only_first_coords: true,
        only_final_coords: true,
        ..Config::default()
    };
    assert!(got.validate().unwrap_err().is_invalid_data());
}
