use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn hex_flags_apply_per_width() {
    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(fixture("level.dat")).arg("--hex16").arg("--extra-hex32");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<property name="width" type="int16" value="0x0280"/>"#,
        ))
        .stdout(predicate::str::contains(
            r#"<property name="hp" type="int32" value="0x000186A0"/>"#,
        ))
        .stdout(predicate::str::contains(
            r#"<property name="id" type="int8" value="3"/>"#,
        ));
}

#[test]
fn hex_rendering_round_trips() {
    let dir = tempdir().unwrap();
    let xml = dir.path().join("level.xml");
    let back = dir.path().join("level.dat");

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(fixture("level.dat"))
        .arg("--hex8")
        .arg("--hex16")
        .arg("--hex32")
        .arg("-o")
        .arg(&xml);
    cmd.assert().success();
    assert!(fs::read_to_string(&xml)
        .unwrap()
        .contains(r#"value="0x03""#));

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(&xml).arg("-o").arg(&back);
    cmd.assert().success();

    assert_eq!(fs::read(&back).unwrap(), fs::read(fixture("level.dat")).unwrap());
}

#[test]
fn config_file_sets_hex_rendering() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("ibx.toml");
    fs::write(
        &config_path,
        r#"[decode]
hex8 = true
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(fixture("level.dat"))
        .arg("--config")
        .arg(config_path.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<property name="id" type="int8" value="0x03"/>"#,
        ))
        .stdout(predicate::str::contains(
            r#"<property name="width" type="int16" value="640"/>"#,
        ));
}

#[test]
fn noshare_writes_one_slot_per_property() {
    let dir = tempdir().unwrap();
    let shared = dir.path().join("shared.dat");
    let unshared = dir.path().join("unshared.dat");

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(fixture("level.xml")).arg("-o").arg(&shared);
    cmd.assert().success();

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(fixture("level.xml"))
        .arg("--noshare")
        .arg("-o")
        .arg(&unshared);
    cmd.assert().success();

    let shared = fs::read(&shared).unwrap();
    let unshared = fs::read(&unshared).unwrap();
    assert!(unshared.len() > shared.len());

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg("inspect").arg(dir.path().join("unshared.dat"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("values (10):"));
}

#[test]
fn encoding_marker_override() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("level.dat");

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(fixture("level.xml"))
        .arg("--extra-encoding-marker")
        .arg("0x02")
        .arg("-o")
        .arg(&output);
    cmd.assert().success();

    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg("inspect").arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("encoding: 0x02\n"));
}

#[test]
fn invalid_extra_value_is_an_error() {
    let mut cmd = cargo_bin_cmd!("ibx");
    cmd.arg(fixture("level.dat")).arg("--extra-hex8").arg("maybe");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid boolean value 'maybe' for --extra-hex8",
        ));
}
