use assert_cmd::Command;

const REFERENCE_POINTS: [&str; 18] = [
    "5", "5", "10", "5", "11", "6", "11", "8", "9", "10", "5", "10", "3", "8", "3", "6", "4", "5",
];

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("openlabel 0.3.0\n");
}

// Check subcommand tests

#[test]
fn check_valid_document_succeeds() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["check", "tests/fixtures/valid.json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Check passed"));
}

#[test]
fn check_valid_document_passes_strict() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["check", "--strict", "tests/fixtures/valid.json"]);
    cmd.assert().success();
}

#[test]
fn check_invalid_document_fails() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["check", "tests/fixtures/invalid.json"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("error(s)"))
        .stderr(predicates::str::contains("Error:"));
}

#[test]
fn check_reports_broken_invariants() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["check", "tests/fixtures/invalid.json"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("DocumentIntervalMismatch"))
        .stdout(predicates::str::contains("MissingFramePresence"))
        .stdout(predicates::str::contains("PointerOutsideElement"))
        .stdout(predicates::str::contains("UnknownFrameElement"))
        .stdout(predicates::str::contains("EmptyFrame"));
}

#[test]
fn check_json_output_format() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["check", "tests/fixtures/invalid.json", "--output", "json"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("\"issues\""))
        .stdout(predicates::str::contains("\"code\": \"FrameOutsideDocument\""));
}

#[test]
fn check_output_from_env() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.env("OPENLABEL_OUTPUT", "json");
    cmd.args(["check", "tests/fixtures/valid.json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"issues\": []"));
}

#[test]
fn check_warnings_fail_only_when_strict() {
    let mut lenient = Command::cargo_bin("openlabel").unwrap();
    lenient.args(["check", "tests/fixtures/warnings.json"]);
    lenient
        .assert()
        .success()
        .stdout(predicates::str::contains("IncompleteRelation"));

    let mut strict = Command::cargo_bin("openlabel").unwrap();
    strict.args(["check", "--strict", "tests/fixtures/warnings.json"]);
    strict.assert().failure();
}

#[test]
fn check_rejects_unknown_output() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["check", "tests/fixtures/valid.json", "--output", "yaml"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("yaml"));
}

#[test]
fn check_missing_file_fails() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["check", "tests/fixtures/does_not_exist.json"]);
    cmd.assert().failure();
}

#[test]
fn check_document_written_by_library() {
    let mut vcd = openlabel::Vcd::new();
    let uid = vcd
        .add_element(
            openlabel::ElementType::Object,
            "ped",
            "Pedestrian",
            openlabel::FrameIntervals::from_range(0, 9).unwrap(),
        )
        .unwrap();
    vcd.set_element_data(
        openlabel::ElementType::Object,
        &uid,
        openlabel::ElementData::bbox("box", [1.0, 2.0, 3.0, 4.0]),
        openlabel::FrameIntervals::from_range(2, 4).unwrap(),
        openlabel::SetMode::Union,
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ped.json");
    vcd.save(&path, true).unwrap();

    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.arg("check").arg(&path).arg("--strict");
    cmd.assert().success();
}

// Stats subcommand tests

#[test]
fn stats_text_output() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["stats", "tests/fixtures/valid.json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Summary"))
        .stdout(predicates::str::contains("[0, 2]"))
        .stdout(predicates::str::contains("object"))
        .stdout(predicates::str::contains("Car"));
}

#[test]
fn stats_json_output() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["stats", "tests/fixtures/valid.json", "--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"root_key\": \"openlabel\""))
        .stdout(predicates::str::contains("\"frames\": 3"));
}

// Poly2d subcommand tests

#[test]
fn poly2d_encode_reference_polygon() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["poly2d", "encode"]).args(REFERENCE_POINTS);
    cmd.assert().success().stdout("5 5 1 mBIIOIII\n");
}

#[test]
fn poly2d_decode_reference_polygon() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["poly2d", "decode", "5", "5", "1", "mBIIOIII"]);
    cmd.assert()
        .success()
        .stdout(format!("{}\n", REFERENCE_POINTS.join(" ")));
}

#[test]
fn poly2d_encode_negative_coordinates() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["poly2d", "encode", "-3", "-3", "-3", "0"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::starts_with("-3 -3 "));
}

#[test]
fn poly2d_decode_rejects_corrupt_code() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["poly2d", "decode", "5", "5", "0", "m!"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("chain code"));
}

#[test]
fn poly2d_encode_rejects_odd_coordinates() {
    let mut cmd = Command::cargo_bin("openlabel").unwrap();
    cmd.args(["poly2d", "encode", "1", "2", "3"]);
    cmd.assert().failure();
}
