use assert_cmd::Command;
use std::io::Write;

fn script_file(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{source}").expect("write script");
    file
}

#[test]
fn running_a_well_formed_script_exits_successfully() {
    let file = script_file("print 1 + 1;");

    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn a_parse_error_exits_with_65() {
    let file = script_file("var a = ;");

    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(65);
}

#[test]
fn a_runtime_error_exits_with_70() {
    let file = script_file("print 1 + \"a\";");

    Command::cargo_bin("lumen")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(70);
}

#[test]
fn too_many_arguments_exits_with_64() {
    Command::cargo_bin("lumen")
        .unwrap()
        .arg("one")
        .arg("two")
        .assert()
        .code(64);
}
