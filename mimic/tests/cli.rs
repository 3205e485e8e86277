use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

const DISPLAY: &str = "package pegomocktest\n\nimport \"net/http\"\n\ntype MyDisplay interface {\n\tShow(something string)\n\tServe(r *http.Request) error\n}\n";

fn mimic(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mimic"));
    cmd.current_dir(dir).env_remove("MIMIC_LOG");
    cmd
}

fn project() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    fs::write(
        temp.path().join("go.mod"),
        "module example.com/pegomocktest\n\ngo 1.21\n",
    )
    .unwrap();
    fs::write(temp.path().join("display.go"), DISPLAY).unwrap();
    temp
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_generate_without_arguments_is_usage_error() {
    let temp = project();
    let output = mimic(temp.path()).arg("generate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage: mimic generate"));
}

#[test]
fn test_generate_with_too_many_arguments() {
    let temp = project();
    let output = mimic(temp.path())
        .args(["generate", "io", "Reader", "Writer"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_generate_static_my_display() {
    let temp = project();
    mimic(temp.path())
        .args(["generate", "--use-static-model-gen", "MyDisplay"])
        .assert()
        .success();

    let mock = fs::read_to_string(temp.path().join("mock_mydisplay_test.go")).unwrap();
    assert!(mock.starts_with("// Code generated by mimic. DO NOT EDIT.\n"));
    assert!(mock.contains("\npackage pegomocktest_test\n"));
    assert!(mock.contains("func (mock *MockMyDisplay) Show(something string) {"));
    assert!(mock.contains("func (mock *MockMyDisplay) Serve(r *http.Request) error {"));
}

#[test]
fn test_experimental_flag_alias() {
    let temp = project();
    mimic(temp.path())
        .args(["generate", "--use-experimental-model-gen", "MyDisplay"])
        .assert()
        .success();
    assert!(temp.path().join("mock_mydisplay_test.go").exists());
}

#[test]
fn test_generate_from_go_file() {
    let temp = project();
    mimic(temp.path())
        .args(["generate", "--mock-name", "FakeDisplay", "display.go"])
        .assert()
        .success();

    let mock = fs::read_to_string(temp.path().join("mock_display_test.go")).unwrap();
    assert!(mock.contains("type FakeDisplay struct {"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = project();
    let output = mimic(temp.path())
        .args(["generate", "--dry-run", "-m", "--use-static-model-gen", "MyDisplay"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("── mock_mydisplay_test.go ──"));
    assert!(stdout.contains("matchers/ptr_to_http_request.go"));
    assert!(stdout.contains("3 files would be generated"));
    assert!(!temp.path().join("mock_mydisplay_test.go").exists());
    assert!(!temp.path().join("matchers").exists());
}

#[test]
fn test_static_analysis_rejects_several_interfaces() {
    let temp = project();
    let output = mimic(temp.path())
        .args(["generate", "--use-static-model-gen", "MyDisplay,Other"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("mimic::unsupported_model_gen_mode"));
    assert!(fs::read_dir(temp.path()).unwrap().count() == 2);
}

#[test]
fn test_missing_interface() {
    let temp = project();
    let output = mimic(temp.path())
        .args(["generate", "--use-static-model-gen", "Missing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Missing"));
}

#[test]
fn test_custom_output_and_package() {
    let temp = project();
    mimic(temp.path())
        .args([
            "generate",
            "--use-static-model-gen",
            "-o",
            "mocks/display.go",
            "--package",
            "mocks",
            "MyDisplay",
        ])
        .assert()
        .success();

    let mock = fs::read_to_string(temp.path().join("mocks/display.go")).unwrap();
    assert!(mock.contains("\npackage mocks\n"));
}

#[test]
fn test_remove_list_files() {
    let temp = project();
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("interfaces_to_mock"), "MyDisplay\n").unwrap();
    fs::write(temp.path().join("sub/interfaces_to_mock"), "").unwrap();

    let output = mimic(temp.path())
        .args(["remove", "--recursive"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Removed:"));
    assert!(!temp.path().join("interfaces_to_mock").exists());
    assert!(!temp.path().join("sub/interfaces_to_mock").exists());
}

#[test]
fn test_completions() {
    let output = Command::new(env!("CARGO_BIN_EXE_mimic"))
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("mimic"));
}
