use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE_CONTENT: &str = "Author of {{ .AppName }} is {{ .Author }}.";

fn fstash(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fstash").unwrap();
    cmd.arg("--root").arg(root).env_remove("FSTASH_HOME").env_remove("RUST_LOG");
    cmd
}

fn create_source(dir: &Path) {
    fs::create_dir_all(dir.join("dir1")).unwrap();
    fs::write(dir.join("file1.txt"), "some static content").unwrap();
    fs::write(dir.join("file2.txt"), TEMPLATE_CONTENT).unwrap();
    fs::write(dir.join("dir1/file3.txt"), "some static content").unwrap();
}

#[test]
fn create_then_list() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    create_source(&source);

    for name in ["sample-stash-2", "sample-stash-1"] {
        fstash(&root)
            .args(["create", "--stash-name", name, "--stash-content"])
            .arg(&source)
            .assert()
            .success()
            .stdout(predicate::str::contains("Created stash"));
    }

    fstash(&root)
        .arg("list")
        .assert()
        .success()
        .stdout("sample-stash-1 sample-stash-2\n");
}

#[test]
fn create_defaults_to_working_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    create_source(&source);

    fstash(&root)
        .current_dir(&source)
        .args(["create", "-n", "from-cwd"])
        .assert()
        .success();

    fstash(&root)
        .args(["show", "-n", "from-cwd"])
        .assert()
        .success()
        .stdout(". [file1.txt file2.txt]\ndir1 [file3.txt]\n");
}

#[test]
fn expand_renders_templates() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    let dest = temp.path().join("dest");
    create_source(&source);

    fstash(&root)
        .args(["create", "-n", "sample-stash", "-c"])
        .arg(&source)
        .assert()
        .success();

    fstash(&root)
        .args(["expand", "-n", "sample-stash", "-d"])
        .arg(&dest)
        .arg(r#"file2={"AppName":"fstash","Author":"dc0d"}"#)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dest.join("file2.txt")).unwrap(),
        "Author of fstash is dc0d."
    );
    assert_eq!(
        fs::read_to_string(dest.join("dir1/file3.txt")).unwrap(),
        "some static content"
    );
}

#[test]
fn pop_copies_verbatim() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    let dest = temp.path().join("dest");
    create_source(&source);

    fstash(&root)
        .args(["create", "-n", "sample-stash", "-c"])
        .arg(&source)
        .assert()
        .success();

    fstash(&root)
        .args(["pop", "-n", "Sample-Stash", "-d"])
        .arg(&dest)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dest.join("file2.txt")).unwrap(),
        TEMPLATE_CONTENT
    );
}

#[test]
fn missing_stash_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let dest = temp.path().join("dest");

    fstash(&root)
        .args(["expand", "-n", "nothing-here", "-d"])
        .arg(&dest)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("not found"));

    assert!(!dest.exists());
}

#[test]
fn expand_path_name_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let outside = temp.path().join("outside");
    let dest = temp.path().join("dest");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("secret.txt"), "secret").unwrap();

    fstash(&root)
        .args(["expand", "-n"])
        .arg(&outside)
        .arg("-d")
        .arg(&dest)
        .assert()
        .failure()
        .code(3);

    assert!(!dest.exists());
}

#[test]
fn invalid_name_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    create_source(&source);

    fstash(&root)
        .args(["create", "-n", "sample-stash::", "-c"])
        .arg(&source)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid stash name"));

    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn missing_template_key_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    let dest = temp.path().join("dest");
    create_source(&source);

    fstash(&root)
        .args(["create", "-n", "sample-stash", "-c"])
        .arg(&source)
        .assert()
        .success();

    fstash(&root)
        .args(["expand", "-n", "sample-stash", "-d"])
        .arg(&dest)
        .arg(r#"file2={"AppName":"fstash"}"#)
        .assert()
        .failure()
        .code(4);
}

#[test]
fn delete_removes_stash() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    create_source(&source);

    fstash(&root)
        .args(["create", "-n", "sample-stash", "-c"])
        .arg(&source)
        .assert()
        .success();

    fstash(&root)
        .args(["delete", "-n", "sample-stash"])
        .assert()
        .success()
        .stdout("Deleted stash sample-stash\n");

    fstash(&root).arg("list").assert().success().stdout("\n");

    fstash(&root)
        .args(["delete", "-n", "sample-stash"])
        .assert()
        .success()
        .stdout("No stash named sample-stash\n");
}

#[test]
fn json_output() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("home");
    let source = temp.path().join("source");
    create_source(&source);

    fstash(&root)
        .args(["--json", "create", "-n", "sample-stash", "-c"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""operation": "create""#))
        .stdout(predicate::str::contains(r#""files": 3"#));

    let assert = fstash(&root).args(["list", "--json"]).assert().success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["stashes"], serde_json::json!(["sample-stash"]));
    assert_eq!(value["success"], true);
}

#[test]
fn storage_root_from_env() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("env-home");
    let source = temp.path().join("source");
    create_source(&source);

    Command::cargo_bin("fstash")
        .unwrap()
        .env("FSTASH_HOME", &root)
        .args(["create", "-n", "env-stash", "-c"])
        .arg(&source)
        .assert()
        .success();

    fstash(&root)
        .arg("list")
        .assert()
        .success()
        .stdout("env-stash\n");
}
