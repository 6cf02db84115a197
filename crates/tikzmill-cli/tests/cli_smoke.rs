use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn dry_run_prints_the_generated_document() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("figure.tikz");
    fs::write(&input, "\\draw (0,0) rectangle (1,1);\n").expect("write input");

    let exe = assert_cmd::cargo_bin!("tikzmill-cli");
    let assert = Command::new(exe)
        .args([
            "--dry-run",
            "--scale",
            "2",
            "--library",
            "arrows,matrix",
            input.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 stdout");
    assert!(stdout.contains("\\documentclass[convert={density=300,size=400x240,outext=.png},border=0pt]{standalone}"));
    assert!(stdout.contains("\\usetikzlibrary{arrows,matrix}"));
    assert!(stdout.contains("\\begin{tikzpicture}[scale=2]"));
    assert!(stdout.contains("    \\draw (0,0) rectangle (1,1);"));
}

#[test]
fn unknown_flags_exit_with_usage() {
    let exe = assert_cmd::cargo_bin!("tikzmill-cli");
    Command::new(exe)
        .arg("--bogus")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn missing_flag_values_exit_with_usage() {
    let exe = assert_cmd::cargo_bin!("tikzmill-cli");
    Command::new(exe).arg("--size").assert().failure().code(2);
}

#[test]
fn malformed_size_exits_with_usage() {
    let exe = assert_cmd::cargo_bin!("tikzmill-cli");
    Command::new(exe)
        .args(["--size", "400x240"])
        .assert()
        .failure()
        .code(2);
}

#[cfg(unix)]
#[test]
fn renders_to_the_requested_out_path_via_a_stub_toolchain() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().expect("tempdir");
    let latex = tmp.path().join("latex-ok");
    fs::write(&latex, "#!/bin/sh\nprintf 'fake-png-bytes' > tikz.png\n").expect("write stub");
    let mut perms = fs::metadata(&latex).expect("stub metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&latex, perms).expect("make stub executable");

    let toolchain = tmp.path().join("toolchain.json");
    fs::write(
        &toolchain,
        format!(r#"{{"latex": "{}"}}"#, latex.display()),
    )
    .expect("write toolchain config");

    let input = tmp.path().join("figure.tikz");
    fs::write(&input, "\\draw (0,0) rectangle (1,1);\n").expect("write input");
    let out = tmp.path().join("figure.png");

    let exe = assert_cmd::cargo_bin!("tikzmill-cli");
    Command::new(exe)
        .args([
            "--toolchain",
            toolchain.to_string_lossy().as_ref(),
            "--out",
            out.to_string_lossy().as_ref(),
            input.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    assert_eq!(fs::read(&out).expect("read output"), b"fake-png-bytes");
}
