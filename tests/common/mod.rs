use assert_cmd::Command;
use std::path::Path;

pub fn notepad_cmd() -> Command {
    let mut cmd = Command::cargo_bin("notepad").unwrap();
    cmd.env_remove("NOTEPAD_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Initialize a notebook at `root`
#[allow(dead_code)]
pub fn init_notebook(root: &Path) {
    notepad_cmd().arg("init").arg(root).assert().success();
}

/// Run a command inside `root` and return its stdout
#[allow(dead_code)]
pub fn run_in(root: &Path, args: &[&str]) -> String {
    let output = notepad_cmd()
        .current_dir(root)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).unwrap()
}
