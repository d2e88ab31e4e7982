use std::path::PathBuf;
use std::process::Command;

/// Trimmed stdout of a successful git invocation, or `None`.
fn git_stdout(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Rebuild when the named file inside the git dir moves (new commit, branch switch).
fn rerun_if_git_file_changes(name: &str) {
    let Some(raw) = git_stdout(&["rev-parse", "--git-path", name]) else {
        return;
    };
    let mut path = PathBuf::from(raw);
    if path.is_relative() {
        if let Some(manifest_dir) = std::env::var_os("CARGO_MANIFEST_DIR") {
            path = PathBuf::from(manifest_dir).join(path);
        }
    }
    println!("cargo:rerun-if-changed={}", path.display());
}

fn main() {
    rerun_if_git_file_changes("HEAD");
    rerun_if_git_file_changes("packed-refs");
    if let Some(branch_ref) = git_stdout(&["symbolic-ref", "-q", "HEAD"]) {
        rerun_if_git_file_changes(&branch_ref);
    }

    let sha = git_stdout(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "nogit".into());
    let count = git_stdout(&["rev-list", "--count", "HEAD"]).unwrap_or_else(|| "0".into());
    // No git status counts as dirty.
    let dirty = git_stdout(&["status", "--porcelain"]).map_or(true, |status| !status.is_empty());

    println!("cargo:rustc-env=DAYBOOK_GIT_SHA={sha}");
    println!("cargo:rustc-env=DAYBOOK_GIT_COUNT={count}");
    println!(
        "cargo:rustc-env=DAYBOOK_GIT_DIRTY={}",
        if dirty { ".dirty" } else { "" }
    );
}
