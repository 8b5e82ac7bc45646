//! Build script: embeds version information from git into the binary.

use std::process::Command;

/// `git describe` of the checkout being built, if git and a repository exist.
fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|v| !v.is_empty())
}

fn main() {
    let version = std::env::var("DOTFILES_VERSION").ok().or_else(git_describe);
    if let Some(version) = version {
        println!("cargo:rustc-env=DOTFILES_VERSION={version}");
    }

    for watched in [".git/HEAD", ".git/refs/"] {
        println!("cargo:rerun-if-changed={watched}");
    }
    println!("cargo:rerun-if-env-changed=DOTFILES_VERSION");
}
