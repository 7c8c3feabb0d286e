use std::process::Command;

fn main() {
    // version from `git describe` when building from a checkout, the package version otherwise
    let version = Command::new("git")
        .args(&["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=VERSION_STRING={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
