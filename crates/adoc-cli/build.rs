//! Embed library search paths so the `adoc` binary finds libpython at run time.

use std::process::Command;

const DARWIN_RPATHS: &[&str] = &[
    "@executable_path",
    "@executable_path/../lib",
    "/opt/homebrew/lib",
    "/usr/local/lib",
    "/Library/Frameworks/Python.framework/Versions/Current/lib",
];

const LINUX_RPATHS: &[&str] = &["$ORIGIN", "$ORIGIN/../lib", "/usr/lib", "/usr/lib64", "/usr/local/lib"];

fn main() {
    println!("cargo:rerun-if-env-changed=PYO3_PYTHON");

    let target = std::env::var("TARGET").unwrap_or_default();
    let rpaths = if target.contains("apple-darwin") {
        DARWIN_RPATHS
    } else if target.contains("linux") {
        LINUX_RPATHS
    } else {
        return;
    };

    for path in rpaths {
        println!("cargo:rustc-link-arg=-Wl,-rpath,{path}");
    }
    if let Some(libdir) = python_libdir() {
        println!("cargo:rustc-link-arg=-Wl,-rpath,{libdir}");
    }
}

/// LIBDIR of the interpreter pyo3 builds against
fn python_libdir() -> Option<String> {
    let python = std::env::var("PYO3_PYTHON").unwrap_or_else(|_| "python3".to_string());
    let output = Command::new(python)
        .args(["-c", "import sysconfig; print(sysconfig.get_config_var('LIBDIR') or '')"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let libdir = String::from_utf8(output.stdout).ok()?;
    let libdir = libdir.trim();
    (!libdir.is_empty()).then(|| libdir.to_string())
}
