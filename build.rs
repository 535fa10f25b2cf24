//! Build script - copies the linker script into the output directory and,
//! for target builds, links the vendor SDK archives.
//!
//! `QPG_SDK_LIB_DIR` points at the directory holding the prebuilt Qorvo
//! libraries (BleIf, gpSched, OpenThread, drivers). Host builds skip it.

use std::env;
use std::fs;
use std::path::PathBuf;

/// Vendor archives the board layer calls into.
const SDK_LIBS: &[&str] = &[
    "QorvoStack_qpg6200",
    "BleIf_qpg6200",
    "StatusLed_qpg6200",
    "openthread-ftd",
    "qDrv_qpg6200",
];

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=QPG_SDK_LIB_DIR");

    if env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // Copy memory.x to OUT_DIR
    fs::copy("memory.x", out_dir.join("memory.x")).expect("memory.x is readable");

    // Tell cargo to look for linker scripts in OUT_DIR
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    match env::var("QPG_SDK_LIB_DIR") {
        Ok(dir) => {
            println!("cargo:rustc-link-search=native={dir}");
            for lib in SDK_LIBS {
                println!("cargo:rustc-link-lib=static={lib}");
            }
        }
        Err(_) => println!("cargo:warning=QPG_SDK_LIB_DIR not set; vendor symbols will be unresolved"),
    }
}
