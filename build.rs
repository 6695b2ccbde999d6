//! Builds the MathJax bundle from `js/` and hands it to `include_str!`.
//!
//! An existing `js/out/index.js` is used as is. Otherwise `npm install` and
//! `npm run build` are tried; set `TEX2SVG_SKIP_NPM` to skip them. When no
//! bundle can be produced the crate still builds, without the
//! `embedded_mathjax` cfg, and MathJax then has to be supplied at runtime.

use std::{env, fs, path::Path, process::Command};

fn npm(js: &Path, args: &[&str]) -> bool {
    match Command::new("npm").args(args).current_dir(js).status() {
        Ok(status) => status.success(),
        Err(err) => {
            println!("cargo:warning=could not run npm {}: {err}", args.join(" "));
            false
        }
    }
}

fn main() {
    println!("cargo:rustc-check-cfg=cfg(embedded_mathjax)");
    println!("cargo:rerun-if-changed=js/src");
    println!("cargo:rerun-if-changed=js/package.json");
    println!("cargo:rerun-if-changed=js/out/index.js");
    println!("cargo:rerun-if-env-changed=TEX2SVG_SKIP_NPM");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let js = Path::new(&manifest_dir).join("js");
    let bundle = js.join("out/index.js");

    if !bundle.is_file() && env::var_os("TEX2SVG_SKIP_NPM").is_none() {
        let _ = npm(&js, &["install", "--no-audit", "--no-fund"]) && npm(&js, &["run", "build"]);
    }

    if !bundle.is_file() {
        println!(
            "cargo:warning=no MathJax bundle at {}; tex2svg will need --mathjax or $TEX2SVG_MATHJAX",
            bundle.display()
        );
        return;
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::copy(&bundle, Path::new(&out_dir).join("mathjax.js")).expect("copy MathJax bundle");
    println!("cargo:rustc-cfg=embedded_mathjax");
}
