// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::env;
use std::path::PathBuf;

const DEFAULT_LIB_NAME: &str = "WebIfcDll";

fn main() {
    println!("cargo:rerun-if-env-changed=WEB_IFC_LIB_DIR");
    println!("cargo:rerun-if-env-changed=WEB_IFC_LIB_NAME");

    // Declarations are compiled out without the feature, nothing to link
    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("WEB_IFC_LIB_DIR").map(PathBuf::from) {
        if !dir.is_dir() {
            println!(
                "cargo:warning=WEB_IFC_LIB_DIR does not exist: {}",
                dir.display()
            );
        }
        println!("cargo:rustc-link-search=native={}", dir.display());
    }

    let name = env::var("WEB_IFC_LIB_NAME").unwrap_or_else(|_| DEFAULT_LIB_NAME.to_string());
    println!("cargo:rustc-link-lib=dylib={}", name);
}
