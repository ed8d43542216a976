//! Build script for generating WGSL constants from the Rust constants module

use std::{env, fs, path::Path};

#[allow(dead_code)]
mod constants {
    include!("src/constants.rs");
}

fn main() {
    println!("cargo:rerun-if-changed=src/constants.rs");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let constants_generated_path = Path::new(&out_dir).join("carousel_constants.wgsl");

    fs::write(&constants_generated_path, generate_wgsl_constants())
        .expect("Failed to write generated constants WGSL");
}

/// Generate the WGSL constants prelude shared by the panel shader
fn generate_wgsl_constants() -> String {
    format!(
        r#"// AUTO-GENERATED GPU CONSTANTS - DO NOT EDIT
// Generated from src/constants.rs

const M_PI: f32 = {:?};
const RGB_SHIFT_DIVISOR: f32 = {:?};
"#,
        constants::shader::PI,
        constants::shader::RGB_SHIFT_DIVISOR,
    )
}
