use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // generate the evaluation tables
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    gen_tables::generate(&out_dir).expect("failed to generate evaluation tables");
}
