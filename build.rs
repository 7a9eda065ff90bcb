//! Build script rendering the `mbimframe(1)` man page.
//!
//! The page documents the capture format and decoder limit flags declared in
//! `src/cli.rs`. It is written under `target/generated-man` for packagers.

use std::{env, fs, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let name = env::var("CARGO_PKG_NAME")?;
    let out_dir = PathBuf::from("target/generated-man");
    fs::create_dir_all(&out_dir)?;

    let cmd = cli::Cli::command();
    let mut page: Vec<u8> = Vec::new();
    Man::new(cmd).render(&mut page)?;
    fs::write(out_dir.join(format!("{name}.1")), page)?;

    Ok(())
}
