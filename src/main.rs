/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use anyhow::{Context, Result, bail};
use clap::Parser as clap_parser;
use dlxasm::assemble;
use dlxasm::assembler::Options;
use dlxasm::file_reader::AsmFileReader;
use dlxasm::instruction_table::InstructionTable;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

// Expected input file extension
const IN_FILE_EXT: &str = "dlx";
// Expected output file extension
const OUT_FILE_EXT: &str = "hex";

#[derive(clap_parser)]
#[clap(version = "0.1.0", about = "A two-pass assembler for the DLX instruction set")]
struct Opts {
    /// Enable verbose output while running.
    #[clap(short, long)]
    verbose: bool,
    /// Dump the symbol table before symbol resolution.
    #[clap(short, long)]
    dump: bool,
    /// Prompt for the input file.
    #[clap(short, long)]
    prompt: bool,
    /// Write output to stdout instead of to a file.
    #[clap(short, long)]
    console: bool,
    /// Process the input file, but do not write output.
    #[clap(short, long = "no_output")]
    no_output: bool,
    /// Explicitly specify the input file rather than supplying it as the
    /// last parameter.
    #[clap(short, long)]
    input: Option<PathBuf>,
    /// Override the default output file name.
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// The input file.
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    let input_path = resolve_input(&opts)?;
    if input_path.extension().and_then(|e| e.to_str()) != Some(IN_FILE_EXT) {
        bail!("Unknown input file type: {}", input_path.display());
    }
    let output_path = opts
        .output
        .clone()
        .unwrap_or_else(|| input_path.with_extension(OUT_FILE_EXT));

    let options = Options {
        verbose: opts.verbose,
        dump_symbols: opts.dump,
        console: opts.console,
        suppress_output: opts.no_output,
        input_path,
        output_path,
    };

    let reader = AsmFileReader;
    let table = InstructionTable::load(Path::new("."), &reader)
        .context("Failed to load the opcode tables")?;

    let success = assemble(&options, &table, &reader)?;
    if !success {
        process::exit(1);
    }
    Ok(())
}

// The input file comes from -i, the positional argument, or an interactive
// prompt, in that order.
fn resolve_input(opts: &Opts) -> Result<PathBuf> {
    if let Some(input) = &opts.input {
        return Ok(input.clone());
    }
    if let Some(file) = &opts.file {
        return Ok(file.clone());
    }
    if opts.prompt {
        print!("Enter file name: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        return Ok(PathBuf::from(line.trim()));
    }
    bail!("No input file given; pass a file, -i <file>, or -p to be prompted")
}
