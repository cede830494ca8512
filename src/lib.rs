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

pub mod assembler;
pub mod ast;
pub mod diagnostics;
pub mod errors;
pub mod file_reader;
pub mod instruction_table;
pub mod memory;
pub mod parser;

use anyhow::{Context, Result};
use assembler::{Assembler, Options};
use file_reader::FileReader;
use instruction_table::InstructionTable;
use std::fs::File;
use std::io;

// Run the assembler over the configured input. Returns whether the run was
// error-free; line-scoped diagnostics have already been printed either way.
pub fn assemble<F: FileReader>(
    options: &Options,
    table: &InstructionTable,
    reader: &F,
) -> Result<bool> {
    if options.verbose {
        println!("Input file: {}", options.input_path.display());
        println!("Output file: {}", options.output_path.display());
    }

    let source = reader
        .read_to_string(&options.input_path)
        .with_context(|| format!("Failed to read input file: {}", options.input_path.display()))?;

    let mut assembler = Assembler::new(options, table);
    assembler.run(&source);

    if assembler.has_errors() {
        return Ok(false);
    }
    if options.suppress_output {
        return Ok(true);
    }

    if options.console {
        println!("Assembled Output:");
        assembler.write_output(&mut io::stdout())?;
    } else {
        let mut file = File::create(&options.output_path).with_context(|| {
            format!(
                "Failed to create output file: {}",
                options.output_path.display()
            )
        })?;
        assembler.write_output(&mut file)?;
    }
    Ok(true)
}
