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

pub mod symbol_table;

use crate::ast::{Directive, InstructionSource, SourceLine, Statement};
use crate::diagnostics;
use crate::errors::AssemblyError;
use crate::instruction_table::InstructionTable;
use crate::memory::instruction::Instruction;
use crate::memory::{Double, Float, MemoryCell, StringCell, Word};
use crate::parser;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use symbol_table::SymbolTable;

// Program options consumed by the core; the command line surface that fills
// this in lives in main.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub verbose: bool,
    pub dump_symbols: bool,
    pub console: bool,
    pub suppress_output: bool,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

// The main assembler driver. Pass 1 walks the source lines, assigning
// addresses, storing data cells and collecting labels; pass 2 completes
// every instruction that referenced a label.
pub struct Assembler<'a> {
    options: &'a Options,
    table: &'a InstructionTable,
    address: u32,
    line_no: usize,
    error: bool,
    program: BTreeMap<u32, MemoryCell>,
    symbol_table: SymbolTable,
    // addresses of instruction cells awaiting label resolution
    unresolved: Vec<u32>,
}

impl<'a> Assembler<'a> {
    pub fn new(options: &'a Options, table: &'a InstructionTable) -> Self {
        Assembler {
            options,
            table,
            address: 0,
            line_no: 0,
            error: false,
            program: BTreeMap::new(),
            symbol_table: SymbolTable::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error
    }

    // Run both passes over the source. Line-scoped errors are reported and
    // set the sticky error flag; the next line is still processed.
    pub fn run(&mut self, source: &str) {
        for (index, text) in source.lines().enumerate() {
            self.line_no = index + 1;
            match parser::parse_line(text, self.line_no) {
                Ok(line) => self.process_line(line),
                Err(e) => {
                    diagnostics::error(e.to_string());
                    self.error = true;
                }
            }
        }
        self.resolve_symbols();
    }

    fn process_line(&mut self, line: SourceLine) {
        if let Some(label) = &line.label {
            self.add_label(label);
            // a label on an otherwise empty line still occupies a slot
            if line.statement.is_none() {
                self.handle_instruction(InstructionSource::nop());
                return;
            }
        }
        match line.statement {
            Some(Statement::Directive(directive)) => self.handle_directive(directive),
            Some(Statement::Instruction(instruction)) => self.handle_instruction(instruction),
            None => {}
        }
    }

    // Adds a label to the symbol table at the current address.
    fn add_label(&mut self, label: &str) {
        if self.symbol_table.contains_key(label) {
            let e = AssemblyError::DuplicateLabel {
                line: self.line_no,
                label: label.to_string(),
            };
            diagnostics::error(e.to_string());
            self.error = true;
            return;
        }
        self.symbol_table.insert(label.to_string(), self.address);
        if self.options.verbose {
            println!("New label {}: 0x{:08x}", label, self.address);
        }
    }

    // Applies a directive to the address cursor and the program map.
    fn handle_directive(&mut self, directive: Directive) {
        match directive {
            Directive::Align(n) => self.align_address(n),
            Directive::SetAddress(address) => self.set_address(address),
            Directive::Space(n) => self.set_address(self.address + n),
            Directive::Words(values) => self.store_words(values),
            Directive::Floats(values) => self.store_floats(values),
            Directive::Doubles(values) => self.store_doubles(values),
            Directive::Strings(values) => self.store_strings(values),
        }
    }

    // Adds an instruction to the program at the current address.
    fn handle_instruction(&mut self, source: InstructionSource) {
        let instruction = match Instruction::new(self.address, self.line_no, source, self.table)
        {
            Ok(i) => i,
            Err(e) => {
                diagnostics::error(e.to_string());
                self.error = true;
                return;
            }
        };

        let pending = instruction.references_label();
        let size = instruction.size();
        self.program
            .insert(self.address, MemoryCell::Instruction(instruction));
        if pending {
            self.unresolved.push(self.address);
        }
        self.address += size;
    }

    // Advances the address cursor to the next multiple of n.
    fn align_address(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        while self.address % n != 0 {
            self.address += 1;
        }
        if self.options.verbose {
            println!("Aligned address to 0x{:08x} (mod {})", self.address, n);
        }
    }

    fn set_address(&mut self, address: u32) {
        self.address = address;
        if self.options.verbose {
            println!("Set address to 0x{:08x}", self.address);
        }
    }

    fn store_cell(&mut self, cell: MemoryCell) {
        let size = cell.size();
        self.program.insert(self.address, cell);
        self.address += size;
    }

    fn store_words(&mut self, values: Vec<i64>) {
        for value in values {
            let word = Word {
                address: self.address,
                value: value as i32,
            };
            if self.options.verbose {
                println!(
                    "Storing word {} (0x{:08x}) at 0x{:08x}",
                    word.value, word.value as u32, word.address
                );
            }
            if word.address % 4 != 0 {
                diagnostics::warning("unaligned word".to_string(), self.line_no);
            }
            self.store_cell(MemoryCell::Word(word));
        }
    }

    fn store_floats(&mut self, values: Vec<f64>) {
        for value in values {
            let float = Float {
                address: self.address,
                value: value as f32,
            };
            if self.options.verbose {
                println!("Storing float {:?} at 0x{:08x}", float.value, float.address);
            }
            if float.address % 4 != 0 {
                diagnostics::warning("unaligned float".to_string(), self.line_no);
            }
            self.store_cell(MemoryCell::Float(float));
        }
    }

    fn store_doubles(&mut self, values: Vec<f64>) {
        for value in values {
            let double = Double {
                address: self.address,
                value,
            };
            if self.options.verbose {
                println!(
                    "Storing double {:?} at 0x{:08x}",
                    double.value, double.address
                );
            }
            if double.address % 8 != 0 {
                diagnostics::warning("unaligned double".to_string(), self.line_no);
            }
            self.store_cell(MemoryCell::Double(double));
        }
    }

    fn store_strings(&mut self, values: Vec<String>) {
        for value in values {
            let string = StringCell {
                address: self.address,
                value,
            };
            if self.options.verbose {
                println!(
                    "Storing string \"{}\" at 0x{:08x}",
                    string.value, string.address
                );
            }
            self.store_cell(MemoryCell::String(string));
        }
    }

    // Pass 2: complete every queued instruction against the symbol table.
    fn resolve_symbols(&mut self) {
        if self.options.dump_symbols {
            println!("Symbol Table:");
            let mut symbols: Vec<_> = self.symbol_table.iter().collect();
            symbols.sort();
            for (name, address) in symbols {
                println!("{:>15} : 0x{:08x}", name, address);
            }
        }
        for address in &self.unresolved {
            if let Some(MemoryCell::Instruction(instruction)) = self.program.get_mut(address) {
                if let Err(e) = instruction.resolve_label(&self.symbol_table) {
                    diagnostics::error(e.to_string());
                    self.error = true;
                }
            }
        }
    }

    // Writes the assembled program, one cell per line in ascending address
    // order.
    pub fn write_output<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for (address, cell) in &self.program {
            writeln!(
                writer,
                "{:08x}: {} # {}",
                address,
                cell.encode_hex(),
                cell.description()
            )?;
        }
        Ok(())
    }
}

// ------------- unit tests -------------
