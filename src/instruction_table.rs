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

use crate::errors::AssemblyError;
use crate::file_reader::FileReader;
use std::collections::HashMap;
use std::path::Path;

// File to load r-type instructions
pub const R_TYPE_FILE: &str = "Rtypes";
// File to load i-type instructions
pub const I_TYPE_FILE: &str = "Itypes";
// File to load j-type instructions
pub const J_TYPE_FILE: &str = "Jtypes";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    R,
    I,
    J,
}

impl Format {
    pub fn file_name(&self) -> &'static str {
        match self {
            Format::R => R_TYPE_FILE,
            Format::I => I_TYPE_FILE,
            Format::J => J_TYPE_FILE,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OpcodeInfo {
    pub format: Format,
    pub opcode: u32,
    pub funcode: u32,
}

// The instruction table maps lower-cased mnemonics to their format, opcode
// and function code. It is loaded once at startup and never mutated.
#[derive(Debug, Default)]
pub struct InstructionTable {
    entries: HashMap<String, OpcodeInfo>,
}

impl InstructionTable {
    // Load the table from the three per-format data files found in `dir`.
    // Each non-blank line is `<mnemonic> <opcode> [<funcode>]` in decimal.
    pub fn load<F: FileReader>(dir: &Path, reader: &F) -> Result<Self, AssemblyError> {
        let mut table = InstructionTable::default();
        for format in [Format::R, Format::I, Format::J] {
            let file = format.file_name();
            let content = reader.read_to_string(&dir.join(file)).map_err(|e| {
                AssemblyError::TableFormatError {
                    file: file.to_string(),
                    reason: e.to_string(),
                }
            })?;
            table.load_format(format, file, &content)?;
        }
        Ok(table)
    }

    fn load_format(
        &mut self,
        format: Format,
        file: &str,
        content: &str,
    ) -> Result<(), AssemblyError> {
        let bad_line = |line: &str| AssemblyError::TableFormatError {
            file: file.to_string(),
            reason: format!("unknown format: \"{}\"", line.trim()),
        };

        for line in content.lines() {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            if words.len() != 2 && words.len() != 3 {
                return Err(bad_line(line));
            }

            let opcode: u32 = words[1].parse().map_err(|_| bad_line(line))?;
            let funcode: u32 = match words.get(2) {
                Some(w) => w.parse().map_err(|_| bad_line(line))?,
                None => 0,
            };
            if opcode > 63 || funcode > 2047 {
                return Err(bad_line(line));
            }

            self.entries.insert(
                words[0].to_lowercase(),
                OpcodeInfo {
                    format,
                    opcode,
                    funcode,
                },
            );
        }
        Ok(())
    }

    pub fn lookup(&self, mnemonic: &str) -> Option<&OpcodeInfo> {
        self.entries.get(mnemonic)
    }

    pub fn format_of(&self, mnemonic: &str) -> Option<Format> {
        self.lookup(mnemonic).map(|info| info.format)
    }
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_reader::MockFileReader;

    fn reader_with(r: &str, i: &str, j: &str) -> MockFileReader {
        let mut reader = MockFileReader::default();
        reader.add_file("Rtypes", r);
        reader.add_file("Itypes", i);
        reader.add_file("Jtypes", j);
        reader
    }

    #[test]
    fn test_load_all_formats() {
        let reader = reader_with("add 0 32\n", "addi 8\n", "j 2\njal 3\n");
        let table = InstructionTable::load(Path::new(""), &reader).unwrap();

        assert_eq!(
            table.lookup("add"),
            Some(&OpcodeInfo {
                format: Format::R,
                opcode: 0,
                funcode: 32
            })
        );
        assert_eq!(table.format_of("addi"), Some(Format::I));
        assert_eq!(table.format_of("jal"), Some(Format::J));
    }

    #[test]
    fn test_funcode_defaults_to_zero() {
        let reader = reader_with("", "lw 35\n", "");
        let table = InstructionTable::load(Path::new(""), &reader).unwrap();
        assert_eq!(table.lookup("lw").unwrap().funcode, 0);
    }

    #[test]
    fn test_mnemonics_case_folded() {
        let reader = reader_with("ADD 0 32\n", "", "");
        let table = InstructionTable::load(Path::new(""), &reader).unwrap();
        assert!(table.lookup("add").is_some());
        assert!(table.lookup("ADD").is_none());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let reader = reader_with("\n\nadd 0 32\n\n", "", "");
        let table = InstructionTable::load(Path::new(""), &reader).unwrap();
        assert!(table.lookup("add").is_some());
    }

    #[test]
    fn test_malformed_line_fails_load() {
        let reader = reader_with("add 0 32 9 9\n", "", "");
        let result = InstructionTable::load(Path::new(""), &reader);
        assert!(matches!(
            result,
            Err(AssemblyError::TableFormatError { .. })
        ));
    }

    #[test]
    fn test_non_numeric_opcode_fails_load() {
        let reader = reader_with("add banana\n", "", "");
        assert!(InstructionTable::load(Path::new(""), &reader).is_err());
    }

    #[test]
    fn test_opcode_out_of_range_fails_load() {
        let reader = reader_with("add 64\n", "", "");
        assert!(InstructionTable::load(Path::new(""), &reader).is_err());
    }

    #[test]
    fn test_missing_file_fails_load() {
        let mut reader = MockFileReader::default();
        reader.add_file("Rtypes", "add 0 32\n");
        reader.add_file("Itypes", "addi 8\n");
        assert!(InstructionTable::load(Path::new(""), &reader).is_err());
    }

    #[test]
    fn test_unknown_mnemonic_lookup() {
        let reader = reader_with("add 0 32\n", "", "");
        let table = InstructionTable::load(Path::new(""), &reader).unwrap();
        assert!(table.lookup("frobnicate").is_none());
    }
}
