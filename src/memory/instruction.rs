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

use crate::assembler::symbol_table::{SymbolTable, get_symbol};
use crate::ast::{InstructionSource, Register};
use crate::errors::AssemblyError;
use crate::instruction_table::{Format, InstructionTable};

// I-type instructions whose immediate is a PC-relative offset rather than an
// absolute value.
const OFFSET_INSTRUCTIONS: [&str; 2] = ["beqz", "bnez"];

// Per-format field layout. Register fields absent from the source encode as
// register 0; immediates are masked to their field width when the word is
// assembled.
#[derive(Debug, Clone, PartialEq)]
enum Encoding {
    R {
        opcode: u32,
        funcode: u32,
        rd: u32,
        rs1: u32,
        rs2: u32,
    },
    I {
        opcode: u32,
        rd: u32,
        rs1: u32,
        immediate: i64,
    },
    J {
        opcode: u32,
        offset: i64,
    },
}

// A dlx instruction in memory. The parsed source record is retained for the
// listing annotation; the encoding carries the resolved field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub address: u32,
    source: InstructionSource,
    encoding: Encoding,
}

fn reg_bits(reg: Option<Register>) -> u32 {
    reg.map(|r| r.index() as u32).unwrap_or(0)
}

impl Instruction {
    pub fn new(
        address: u32,
        line: usize,
        source: InstructionSource,
        table: &InstructionTable,
    ) -> Result<Self, AssemblyError> {
        let info =
            table
                .lookup(&source.mnemonic)
                .ok_or_else(|| AssemblyError::UnknownMnemonic {
                    line,
                    mnemonic: source.mnemonic.clone(),
                })?;

        let encoding = match info.format {
            Format::R => Encoding::R {
                opcode: info.opcode,
                funcode: info.funcode,
                rd: reg_bits(source.rd),
                rs1: reg_bits(source.rs1),
                rs2: reg_bits(source.rs2),
            },
            Format::I => Encoding::I {
                opcode: info.opcode,
                rd: reg_bits(source.rd),
                rs1: reg_bits(source.rs1),
                immediate: 0,
            },
            Format::J => Encoding::J {
                opcode: info.opcode,
                offset: 0,
            },
        };

        let mut instruction = Instruction {
            address,
            source,
            encoding,
        };
        if let Some(value) = instruction.source.immediate {
            instruction.set_immediate(value);
        }
        Ok(instruction)
    }

    pub fn size(&self) -> u32 {
        4
    }

    pub fn references_label(&self) -> bool {
        self.source.label.is_some()
    }

    // Complete the instruction against the symbol table. A missing label is
    // an unresolved-label error reported by pass 2.
    pub fn resolve_label(&mut self, symbols: &SymbolTable) -> Result<(), AssemblyError> {
        if let Some(label) = self.source.label.clone() {
            let target = get_symbol(symbols, &label)?;
            self.set_immediate(target as i64);
        }
        Ok(())
    }

    // Set the immediate field from a value or a resolved label address.
    // Branches and jumps store the signed distance from address + 4; other
    // immediates are stored as given.
    fn set_immediate(&mut self, value: i64) {
        let relative = value - (self.address as i64 + 4);
        match &mut self.encoding {
            Encoding::R { .. } => {}
            Encoding::I { immediate, .. } => {
                *immediate = if OFFSET_INSTRUCTIONS.contains(&self.source.mnemonic.as_str()) {
                    relative
                } else {
                    value
                };
            }
            Encoding::J { offset, .. } => *offset = relative,
        }
    }

    // The assembled 32-bit word.
    pub fn word(&self) -> u32 {
        match &self.encoding {
            Encoding::R {
                opcode,
                funcode,
                rd,
                rs1,
                rs2,
            } => (opcode << 26) | (rs1 << 21) | (rs2 << 16) | (rd << 11) | funcode,
            Encoding::I {
                opcode,
                rd,
                rs1,
                immediate,
            } => {
                (opcode << 26) | (rs1 << 21) | (rd << 16) | (*immediate as u32 & 0xffff)
            }
            Encoding::J { opcode, offset } => (opcode << 26) | (*offset as u32 & 0x03ff_ffff),
        }
    }

    pub fn description(&self) -> String {
        let mut desc = self.source.mnemonic.clone();
        if let Some(rd) = &self.source.rd {
            desc += &format!(" rd={}", rd);
        }
        if let Some(rs1) = &self.source.rs1 {
            desc += &format!(" rs1={}", rs1);
        }
        if let Some(rs2) = &self.source.rs2 {
            desc += &format!(" rs2={}", rs2);
        }
        if let Some(label) = &self.source.label {
            desc += &format!(" label={}", label);
        }
        if let Some(immediate) = &self.source.immediate {
            desc += &format!(" imm={}", immediate);
        }
        desc
    }
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_reader::MockFileReader;
    use std::path::Path;

    fn test_table() -> InstructionTable {
        let mut reader = MockFileReader::default();
        reader.add_file("Rtypes", "nop 0 0\nadd 0 32\nsub 0 34\n");
        reader.add_file("Itypes", "addi 8\nlhi 15\nbeqz 4\nlw 35\nsw 43\ntrap 17\n");
        reader.add_file("Jtypes", "j 2\njal 3\n");
        InstructionTable::load(Path::new(""), &reader).unwrap()
    }

    fn gpr(n: u8) -> Option<Register> {
        Some(Register::Gpr(n))
    }

    #[test]
    fn test_r_type_field_layout() {
        let source = InstructionSource {
            mnemonic: "add".to_string(),
            rd: gpr(1),
            rs1: gpr(2),
            rs2: gpr(3),
            ..Default::default()
        };
        let instr = Instruction::new(0, 1, source, &test_table()).unwrap();
        assert_eq!(instr.word(), (2 << 21) | (3 << 16) | (1 << 11) | 32);
        assert_eq!(instr.description(), "add rd=r1 rs1=r2 rs2=r3");
    }

    #[test]
    fn test_nop_encodes_to_zero() {
        let instr =
            Instruction::new(0, 1, InstructionSource::nop(), &test_table()).unwrap();
        assert_eq!(instr.word(), 0);
        assert_eq!(instr.description(), "nop");
    }

    #[test]
    fn test_i_type_absolute_immediate() {
        let source = InstructionSource {
            mnemonic: "lhi".to_string(),
            rd: gpr(5),
            immediate: Some(0xDEAD),
            ..Default::default()
        };
        let instr = Instruction::new(0, 1, source, &test_table()).unwrap();
        assert_eq!(instr.word(), (15 << 26) | (5 << 16) | 0xDEAD);
        assert_eq!(instr.description(), "lhi rd=r5 imm=57005");
    }

    #[test]
    fn test_branch_immediate_is_pc_relative() {
        let source = InstructionSource {
            mnemonic: "beqz".to_string(),
            rs1: gpr(1),
            label: Some("target".to_string()),
            ..Default::default()
        };
        let mut instr = Instruction::new(0x100, 1, source, &test_table()).unwrap();

        let mut symbols = SymbolTable::new();
        symbols.insert("target".to_string(), 0x200);
        instr.resolve_label(&symbols).unwrap();

        // 0x200 - (0x100 + 4)
        assert_eq!(instr.word() & 0xffff, 0xfc);
    }

    #[test]
    fn test_backward_branch_sign_extends() {
        let source = InstructionSource {
            mnemonic: "beqz".to_string(),
            rs1: gpr(1),
            label: Some("back".to_string()),
            ..Default::default()
        };
        let mut instr = Instruction::new(0x200, 1, source, &test_table()).unwrap();

        let mut symbols = SymbolTable::new();
        symbols.insert("back".to_string(), 0x100);
        instr.resolve_label(&symbols).unwrap();

        // 0x100 - 0x204 = -0x104, truncated to 16 bits
        assert_eq!(instr.word() & 0xffff, 0xfefc);
    }

    #[test]
    fn test_j_type_label_offset() {
        let source = InstructionSource {
            mnemonic: "j".to_string(),
            label: Some("start".to_string()),
            ..Default::default()
        };
        let mut instr = Instruction::new(0, 1, source, &test_table()).unwrap();

        let mut symbols = SymbolTable::new();
        symbols.insert("start".to_string(), 0);
        instr.resolve_label(&symbols).unwrap();

        // offset -4 masked into 26 bits
        assert_eq!(instr.word(), (2 << 26) | 0x03ff_fffc);
    }

    #[test]
    fn test_j_type_numeric_immediate_is_pc_relative() {
        let source = InstructionSource {
            mnemonic: "j".to_string(),
            immediate: Some(0x200),
            ..Default::default()
        };
        let instr = Instruction::new(0x100, 1, source, &test_table()).unwrap();
        assert_eq!(instr.word() & 0x03ff_ffff, 0x200 - 0x104);
    }

    #[test]
    fn test_store_uses_rd_field() {
        // sw 4(r3), r5 carries the stored register in rd
        let source = InstructionSource {
            mnemonic: "sw".to_string(),
            rd: gpr(5),
            rs1: gpr(3),
            immediate: Some(4),
            ..Default::default()
        };
        let instr = Instruction::new(0, 1, source, &test_table()).unwrap();
        assert_eq!(instr.word(), (43 << 26) | (3 << 21) | (5 << 16) | 4);
        assert_eq!(instr.description(), "sw rd=r5 rs1=r3 imm=4");
    }

    #[test]
    fn test_unknown_mnemonic() {
        let source = InstructionSource {
            mnemonic: "frob".to_string(),
            ..Default::default()
        };
        let result = Instruction::new(0, 7, source, &test_table());
        assert_eq!(
            result.unwrap_err(),
            AssemblyError::UnknownMnemonic {
                line: 7,
                mnemonic: "frob".to_string()
            }
        );
    }

    #[test]
    fn test_unresolved_label() {
        let source = InstructionSource {
            mnemonic: "j".to_string(),
            label: Some("nowhere".to_string()),
            ..Default::default()
        };
        let mut instr = Instruction::new(0, 1, source, &test_table()).unwrap();
        let symbols = SymbolTable::new();
        assert_eq!(
            instr.resolve_label(&symbols).unwrap_err(),
            AssemblyError::UnresolvedLabel("nowhere".to_string())
        );
    }
}
