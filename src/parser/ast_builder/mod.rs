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

mod directive;
mod instructions;
mod operand_builders;
mod validators;

use crate::ast::{Directive, InstructionSource, Register};
use crate::errors::AssemblyError;
use crate::parser::Rule;
use pest::iterators::{Pair, Pairs};

// Which register file (and parity, for doubles) an operand slot accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegisterClass {
    Gpr,
    Fpr,
    Dpr,
}

// An operand slot that takes either a literal value or a label to be
// resolved in pass 2.
#[derive(Debug, Clone, PartialEq)]
pub enum ImmOrLabel {
    Imm(i64),
    Label(String),
}

// A parsed memory offset: `imm(base)` or a bare label.
#[derive(Debug, Clone, PartialEq)]
pub enum OffsetOperand {
    Relative { immediate: i64, base: Register },
    Label(String),
}

pub struct AstBuilder<'a> {
    line_number: usize,
    rule: Rule,
    pairs: Pairs<'a, Rule>,
}

impl<'a> AstBuilder<'a> {
    pub fn new(pair: Pair<'a, Rule>, line_number: usize) -> Self {
        Self {
            line_number,
            rule: pair.as_rule(),
            pairs: pair.into_inner(),
        }
    }

    fn parse_error(&self, reason: String) -> AssemblyError {
        AssemblyError::ParseError {
            line: self.line_number,
            reason,
        }
    }

    // Helper to build an InstructionSource from an instruction rule pair.
    pub fn build_instruction(mut self) -> Result<InstructionSource, AssemblyError> {
        let mnemonic = self.pop_keyword()?;
        match self.rule {
            Rule::ins_none => Ok(InstructionSource {
                mnemonic,
                ..Default::default()
            }),
            Rule::ins_num => self.build_num(mnemonic),
            Rule::ins_name => self.build_name(mnemonic),
            Rule::ins_gpr => self.build_gpr(mnemonic),
            Rule::ins_gpr_name => self.build_gpr_name(mnemonic),
            Rule::ins_gpr_fpr => {
                self.build_two_reg(mnemonic, RegisterClass::Gpr, RegisterClass::Fpr)
            }
            Rule::ins_fpr_gpr => {
                self.build_two_reg(mnemonic, RegisterClass::Fpr, RegisterClass::Gpr)
            }
            Rule::ins_gpr_uint => self.build_gpr_uint(mnemonic),
            Rule::ins_2fpr => {
                self.build_two_reg(mnemonic, RegisterClass::Fpr, RegisterClass::Fpr)
            }
            Rule::ins_2dpr => {
                self.build_two_reg(mnemonic, RegisterClass::Dpr, RegisterClass::Dpr)
            }
            Rule::ins_fpr_dpr => {
                self.build_two_reg(mnemonic, RegisterClass::Fpr, RegisterClass::Dpr)
            }
            Rule::ins_dpr_fpr => {
                self.build_two_reg(mnemonic, RegisterClass::Dpr, RegisterClass::Fpr)
            }
            Rule::ins_2gpr_int => self.build_two_gpr_imm(mnemonic, true),
            Rule::ins_2gpr_uint => self.build_two_gpr_imm(mnemonic, false),
            Rule::ins_3gpr => self.build_three_reg(mnemonic, RegisterClass::Gpr),
            Rule::ins_3dpr => self.build_three_reg(mnemonic, RegisterClass::Dpr),
            Rule::ins_3fpr => self.build_three_reg(mnemonic, RegisterClass::Fpr),
            Rule::ins_gpr_offset => self.build_load(mnemonic, RegisterClass::Gpr),
            Rule::ins_dpr_offset => self.build_load(mnemonic, RegisterClass::Dpr),
            Rule::ins_fpr_offset => self.build_load(mnemonic, RegisterClass::Fpr),
            Rule::ins_offset_gpr => self.build_store(mnemonic, RegisterClass::Gpr),
            Rule::ins_offset_dpr => self.build_store(mnemonic, RegisterClass::Dpr),
            Rule::ins_offset_fpr => self.build_store(mnemonic, RegisterClass::Fpr),
            _ => unreachable!("Unknown instruction rule: {:?}", self.rule),
        }
    }

    // Helper to build a Directive from a directive rule pair.
    pub fn build_directive(mut self) -> Result<Directive, AssemblyError> {
        let keyword = self.pop_keyword()?;
        match self.rule {
            Rule::dir_align => self.build_align(),
            Rule::dir_asciiz => self.build_asciiz(),
            Rule::dir_data => self.build_set_address(0x200, ".data"),
            Rule::dir_double => self.build_double(),
            Rule::dir_float => self.build_float(),
            Rule::dir_space => self.build_space(),
            Rule::dir_text => self.build_set_address(0x0, ".text"),
            Rule::dir_word => self.build_word(),
            Rule::dir_unknown => {
                Err(self.parse_error(format!("unknown directive {}", keyword)))
            }
            _ => unreachable!("Unknown directive rule: {:?}", self.rule),
        }
    }
}
