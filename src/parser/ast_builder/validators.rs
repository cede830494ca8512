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

use crate::ast::Register;
use crate::diagnostics;
use crate::errors::AssemblyError;
use crate::parser::Rule;
use crate::parser::ast_builder::operand_builders::*;
use crate::parser::ast_builder::{AstBuilder, ImmOrLabel, OffsetOperand, RegisterClass};
use pest::iterators::Pair;

impl<'a> AstBuilder<'a> {
    fn pop_pair(&mut self, expected: &str) -> Result<Pair<'a, Rule>, AssemblyError> {
        let line = self.line_number;
        self.pairs.next().ok_or_else(|| AssemblyError::ParseError {
            line,
            reason: format!("missing {} parameter", expected),
        })
    }

    // The keyword pair is always the first child of a statement rule.
    pub fn pop_keyword(&mut self) -> Result<String, AssemblyError> {
        Ok(self.pop_pair("keyword")?.as_str().to_lowercase())
    }

    // validation helper
    pub fn expect_register(&mut self, class: RegisterClass) -> Result<Register, AssemblyError> {
        let pair = self.pop_pair("register")?;
        let reg = build_register(&pair, self.line_number)?;
        match (class, reg) {
            (RegisterClass::Gpr, Register::Gpr(_)) => Ok(reg),
            (RegisterClass::Fpr, Register::Fpr(_)) => Ok(reg),
            (RegisterClass::Dpr, Register::Fpr(n)) if n % 2 == 0 => Ok(reg),
            (RegisterClass::Dpr, Register::Fpr(_)) => Err(self.parse_error(format!(
                "register {} invalid, even number register required",
                reg
            ))),
            _ => Err(self.parse_error(format!("register {} invalid here", reg))),
        }
    }

    // validate an unsigned integer immediate
    pub fn expect_unsigned(&mut self) -> Result<i64, AssemblyError> {
        let pair = self.pop_pair("integer")?;
        self.unsigned_value(&pair)
    }

    // validate a label reference
    pub fn expect_label(&mut self) -> Result<String, AssemblyError> {
        let pair = self.pop_pair("label")?;
        match pair.as_rule() {
            Rule::name => Ok(pair.as_str().to_lowercase()),
            _ => Err(self.parse_error("expected a label".to_string())),
        }
    }

    // validate an immediate or a label reference
    pub fn expect_imm_or_label(&mut self, signed: bool) -> Result<ImmOrLabel, AssemblyError> {
        let pair = self.pop_pair("immediate or label")?;
        match pair.as_rule() {
            Rule::name => Ok(ImmOrLabel::Label(pair.as_str().to_lowercase())),
            Rule::number => {
                let value = if signed {
                    self.int_value(&pair)?
                } else {
                    self.unsigned_value(&pair)?
                };
                Ok(ImmOrLabel::Imm(value))
            }
            _ => Err(self.parse_error("expected an immediate or a label".to_string())),
        }
    }

    // validate an offset operand: imm(base) or a bare label
    pub fn expect_offset(&mut self) -> Result<OffsetOperand, AssemblyError> {
        let offset_pair = self.pop_pair("offset")?;
        let mut inner = offset_pair.into_inner();
        let first = inner.next().ok_or_else(|| AssemblyError::ParseError {
            line: self.line_number,
            reason: "missing offset parameter".to_string(),
        })?;

        match first.as_rule() {
            Rule::name => Ok(OffsetOperand::Label(first.as_str().to_lowercase())),
            Rule::number => {
                let immediate = self.int_value(&first)?;
                let base_pair = inner.next().ok_or_else(|| AssemblyError::ParseError {
                    line: self.line_number,
                    reason: "missing offset base register".to_string(),
                })?;
                let base = build_register(&base_pair, self.line_number)?;
                Ok(OffsetOperand::Relative { immediate, base })
            }
            _ => Err(self.parse_error("expected an offset or a label".to_string())),
        }
    }

    fn int_value(&self, pair: &Pair<'a, Rule>) -> Result<i64, AssemblyError> {
        match build_number(pair, self.line_number)? {
            NumberValue::Float(_) => {
                Err(self.parse_error("expected int, found float".to_string()))
            }
            NumberValue::Int(value) => {
                if !(-65536..=65535).contains(&value) {
                    diagnostics::warning(
                        "signed immediate larger than 16 bits".to_string(),
                        self.line_number,
                    );
                }
                Ok(value)
            }
        }
    }

    fn unsigned_value(&self, pair: &Pair<'a, Rule>) -> Result<i64, AssemblyError> {
        match build_number(pair, self.line_number)? {
            NumberValue::Float(_) => {
                Err(self.parse_error("expected int, found float".to_string()))
            }
            NumberValue::Int(value) => {
                if value < 0 {
                    return Err(self.parse_error("unsigned int required".to_string()));
                }
                if value & !0xffff != 0 {
                    diagnostics::warning(
                        "unsigned immediate larger than 16 bits".to_string(),
                        self.line_number,
                    );
                }
                Ok(value)
            }
        }
    }

    // Directive operands land in the address cursor, so they must fit in
    // 32 bits.
    pub fn address_value(&self, value: i64) -> Result<u32, AssemblyError> {
        u32::try_from(value)
            .map_err(|_| self.parse_error(format!("value {} does not fit in an address", value)))
    }
}
