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

use crate::ast::Directive;
use crate::errors::AssemblyError;
use crate::parser::Rule;
use crate::parser::ast_builder::AstBuilder;
use crate::parser::ast_builder::operand_builders::*;

impl<'a> AstBuilder<'a> {
    // build an alignment directive
    pub(super) fn build_align(mut self) -> Result<Directive, AssemblyError> {
        if self.pairs.peek().is_none() {
            return Err(self.parse_error(".align requires 1 integer parameter".to_string()));
        }
        let value = self.expect_unsigned()?;
        Ok(Directive::Align(self.address_value(value)?))
    }

    // build a .data or .text directive; both move the address cursor
    pub(super) fn build_set_address(
        mut self,
        default: u32,
        name: &str,
    ) -> Result<Directive, AssemblyError> {
        if self.pairs.peek().is_none() {
            return Ok(Directive::SetAddress(default));
        }
        let value = self.expect_unsigned().map_err(|e| match e {
            AssemblyError::ParseError { line, reason } => AssemblyError::ParseError {
                line,
                reason: format!("{}: {}", name, reason),
            },
            other => other,
        })?;
        Ok(Directive::SetAddress(self.address_value(value)?))
    }

    // build a space reservation directive
    pub(super) fn build_space(mut self) -> Result<Directive, AssemblyError> {
        if self.pairs.peek().is_none() {
            return Err(self.parse_error(".space requires 1 integer parameter".to_string()));
        }
        let value = self.expect_unsigned()?;
        Ok(Directive::Space(self.address_value(value)?))
    }

    // build a word data directive
    pub(super) fn build_word(mut self) -> Result<Directive, AssemblyError> {
        let numbers = self.number_list(".word requires integer parameters")?;
        let mut words = Vec::new();
        for value in numbers {
            match value {
                NumberValue::Int(word) => words.push(word),
                NumberValue::Float(_) => {
                    return Err(
                        self.parse_error(".word requires integer parameters".to_string())
                    );
                }
            }
        }
        Ok(Directive::Words(words))
    }

    // build a float data directive
    pub(super) fn build_float(mut self) -> Result<Directive, AssemblyError> {
        let numbers = self.number_list(".float requires float parameters")?;
        Ok(Directive::Floats(coerce_floats(numbers)))
    }

    // build a double data directive
    pub(super) fn build_double(mut self) -> Result<Directive, AssemblyError> {
        let numbers = self.number_list(".double requires double parameters")?;
        Ok(Directive::Doubles(coerce_floats(numbers)))
    }

    // build a string data directive
    pub(super) fn build_asciiz(mut self) -> Result<Directive, AssemblyError> {
        let list = match self.pairs.next() {
            Some(pair) if pair.as_rule() == Rule::string_list => pair,
            _ => {
                return Err(
                    self.parse_error(".asciiz requires a list of strings".to_string())
                );
            }
        };

        let mut strings = Vec::new();
        for string_pair in list.into_inner() {
            let body = string_pair
                .into_inner()
                .next()
                .map(|p| p.as_str())
                .unwrap_or("");
            strings.push(unescape_string(body));
        }
        Ok(Directive::Strings(strings))
    }

    fn number_list(&mut self, missing: &str) -> Result<Vec<NumberValue>, AssemblyError> {
        let list = match self.pairs.next() {
            Some(pair) if pair.as_rule() == Rule::number_list => pair,
            _ => return Err(self.parse_error(missing.to_string())),
        };

        let line = self.line_number;
        list.into_inner()
            .map(|pair| build_number(&pair, line))
            .collect()
    }
}

fn coerce_floats(numbers: Vec<NumberValue>) -> Vec<f64> {
    numbers
        .into_iter()
        .map(|value| match value {
            NumberValue::Int(i) => i as f64,
            NumberValue::Float(f) => f,
        })
        .collect()
}
