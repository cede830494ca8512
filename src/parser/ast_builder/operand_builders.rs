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
use crate::errors::AssemblyError;
use crate::parser::Rule;
use pest::iterators::Pair;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Float(f64),
}

// Build a register from a gpr or fpr pair. The grammar only matches indices
// 0..=31, so the digits always parse.
pub fn build_register(pair: &Pair<Rule>, line: usize) -> Result<Register, AssemblyError> {
    let text = pair.as_str();
    let index: u8 = text[1..]
        .parse()
        .map_err(|_| AssemblyError::ParseError {
            line,
            reason: format!("invalid register {}", text),
        })?;
    match pair.as_rule() {
        Rule::gpr => Ok(Register::Gpr(index)),
        Rule::fpr => Ok(Register::Fpr(index)),
        _ => Err(AssemblyError::ParseError {
            line,
            reason: format!("expected a register, found {}", text),
        }),
    }
}

// Build a number from a number pair. Hex literals and plain decimals are
// integers; anything with a decimal point is a float.
pub fn build_number(pair: &Pair<Rule>, line: usize) -> Result<NumberValue, AssemblyError> {
    let inner = pair
        .clone()
        .into_inner()
        .next()
        .ok_or_else(|| AssemblyError::ParseError {
            line,
            reason: "expected a number".to_string(),
        })?;
    let text = inner.as_str();
    let invalid = || AssemblyError::ParseError {
        line,
        reason: format!("invalid number {}", text),
    };

    match inner.as_rule() {
        Rule::hex_int => {
            let (sign, digits) = match text.as_bytes()[0] {
                b'-' => (-1, &text[3..]),
                b'+' => (1, &text[3..]),
                _ => (1, &text[2..]),
            };
            let magnitude = i64::from_str_radix(digits, 16).map_err(|_| invalid())?;
            Ok(NumberValue::Int(sign * magnitude))
        }
        Rule::dec_int => Ok(NumberValue::Int(text.parse().map_err(|_| invalid())?)),
        Rule::dec_float => Ok(NumberValue::Float(text.parse().map_err(|_| invalid())?)),
        _ => Err(AssemblyError::ParseError {
            line,
            reason: format!("invalid number {}", text),
        }),
    }
}

// Expand the recognised escape sequences of a string literal body.
pub fn unescape_string(raw: &str) -> String {
    raw.replace("\\t", "\t")
        .replace("\\\"", "\"")
        .replace("\\n", "\n")
}

// ------------- unit tests -------------
