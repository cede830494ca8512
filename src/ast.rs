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

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    Gpr(u8),
    Fpr(u8),
}

impl Register {
    pub fn index(&self) -> u8 {
        match self {
            Register::Gpr(n) | Register::Fpr(n) => *n,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Gpr(n) => write!(f, "r{}", n),
            Register::Fpr(n) => write!(f, "f{}", n),
        }
    }
}

// Represents all directive actions. `.data` and `.text` both reduce to
// SetAddress with an explicit or default address.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Align(u32),              // .align n
    SetAddress(u32),         // .data [n] / .text [n]
    Space(u32),              // .space n
    Words(Vec<i64>),         // .word v, ...
    Floats(Vec<f64>),        // .float v, ...
    Doubles(Vec<f64>),       // .double v, ...
    Strings(Vec<String>),    // .asciiz "s", ...
}

// A parsed instruction before encoding. Which fields are present depends on
// the operand class of the mnemonic; absent register fields encode as r0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionSource {
    pub mnemonic: String,
    pub rd: Option<Register>,
    pub rs1: Option<Register>,
    pub rs2: Option<Register>,
    pub immediate: Option<i64>,
    pub label: Option<String>,
}

impl InstructionSource {
    pub fn nop() -> Self {
        InstructionSource {
            mnemonic: "nop".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Directive(Directive),
    Instruction(InstructionSource),
}

// Represents a single line of code: an optional label and an optional
// statement, either of which may stand alone.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub line_number: usize,
    pub label: Option<String>,
    pub statement: Option<Statement>,
}
