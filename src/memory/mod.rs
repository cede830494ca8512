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

pub mod instruction;

use instruction::Instruction;
use std::fmt::Write;

// Anything that occupies an address in the assembled program. Every variant
// knows its size in bytes, a human description for the listing, and its
// big-endian hex encoding of exactly size * 2 characters.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryCell {
    Word(Word),
    Float(Float),
    Double(Double),
    String(StringCell),
    Instruction(Instruction),
}

impl MemoryCell {
    pub fn address(&self) -> u32 {
        match self {
            MemoryCell::Word(c) => c.address,
            MemoryCell::Float(c) => c.address,
            MemoryCell::Double(c) => c.address,
            MemoryCell::String(c) => c.address,
            MemoryCell::Instruction(c) => c.address,
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            MemoryCell::Word(_) => 4,
            MemoryCell::Float(_) => 4,
            MemoryCell::Double(_) => 8,
            MemoryCell::String(c) => c.size(),
            MemoryCell::Instruction(_) => 4,
        }
    }

    pub fn description(&self) -> String {
        match self {
            MemoryCell::Word(c) => format!("word {}", c.value),
            MemoryCell::Float(c) => format!("float {:?}", c.value),
            MemoryCell::Double(c) => format!("double {:?}", c.value),
            MemoryCell::String(c) => format!("string \"{}\"", c.value),
            MemoryCell::Instruction(c) => c.description(),
        }
    }

    pub fn encode_hex(&self) -> String {
        match self {
            MemoryCell::Word(c) => format!("{:08x}", c.value as u32),
            MemoryCell::Float(c) => format!("{:08x}", c.value.to_bits()),
            MemoryCell::Double(c) => format!("{:016x}", c.value.to_bits()),
            MemoryCell::String(c) => c.encode_hex(),
            MemoryCell::Instruction(c) => format!("{:08x}", c.word()),
        }
    }
}

// A signed 32-bit integer word.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Word {
    pub address: u32,
    pub value: i32,
}

// An IEEE-754 binary32 value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Float {
    pub address: u32,
    pub value: f32,
}

// An IEEE-754 binary64 value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Double {
    pub address: u32,
    pub value: f64,
}

// A NUL-terminated string; the terminator is part of the size.
#[derive(Debug, Clone, PartialEq)]
pub struct StringCell {
    pub address: u32,
    pub value: String,
}

impl StringCell {
    pub fn size(&self) -> u32 {
        self.value.len() as u32 + 1
    }

    fn encode_hex(&self) -> String {
        let mut hex = String::new();
        for byte in self.value.bytes() {
            let _ = write!(hex, "{:02x}", byte);
        }
        hex.push_str("00");
        hex
    }
}

// ------------- unit tests -------------
