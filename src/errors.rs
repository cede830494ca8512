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

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AssemblyError {
    #[error("line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    #[error("line {line}: instruction {mnemonic} not found")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: duplicate label {label}")]
    DuplicateLabel { line: usize, label: String },

    #[error("unresolved label \"{0}\"")]
    UnresolvedLabel(String),

    #[error("opcode table {file}: {reason}")]
    TableFormatError { file: String, reason: String },
}
