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

mod ast_builder;

use crate::ast::{SourceLine, Statement};
use crate::errors::AssemblyError;
use ast_builder::AstBuilder;
use pest::Parser;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "./grammar.pest"]
pub struct DlxParser;

// Parse one source line into a line record. Lines are independent; the
// caller supplies the global line number for diagnostics.
pub fn parse_line(text: &str, line_number: usize) -> Result<SourceLine, AssemblyError> {
    let mut pairs =
        DlxParser::parse(Rule::line, text).map_err(|e| AssemblyError::ParseError {
            line: line_number,
            reason: e.variant.message().into_owned(),
        })?;

    let mut record = SourceLine {
        line_number,
        label: None,
        statement: None,
    };

    // `statement`, `directive` and `instruction` are silent, so the line's
    // children are the label and the concrete directive or instruction rule.
    for pair in pairs.next().unwrap().into_inner() {
        match pair.as_rule() {
            Rule::label => {
                let name = pair.into_inner().next().unwrap();
                record.label = Some(name.as_str().to_lowercase());
            }
            Rule::dir_align
            | Rule::dir_asciiz
            | Rule::dir_data
            | Rule::dir_double
            | Rule::dir_float
            | Rule::dir_space
            | Rule::dir_text
            | Rule::dir_word
            | Rule::dir_unknown => {
                let builder = AstBuilder::new(pair, line_number);
                record.statement = Some(Statement::Directive(builder.build_directive()?));
            }
            Rule::EOI => {}
            _ => {
                let builder = AstBuilder::new(pair, line_number);
                record.statement = Some(Statement::Instruction(builder.build_instruction()?));
            }
        }
    }

    Ok(record)
}

// ------------- unit tests -------------
