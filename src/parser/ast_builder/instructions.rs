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

use crate::ast::InstructionSource;
use crate::errors::AssemblyError;
use crate::parser::ast_builder::{AstBuilder, ImmOrLabel, OffsetOperand, RegisterClass};

impl<'a> AstBuilder<'a> {
    // trap imm
    pub(super) fn build_num(
        mut self,
        mnemonic: String,
    ) -> Result<InstructionSource, AssemblyError> {
        let immediate = self.expect_unsigned()?;
        Ok(InstructionSource {
            mnemonic,
            immediate: Some(immediate),
            ..Default::default()
        })
    }

    // j / jal, with a label or a numeric target
    pub(super) fn build_name(
        mut self,
        mnemonic: String,
    ) -> Result<InstructionSource, AssemblyError> {
        let mut source = InstructionSource {
            mnemonic,
            ..Default::default()
        };
        match self.expect_imm_or_label(false)? {
            ImmOrLabel::Imm(value) => source.immediate = Some(value),
            ImmOrLabel::Label(label) => source.label = Some(label),
        }
        Ok(source)
    }

    // jr / jalr
    pub(super) fn build_gpr(
        mut self,
        mnemonic: String,
    ) -> Result<InstructionSource, AssemblyError> {
        let rs1 = self.expect_register(RegisterClass::Gpr)?;
        Ok(InstructionSource {
            mnemonic,
            rs1: Some(rs1),
            ..Default::default()
        })
    }

    // beqz / bnez branch against a label
    pub(super) fn build_gpr_name(
        mut self,
        mnemonic: String,
    ) -> Result<InstructionSource, AssemblyError> {
        let rs1 = self.expect_register(RegisterClass::Gpr)?;
        let label = self.expect_label()?;
        Ok(InstructionSource {
            mnemonic,
            rs1: Some(rs1),
            label: Some(label),
            ..Default::default()
        })
    }

    // lhi takes its value in rd
    pub(super) fn build_gpr_uint(
        mut self,
        mnemonic: String,
    ) -> Result<InstructionSource, AssemblyError> {
        let rd = self.expect_register(RegisterClass::Gpr)?;
        let mut source = InstructionSource {
            mnemonic,
            rd: Some(rd),
            ..Default::default()
        };
        match self.expect_imm_or_label(false)? {
            ImmOrLabel::Imm(value) => source.immediate = Some(value),
            ImmOrLabel::Label(label) => source.label = Some(label),
        }
        Ok(source)
    }

    // register moves and conversions: rd, rs1
    pub(super) fn build_two_reg(
        mut self,
        mnemonic: String,
        rd_class: RegisterClass,
        rs1_class: RegisterClass,
    ) -> Result<InstructionSource, AssemblyError> {
        let rd = self.expect_register(rd_class)?;
        let rs1 = self.expect_register(rs1_class)?;
        Ok(InstructionSource {
            mnemonic,
            rd: Some(rd),
            rs1: Some(rs1),
            ..Default::default()
        })
    }

    // immediate arithmetic: rd, rs1, imm | label
    pub(super) fn build_two_gpr_imm(
        mut self,
        mnemonic: String,
        signed: bool,
    ) -> Result<InstructionSource, AssemblyError> {
        let rd = self.expect_register(RegisterClass::Gpr)?;
        let rs1 = self.expect_register(RegisterClass::Gpr)?;
        let mut source = InstructionSource {
            mnemonic,
            rd: Some(rd),
            rs1: Some(rs1),
            ..Default::default()
        };
        match self.expect_imm_or_label(signed)? {
            ImmOrLabel::Imm(value) => source.immediate = Some(value),
            ImmOrLabel::Label(label) => source.label = Some(label),
        }
        Ok(source)
    }

    // three-register arithmetic: rd, rs1, rs2
    pub(super) fn build_three_reg(
        mut self,
        mnemonic: String,
        class: RegisterClass,
    ) -> Result<InstructionSource, AssemblyError> {
        let rd = self.expect_register(class)?;
        let rs1 = self.expect_register(class)?;
        let rs2 = self.expect_register(class)?;
        Ok(InstructionSource {
            mnemonic,
            rd: Some(rd),
            rs1: Some(rs1),
            rs2: Some(rs2),
            ..Default::default()
        })
    }

    // loads: rd, imm(base) | label
    pub(super) fn build_load(
        mut self,
        mnemonic: String,
        rd_class: RegisterClass,
    ) -> Result<InstructionSource, AssemblyError> {
        let rd = self.expect_register(rd_class)?;
        let offset = self.expect_offset()?;
        Ok(self.apply_offset(
            InstructionSource {
                mnemonic,
                rd: Some(rd),
                ..Default::default()
            },
            offset,
        ))
    }

    // stores: imm(base) | label, rd
    pub(super) fn build_store(
        mut self,
        mnemonic: String,
        rd_class: RegisterClass,
    ) -> Result<InstructionSource, AssemblyError> {
        let offset = self.expect_offset()?;
        let rd = self.expect_register(rd_class)?;
        Ok(self.apply_offset(
            InstructionSource {
                mnemonic,
                rd: Some(rd),
                ..Default::default()
            },
            offset,
        ))
    }

    fn apply_offset(
        &self,
        mut source: InstructionSource,
        offset: OffsetOperand,
    ) -> InstructionSource {
        match offset {
            OffsetOperand::Relative { immediate, base } => {
                source.immediate = Some(immediate);
                source.rs1 = Some(base);
            }
            OffsetOperand::Label(label) => source.label = Some(label),
        }
        source
    }
}
