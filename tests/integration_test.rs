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

use dlxasm::assemble;
use dlxasm::assembler::{Assembler, Options};
use dlxasm::file_reader::{AsmFileReader, MockFileReader};
use dlxasm::instruction_table::InstructionTable;
use std::fs;
use std::path::Path;

fn load_table() -> InstructionTable {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    InstructionTable::load(dir, &AsmFileReader).unwrap()
}

// Assemble a source string and return the listing plus the error flag.
fn run(source: &str) -> (String, bool) {
    let options = Options::default();
    let table = load_table();
    let mut assembler = Assembler::new(&options, &table);
    assembler.run(source);
    let mut buffer = Vec::new();
    assembler.write_output(&mut buffer).unwrap();
    (String::from_utf8(buffer).unwrap(), assembler.has_errors())
}

#[test]
fn test_r_type_program() {
    let (output, errors) = run(".text 0\n add r1, r2, r3\n");
    assert!(!errors);
    // (0 << 26) | (2 << 21) | (3 << 16) | (1 << 11) | 32
    assert_eq!(output, "00000000: 00430820 # add rd=r1 rs1=r2 rs2=r3\n");
}

#[test]
fn test_jump_back_to_start() {
    let (output, errors) = run(".text 0\nstart: j start\n");
    assert!(!errors);
    assert_eq!(output, "00000000: 0bfffffc # j label=start\n");
}

#[test]
fn test_data_words_ascending() {
    let (output, errors) = run(".data 0x200\n.word 1, 2, 3\n");
    assert!(!errors);
    assert_eq!(
        output,
        "00000200: 00000001 # word 1\n\
         00000204: 00000002 # word 2\n\
         00000208: 00000003 # word 3\n"
    );
}

#[test]
fn test_asciiz_at_zero() {
    let (output, errors) = run(".data 0\n.asciiz \"hi\"\n");
    assert!(!errors);
    assert_eq!(output, "00000000: 686900 # string \"hi\"\n");
}

#[test]
fn test_lhi_immediate() {
    let (output, errors) = run(".text 0\n lhi r5, 0xDEAD\n");
    assert!(!errors);
    assert_eq!(output, "00000000: 3c05dead # lhi rd=r5 imm=57005\n");
}

#[test]
fn test_undefined_label_fails_run() {
    let (_, errors) = run(".text 0\nj foo\n");
    assert!(errors);
}

#[test]
fn test_word_negative_one_round_trip() {
    let (output, errors) = run(".data 0\n.word -1\n");
    assert!(!errors);
    assert_eq!(output, "00000000: ffffffff # word -1\n");
}

#[test]
fn test_branch_forward_offset() {
    // beqz at 0x100 targeting 0x200 encodes 0x200 - 0x104
    let (output, errors) = run(
        ".text 0x100\nbeqz r1, target\n.text 0x200\ntarget: nop\n",
    );
    assert!(!errors);
    let branch = output.lines().next().unwrap();
    assert_eq!(branch, "00000100: 102000fc # beqz rs1=r1 label=target");
}

#[test]
fn test_branch_backward_offset() {
    let (output, errors) = run(".text 0x100\nback: nop\nbnez r2, back\n");
    assert!(!errors);
    // 0x100 - 0x108 = -8 as a 16-bit field
    let branch = output.lines().nth(1).unwrap();
    assert_eq!(branch, "00000104: 1440fff8 # bnez rs1=r2 label=back");
}

#[test]
fn test_loads_and_stores() {
    let (output, errors) = run(".text 0\nlw r1, 8(r2)\nsw 12(r3), r4\n");
    assert!(!errors);
    let mut lines = output.lines();
    // lw: opcode 35, rs1=2, rd=1, imm=8
    assert_eq!(
        lines.next().unwrap(),
        "00000000: 8c410008 # lw rd=r1 rs1=r2 imm=8"
    );
    // sw: opcode 43, rs1=3, rd=4, imm=12
    assert_eq!(
        lines.next().unwrap(),
        "00000004: ac64000c # sw rd=r4 rs1=r3 imm=12"
    );
}

#[test]
fn test_floating_point_program() {
    let (output, errors) = run(
        ".data 0x200\nvalues: .float 1.5\n.double 0.25\n.text 0\naddf f1, f2, f3\nmovd f0, f2\n",
    );
    assert!(!errors);
    let lines: Vec<&str> = output.lines().collect();
    // addf: opcode 1, funcode 0
    assert_eq!(lines[0], "00000000: 04430800 # addf rd=f1 rs1=f2 rs2=f3");
    // movd: opcode 0, funcode 51
    assert_eq!(lines[1], "00000004: 00400033 # movd rd=f0 rs1=f2");
    assert_eq!(lines[2], "00000200: 3fc00000 # float 1.5");
    assert_eq!(lines[3], "00000204: 3fd0000000000000 # double 0.25");
}

#[test]
fn test_odd_fpr_for_dpr_is_error() {
    let (_, errors) = run(".text 0\naddd f1, f2, f4\n");
    assert!(errors);
}

#[test]
fn test_duplicate_label_is_error() {
    let (_, errors) = run(".text 0\nfoo: nop\nfoo: nop\n");
    assert!(errors);
}

#[test]
fn test_trap_and_jr() {
    let (output, errors) = run(".text 0\ntrap 6\njr r31\n");
    assert!(!errors);
    let mut lines = output.lines();
    // trap: opcode 17
    assert_eq!(lines.next().unwrap(), "00000000: 44000006 # trap imm=6");
    // jr: opcode 18, rs1=31
    assert_eq!(lines.next().unwrap(), "00000004: 4be00000 # jr rs1=r31");
}

#[test]
fn test_mixed_program_end_to_end() {
    let source = "\
; sum the word table into r1
        .data 0x200
table:  .word 4, 5
        .text 0
main:   addi r2, r0, 2      ; element count
        addi r3, r0, 0x200  ; table base
        add r1, r0, r0
loop:   lw r4, 0(r3)
        add r1, r1, r4
        addi r3, r3, 4
        subi r2, r2, 1
        bnez r2, loop
        trap 0
";
    let (output, errors) = run(source);
    assert!(!errors);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 11);
    // every instruction line is 8 hex chars wide
    for line in &lines {
        let hex = line.split(' ').nth(1).unwrap();
        assert!(hex.len() == 8 || line.contains("word"));
    }
    // the backward branch: 0xc - 0x20 = -20
    assert_eq!(lines[7], "0000001c: 1440ffec # bnez rs1=r2 label=loop");
    assert_eq!(lines[9], "00000200: 00000004 # word 4");
}

#[test]
fn test_assemble_with_mock_reader() {
    let mut reader = MockFileReader::default();
    reader.add_file("program.dlx", ".text 0\nnop\n");

    let options = Options {
        suppress_output: true,
        input_path: "program.dlx".into(),
        ..Default::default()
    };
    let table = load_table();
    assert!(assemble(&options, &table, &reader).unwrap());
}

#[test]
fn test_assemble_writes_hex_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("prog.dlx");
    let output_path = dir.path().join("prog.hex");
    fs::write(&input_path, ".text 0\nadd r1, r2, r3\n").unwrap();

    let options = Options {
        input_path: input_path.clone(),
        output_path: output_path.clone(),
        ..Default::default()
    };
    let table = load_table();
    assert!(assemble(&options, &table, &AsmFileReader).unwrap());

    let listing = fs::read_to_string(&output_path).unwrap();
    assert_eq!(listing, "00000000: 00430820 # add rd=r1 rs1=r2 rs2=r3\n");
}

#[test]
fn test_errors_suppress_output() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("bad.dlx");
    let output_path = dir.path().join("bad.hex");
    fs::write(&input_path, ".text 0\nj missing\n").unwrap();

    let options = Options {
        input_path,
        output_path: output_path.clone(),
        ..Default::default()
    };
    let table = load_table();
    assert!(!assemble(&options, &table, &AsmFileReader).unwrap());
    assert!(!output_path.exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let options = Options {
        input_path: "does_not_exist.dlx".into(),
        ..Default::default()
    };
    let table = load_table();
    assert!(assemble(&options, &table, &AsmFileReader).is_err());
}
