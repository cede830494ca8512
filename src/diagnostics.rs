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

use colored::Colorize;

// Print an error message to the console. Errors set the assembler's sticky
// error flag at the call site; printing never aborts the run.
pub fn error(message: String) {
    let title = "error:".red().bold();
    eprintln!("{} {}", title, message);
}

// Print a warning message to the console. Warnings do not affect the exit
// code.
pub fn warning(message: String, line_number: usize) {
    let title = "warning:".yellow().bold();
    eprintln!("{} line {}: {}", title, line_number, message);
}
