use std::path::Path;

use crate::commands::analyze_file;
use crate::OutputFormat;

pub(crate) fn cmd_print(file: &Path, output: OutputFormat, quiet: bool) {
    let tree = analyze_file(file, output, quiet).tree();
    print!("{}", graphlang_core::print_tree(&tree));
}
