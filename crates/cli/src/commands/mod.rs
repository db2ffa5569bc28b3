pub(crate) mod check;
pub(crate) mod fold;
pub(crate) mod print;
pub(crate) mod tokens;
pub(crate) mod unfold;

use std::path::Path;
use std::process;

use graphlang_core::Analysis;

use crate::{read_file, report_diagnostics, OutputFormat};

/// Analyze a source file, exiting 1 with its diagnostics if it has any.
pub(crate) fn analyze_file(file: &Path, output: OutputFormat, quiet: bool) -> Analysis {
    let src = read_file(file, output, quiet);
    let analysis = graphlang_core::analyze(&src);
    if analysis.has_errors() {
        report_diagnostics(file, analysis.diagnostics(), output, quiet);
        process::exit(1);
    }
    analysis
}
