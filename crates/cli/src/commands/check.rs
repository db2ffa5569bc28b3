use std::path::Path;
use std::process;

use serde::Serialize;

use crate::{read_file, report_diagnostics, OutputFormat};

#[derive(Serialize)]
struct CheckReport {
    file: String,
    ok: bool,
    lexical: usize,
    syntax: usize,
    semantic: usize,
    modules: Vec<String>,
    diagnostics: Vec<serde_json::Value>,
}

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let src = read_file(file, output, quiet);
    let analysis = graphlang_core::analyze(&src);
    let ok = !analysis.has_errors();

    match output {
        OutputFormat::Json => {
            let report = CheckReport {
                file: file.display().to_string(),
                ok,
                lexical: analysis.lexical_errors.len(),
                syntax: analysis.syntax_errors.len(),
                semantic: analysis.semantic_errors.len(),
                modules: analysis.table.names().map(str::to_owned).collect(),
                diagnostics: analysis.diagnostics().map(|d| d.to_json_value()).collect(),
            };
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            if ok {
                if !quiet {
                    println!(
                        "{}: ok ({} modules)",
                        file.display(),
                        analysis.table.len()
                    );
                }
            } else {
                report_diagnostics(file, analysis.diagnostics(), output, quiet);
                if !quiet {
                    eprintln!(
                        "{}: {} lexical, {} syntax, {} semantic error(s)",
                        file.display(),
                        analysis.lexical_errors.len(),
                        analysis.syntax_errors.len(),
                        analysis.semantic_errors.len()
                    );
                }
            }
        }
    }

    if !ok {
        process::exit(1);
    }
}
