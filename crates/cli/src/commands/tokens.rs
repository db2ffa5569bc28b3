use std::path::Path;
use std::process;

use graphlang_core::TokenKind;

use crate::{read_file, report_diagnostics, OutputFormat};

pub(crate) fn cmd_tokens(file: &Path, output: OutputFormat, quiet: bool) {
    let src = read_file(file, output, quiet);
    let lexed = graphlang_core::lex(&src);

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&lexed.tokens)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            for token in &lexed.tokens {
                let kind = format!("{:?}", token.kind);
                if token.kind == TokenKind::Eop {
                    println!(
                        "{}:{}\t{}",
                        token.range.start.line, token.range.start.column, kind
                    );
                } else {
                    println!(
                        "{}:{}\t{:<10}\t{}",
                        token.range.start.line, token.range.start.column, kind, token.word
                    );
                }
            }
        }
    }

    if !lexed.errors.is_empty() {
        report_diagnostics(file, &lexed.errors, output, quiet);
        process::exit(1);
    }
}
