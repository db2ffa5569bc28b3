use std::path::Path;
use std::process;

use graphlang_tree::{unfold_with, IdGenerator};

use crate::commands::analyze_file;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_unfold(file: &Path, start_id: u64, output: OutputFormat, quiet: bool) {
    let tree = analyze_file(file, output, quiet).tree();
    let mut ids = IdGenerator::starting_at(start_id);
    let records = match unfold_with(&tree, &mut ids) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("unfold error in '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    tracing::info!(file = %file.display(), records = records.len(), "unfolded");

    let json = serde_json::to_string_pretty(&records)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
    println!("{}", json);
}
