use std::path::Path;
use std::process;

use graphlang_tree::TreeNodeRecord;

use crate::{read_file, report_error, OutputFormat};

pub(crate) fn cmd_fold(records_path: &Path, source: bool, output: OutputFormat, quiet: bool) {
    let text = read_file(records_path, output, quiet);

    let records: Vec<TreeNodeRecord> = match serde_json::from_str(&text) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", records_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let tree = match graphlang_tree::fold(&records) {
        Ok(t) => t,
        Err(e) => {
            let msg = format!("fold error in '{}': {}", records_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if source {
        print!("{}", graphlang_core::print_tree(&tree));
    } else {
        let json = serde_json::to_string_pretty(&tree)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
        println!("{}", json);
    }
}
