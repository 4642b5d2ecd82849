use std::path::Path;

use dtgen_core::FileSystemProvider;

use crate::commands::exit_with_parse_error;
use crate::OutputFormat;

/// Print the definitions of one file as JSON, whatever `--output` says.
pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    match dtgen_core::parse_file(&FileSystemProvider, file) {
        Ok(collection) => {
            let pretty = serde_json::to_string_pretty(&collection)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        Err(e) => exit_with_parse_error(&e, output, quiet),
    }
}
