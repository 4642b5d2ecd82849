pub(crate) mod conventions;
pub(crate) mod generate;
pub(crate) mod parse;

use std::process;

use dtgen_core::ParseError;

use crate::OutputFormat;

/// Report a parse error and exit 1. JSON mode always prints the structured
/// error, even when quiet.
pub(crate) fn exit_with_parse_error(e: &ParseError, output: OutputFormat, quiet: bool) -> ! {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("parse error: {}", e);
            }
        }
    }
    process::exit(1);
}
