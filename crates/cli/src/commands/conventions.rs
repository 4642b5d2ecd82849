use std::path::Path;
use std::process;

use dtgen_codegen::ConventionCatalog;

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_conventions(conventions: Option<&Path>, output: OutputFormat, quiet: bool) {
    let mut catalog = ConventionCatalog::builtin();
    if let Some(path) = conventions {
        if let Err(e) = catalog.load_file(path) {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }

    match output {
        OutputFormat::Text => {
            for registry in catalog.namespaces() {
                println!("{}", registry.namespace());
                for deriving in registry.derivings() {
                    println!("  {}", deriving);
                }
            }
        }
        OutputFormat::Json => {
            let namespaces: Vec<serde_json::Value> = catalog
                .namespaces()
                .map(|r| {
                    serde_json::json!({
                        "namespace": r.namespace(),
                        "derivings": r.derivings(),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "namespaces": namespaces }))
                    .unwrap_or_default()
            );
        }
    }
}
