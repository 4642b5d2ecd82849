//! `dtgen generate`: scan, parse everything, assemble everything, then write.

use std::path::{Path, PathBuf};
use std::process;

use dtgen_codegen::{
    emit, generate_all, ComposerAutoload, ConventionCatalog, GeneratedUnit, OutDirResolver,
    PathResolver,
};
use dtgen_core::FileSystemProvider;

use crate::commands::exit_with_parse_error;
use crate::{report_error, OutputFormat};

pub(crate) struct GenerateOptions<'a> {
    pub input: &'a Path,
    pub namespace: &'a str,
    pub conventions: Option<&'a Path>,
    pub composer: &'a Path,
    pub out_dir: Option<&'a Path>,
    pub dry_run: bool,
}

fn fail(msg: String, output: OutputFormat, quiet: bool) -> ! {
    report_error(&msg, output, quiet);
    process::exit(1);
}

pub(crate) fn cmd_generate(opts: GenerateOptions<'_>, output: OutputFormat, quiet: bool) {
    let files = match dtgen_core::scan(opts.input) {
        Ok(files) => files,
        Err(e) => fail(format!("error: {}", e), output, quiet),
    };

    let mut collections = Vec::with_capacity(files.len());
    for file in &files {
        match dtgen_core::parse_file(&FileSystemProvider, file) {
            Ok(collection) => collections.push(collection),
            Err(e) => exit_with_parse_error(&e, output, quiet),
        }
    }

    tracing::debug!(
        files = collections.len(),
        definitions = collections.iter().map(|c| c.len()).sum::<usize>(),
        "parsed input"
    );

    let mut catalog = ConventionCatalog::builtin();
    if let Some(path) = opts.conventions {
        if let Err(e) = catalog.load_file(path) {
            fail(format!("error: {}", e), output, quiet);
        }
    }
    let registry = match catalog.registry(opts.namespace) {
        Ok(r) => r,
        Err(e) => fail(format!("error: {}", e), output, quiet),
    };

    let units = match generate_all(&collections, registry) {
        Ok(units) => units,
        Err(e) => fail(format!("generation error: {}", e), output, quiet),
    };

    let resolver: Box<dyn PathResolver> = match opts.out_dir {
        Some(dir) => Box::new(OutDirResolver::new(dir)),
        None => match ComposerAutoload::from_composer_json(opts.composer) {
            Ok(autoload) => Box::new(autoload),
            Err(e) => fail(format!("error: {}", e), output, quiet),
        },
    };

    let paths = if opts.dry_run {
        units
            .iter()
            .map(|u| resolver.resolve_path(&u.class_name))
            .collect::<Result<Vec<_>, _>>()
    } else {
        emit(&units, resolver.as_ref())
    };
    let paths = match paths {
        Ok(paths) => paths,
        Err(e) => fail(format!("error: {}", e), output, quiet),
    };

    report_success(&units, &paths, opts.dry_run, output, quiet);
}

fn report_success(
    units: &[GeneratedUnit],
    paths: &[PathBuf],
    dry_run: bool,
    output: OutputFormat,
    quiet: bool,
) {
    match output {
        OutputFormat::Text => {
            if quiet {
                return;
            }
            for (unit, path) in units.iter().zip(paths) {
                println!("{} -> {}", unit.class_name, path.display());
            }
            if dry_run {
                println!("Dry run: {} class(es), nothing written", units.len());
            } else {
                println!("Successfully generated and written to disk");
            }
        }
        OutputFormat::Json => {
            let generated: Vec<serde_json::Value> = units
                .iter()
                .zip(paths)
                .map(|(unit, path)| {
                    serde_json::json!({
                        "class": unit.class_name,
                        "path": path.display().to_string(),
                    })
                })
                .collect();
            let json = serde_json::json!({
                "dry_run": dry_run,
                "generated": generated,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}
