use clap::Parser;
use dicomdeid_core::cli::report::{ExportEntry, TextReport};
use dicomdeid_core::cli::{Cli, OutputFormat};
use dicomdeid_core::record::has_dicom_header;
use dicomdeid_core::{DicomRecord, Exporter, LookupRecord, Result};
use log::{error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if let Err(e) = std::fs::create_dir_all(&cli.output_dir) {
        eprintln!(
            "Error: Cannot create output directory {}: {}",
            cli.output_dir.display(),
            e
        );
        process::exit(1);
    }

    let files = match collect_dicom_files(&cli.inputs) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to read input: {}", e);
            eprintln!("Error: Failed to read input: {}", e);
            process::exit(1);
        }
    };

    if files.is_empty() {
        eprintln!("Error: No DICOM files (.dcm) found in input");
        process::exit(1);
    }

    info!("Found {} DICOM files", files.len());

    let exporter = Exporter::new(cli.config());
    let mut destinations = HashSet::new();
    let mut entries = Vec::new();

    for path in files {
        let lookup = cli.lookup_for(&path);
        let destination = cli
            .output_dir
            .join(lookup.filename.as_deref().unwrap_or("record.dcm"));

        if !destinations.insert(destination.clone()) {
            warn!(
                "Skipping {}: {} is already written by another input",
                path.display(),
                destination.display()
            );
            continue;
        }

        match export_file(&exporter, &path, &destination, lookup) {
            Ok(entry) => {
                info!("Exported: {}", path.display());
                entries.push(entry);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
            }
        }
    }

    if entries.is_empty() {
        eprintln!("Error: No DICOM files could be exported");
        process::exit(1);
    }

    info!("Successfully exported {} files", entries.len());

    output_report(&entries, cli.format);
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Reads, exports and writes one file
fn export_file(
    exporter: &Exporter,
    path: &Path,
    destination: &Path,
    lookup: LookupRecord,
) -> Result<ExportEntry> {
    let record = DicomRecord::from_file(path)?;
    let (record, lookup) = exporter.export(record, lookup)?;
    record.write_to_file(destination)?;

    Ok(ExportEntry {
        source: path.to_path_buf(),
        destination: destination.to_path_buf(),
        lookup,
    })
}

/// Expands the inputs into a list of DICOM files
///
/// Files are taken as given. Directories contribute `.dcm`/`.dicom` files,
/// and files without extension that carry a DICOM header.
fn collect_dicom_files(inputs: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            match path.extension() {
                Some(ext) => {
                    if ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom") {
                        found.push(path);
                    }
                }
                None => {
                    if has_dicom_header(&path) {
                        info!("Found headerless DICOM file: {}", path.display());
                        found.push(path);
                    }
                }
            }
        }
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

fn output_report(entries: &[ExportEntry], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(entries));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match dicomdeid_core::cli::report::to_json(entries) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
