//! MTL import application
//!
//! Parses one or more Wavefront .mtl files, reports diagnostics and hands the
//! materials to a console host.
//!
//! Usage: mtl_import [--config import.toml] [--dump out.ron] [--material NAME] file.mtl...

mod log_host;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mtl_import::foundation::logging;
use mtl_import::prelude::*;
use thiserror::Error;

use log_host::LogHost;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mtl(#[from] MtlError),
    #[error("Material '{0}' not found in any input file")]
    MaterialNotFound(String),
    #[error("Failed to write dump {path:?}: {message}")]
    Dump { path: PathBuf, message: String },
    #[error("{0} file(s) had skipped lines")]
    Warnings(usize),
}

#[derive(Parser, Debug)]
#[command(name = "mtl_import", about = "Parses Wavefront .mtl files and reports what they define")]
struct Args {
    /// Import settings (.toml or .ron)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the parse results to a RON file
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Only import the material with this name
    #[arg(long, value_name = "NAME")]
    material: Option<String>,

    /// MTL files to parse
    #[arg(required = true, value_name = "MTL")]
    files: Vec<PathBuf>,
}

fn load_config(args: &Args) -> Result<ImportConfig, AppError> {
    match &args.config {
        Some(path) => Ok(ImportConfig::load_from_file(path)?),
        None => Ok(ImportConfig::default()),
    }
}

/// Keep only the named material, if present
fn select_material(outcome: &mut ParseOutcome, name: &str) -> bool {
    let selected: Vec<Material> = outcome.registry.get(name).cloned().into_iter().collect();
    let found = !selected.is_empty();
    outcome.registry = MaterialRegistry::from(selected);
    found
}

fn run(args: &Args, config: &ImportConfig, host: &mut LogHost) -> Result<(), AppError> {
    let mut outcomes = Vec::new();
    let mut files_with_warnings = 0;
    let mut material_found = false;

    for path in &args.files {
        let mut outcome = MaterialLoader::load_file(path)?;
        for warning in &outcome.diagnostics.warnings {
            eprintln!("{}: {}", path.display(), warning);
        }
        println!("{}: {}", path.display(), outcome.diagnostics);

        if outcome.diagnostics.has_warnings() {
            files_with_warnings += 1;
        }

        if let Some(name) = &args.material {
            if select_material(&mut outcome, name) {
                material_found = true;
            } else {
                log::warn!("{}: no material named '{}'", path.display(), name);
            }
        }

        if config.apply_to_host {
            match apply_registry(&outcome.registry, host) {
                Ok(summary) => log::debug!("{:?}", summary),
                Err(never) => match never {},
            }
        }
        outcomes.push(outcome);
    }

    for material in host.materials() {
        log::debug!(
            "Host material '{}': {} slots, {} bitmaps, channels {:?}, image alpha {}",
            material.name, material.slots.len(), material.bitmaps.len(), material.enabled, material.image_alpha
        );
    }

    if let Some(path) = &args.dump {
        let text = ron::ser::to_string_pretty(&outcomes, ron::ser::PrettyConfig::default())
            .map_err(|e| AppError::Dump { path: path.clone(), message: e.to_string() })?;
        std::fs::write(path, text)
            .map_err(|e| AppError::Dump { path: path.clone(), message: e.to_string() })?;
        log::info!("Wrote {}", path.display());
    }

    if let Some(name) = &args.material {
        if !material_found {
            return Err(AppError::MaterialNotFound(name.clone()));
        }
    }
    if config.fail_on_warnings && files_with_warnings > 0 {
        return Err(AppError::Warnings(files_with_warnings));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init(config.level_filter());

    let mut host = LogHost::new();
    match run(&args, &config, &mut host) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("mtl_import").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--dump", "out.ron", "a.mtl", "--material", "Hull", "b.mtl"]).unwrap();
        assert_eq!(parsed.dump, Some(PathBuf::from("out.ron")));
        assert_eq!(parsed.material.as_deref(), Some("Hull"));
        assert_eq!(parsed.files, vec![PathBuf::from("a.mtl"), PathBuf::from("b.mtl")]);
        assert!(parsed.config.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["--config"]).is_err());
        assert!(args(&["--verbose", "a.mtl"]).is_err());
    }

    #[test]
    fn test_material_filter_still_fails_on_warnings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.mtl");
        std::fs::write(&path, "newmtl Hull\nKd 1 x 1\nnewmtl Glass\nd 0.5\n").unwrap();

        let parsed = args(&["--material", "Hull", path.to_str().unwrap()]).unwrap();
        let config = ImportConfig { fail_on_warnings: true, ..Default::default() };
        let result = run(&parsed, &config, &mut LogHost::new());
        assert!(matches!(result, Err(AppError::Warnings(1))));
    }

    #[test]
    fn test_material_filter_applies_and_dumps_selection() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.mtl");
        let second = dir.path().join("second.mtl");
        let dump = dir.path().join("out.ron");
        std::fs::write(&first, "newmtl Glass\nd 0.5\n").unwrap();
        std::fs::write(&second, "newmtl Glass\nd 0.2\nnewmtl Hull\nKd 1 0 0\n").unwrap();

        let parsed = args(&[
            "--material", "Hull",
            "--dump", dump.to_str().unwrap(),
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ]).unwrap();
        let config = ImportConfig { apply_to_host: true, ..Default::default() };
        let mut host = LogHost::new();
        run(&parsed, &config, &mut host).unwrap();

        let names: Vec<&str> = host.materials().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Hull"]);

        let text = std::fs::read_to_string(&dump).unwrap();
        assert!(text.contains("Hull"));
        assert!(!text.contains("Glass"));
    }

    #[test]
    fn test_missing_material_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ship.mtl");
        std::fs::write(&path, "newmtl Hull\n").unwrap();

        let parsed = args(&["--material", "Sail", path.to_str().unwrap()]).unwrap();
        let result = run(&parsed, &ImportConfig::default(), &mut LogHost::new());
        assert!(matches!(&result, Err(AppError::MaterialNotFound(name)) if name == "Sail"));
    }
}
