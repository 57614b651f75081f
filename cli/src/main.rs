//! Command-line tools for game object files
//!
//! Usage:
//!   gobj validate <paths...>    # Check objects against format invariants
//!   gobj fmt <paths...>         # Rewrite files in canonical form
//!   gobj show <file>            # Print a human summary of one object
//!   gobj export <file>          # Dump the typed model as JSON or RON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use gobj::format::{parse_document, write_document};
use gobj::object::{GameObject, ObjectComponent, SpriteDesc, OBJECT_EXTENSION};
use gobj::validate::Validator;

#[derive(Parser)]
#[command(name = "gobj")]
#[command(about = "Tools for declarative game object files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate object files
    Validate {
        /// Object files or directories to scan
        paths: Vec<PathBuf>,
        /// Project root for checking that referenced assets exist
        #[arg(long)]
        project_root: Option<PathBuf>,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Rewrite files in canonical form
    Fmt {
        /// Object files or directories to scan
        paths: Vec<PathBuf>,
        /// Report non-canonical files without writing
        #[arg(long)]
        check: bool,
    },
    /// Print a human summary of one object
    Show {
        /// Object file to show
        file: PathBuf,
    },
    /// Dump the typed model for other tools
    Export {
        /// Object file to export
        file: PathBuf,
        /// Output serialization
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Ron,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let clean = match cli.command {
        Commands::Validate {
            paths,
            project_root,
            strict,
        } => validate(&paths, project_root, strict)?,
        Commands::Fmt { paths, check } => fmt(&paths, check)?,
        Commands::Show { file } => {
            show(&file)?;
            true
        }
        Commands::Export {
            file,
            format,
            pretty,
        } => {
            export(&file, format, pretty)?;
            true
        }
    };

    if !clean {
        std::process::exit(1);
    }
    Ok(())
}

/// Expand files and directories into the object files they contain
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut files)
                .with_context(|| format!("Failed to scan {:?}", path))?;
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    anyhow::ensure!(!files.is_empty(), "No object files found");
    Ok(files)
}

fn collect_dir(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_dir(&path, out)?;
        } else if path
            .extension()
            .map(|ext| ext == OBJECT_EXTENSION)
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    Ok(())
}

fn validate(paths: &[PathBuf], project_root: Option<PathBuf>, strict: bool) -> Result<bool> {
    let files = collect_files(paths)?;
    let mut validator = Validator::new().strict(strict);
    if let Some(root) = project_root {
        validator = validator.with_project_root(root);
    }

    let mut errors = 0;
    let mut warnings = 0;
    for file in &files {
        let object = match GameObject::load(file) {
            Ok(object) => object,
            Err(e) => {
                eprintln!("{}: error: {}", file.display(), e);
                errors += 1;
                continue;
            }
        };
        let report = validator.validate(&object);
        for issue in &report.issues {
            eprintln!("{}: {}", file.display(), issue);
        }
        errors += report.error_count();
        warnings += report.warning_count();
    }

    println!(
        "{} file(s) checked, {} error(s), {} warning(s)",
        files.len(),
        errors,
        warnings
    );
    Ok(errors == 0)
}

fn fmt(paths: &[PathBuf], check: bool) -> Result<bool> {
    let files = collect_files(paths)?;
    let mut dirty = 0;
    for file in &files {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {:?}", file))?;
        let doc = parse_document(&text)
            .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), e))?;
        let canonical = write_document(&doc);
        if canonical == text {
            continue;
        }
        dirty += 1;
        if check {
            println!("{}", file.display());
        } else {
            std::fs::write(file, canonical)
                .with_context(|| format!("Failed to write {:?}", file))?;
            println!("Formatted {}", file.display());
        }
    }

    if check && dirty > 0 {
        println!("{} file(s) need formatting", dirty);
        return Ok(false);
    }
    Ok(true)
}

fn show(file: &Path) -> Result<()> {
    let object = GameObject::load(file)
        .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), e))?;

    println!("{}: {} component(s)", file.display(), object.components.len());
    for component in &object.components {
        match component {
            ObjectComponent::Referenced(c) => {
                println!("  \"{}\" -> {}", c.id, c.component);
            }
            ObjectComponent::Embedded(c) => {
                println!("  \"{}\" (embedded {})", c.id, c.kind);
            }
        }
        let t = component.transform();
        println!(
            "    position ({}, {}, {})  rotation ({}, {}, {}, {})",
            t.position.x,
            t.position.y,
            t.position.z,
            t.rotation.x,
            t.rotation.y,
            t.rotation.z,
            t.rotation.w
        );
        if let ObjectComponent::Embedded(c) = component {
            if let Some(Ok(sprite)) = SpriteDesc::from_embedded(c) {
                println!(
                    "    sprite: {} \"{}\" ({})",
                    sprite.tile_set,
                    sprite.default_animation,
                    sprite.blend_mode.token()
                );
            }
        }
    }
    Ok(())
}

fn export(file: &Path, format: ExportFormat, pretty: bool) -> Result<()> {
    let object = GameObject::load(file)
        .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), e))?;

    let out = match (format, pretty) {
        (ExportFormat::Json, true) => serde_json::to_string_pretty(&object)?,
        (ExportFormat::Json, false) => serde_json::to_string(&object)?,
        (ExportFormat::Ron, true) => {
            let config = ron::ser::PrettyConfig::new().indentor("  ".to_string());
            ron::ser::to_string_pretty(&object, config)?
        }
        (ExportFormat::Ron, false) => ron::to_string(&object)?,
    };
    println!("{}", out);
    Ok(())
}
