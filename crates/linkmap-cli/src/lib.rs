//! Linkmap CLI library
//!
//! This module contains the core CLI logic for the Linkmap canvas tool.

pub mod error_adapter;

mod args;
mod config;
mod vault;

pub use args::{Args, Command, Direction};
pub use error_adapter::ErrorAdapter;
pub use vault::Vault;

use std::path::{Path, PathBuf};

use log::info;

use linkmap::{
    CanvasBuilder, DiagramStore, FsDiagramStore, LinkmapError,
    config::{AppConfig, ExploreConfig},
    document::DocumentRef,
    naming,
};

/// Run the Linkmap CLI application
///
/// # Errors
///
/// Returns `LinkmapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unknown documents or canvases
/// - Malformed canvas files
pub fn run(args: &Args) -> Result<(), LinkmapError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Build {
            vault,
            document,
            depth,
            output,
        } => {
            let app_config = match depth {
                Some(depth) => AppConfig::new(
                    app_config.layout().clone(),
                    ExploreConfig::new(*depth),
                ),
                None => app_config,
            };
            build(app_config, vault, document, output.as_deref())
        }
        Command::Expand {
            vault,
            diagram,
            document,
            direction,
        } => expand(app_config, vault, diagram, document.as_deref(), *direction),
        Command::Grow { vault, diagram } => grow(app_config, vault, diagram),
    }
}

fn build(
    config: AppConfig,
    vault: &str,
    document: &str,
    output: Option<&str>,
) -> Result<(), LinkmapError> {
    let vault = Vault::open(vault)?;
    let seed = resolve_document(&vault, document)?;

    let diagram = CanvasBuilder::new(config).build(vault.index(), &seed)?;

    let output = match output {
        Some(output) => PathBuf::from(output),
        None => vault.root().join(naming::diagram_path_for(&seed)),
    };
    FsDiagramStore::new().write(&output, &diagram)?;

    info!(
        output_file = output.display().to_string(),
        nodes = diagram.nodes().len();
        "Canvas exported successfully"
    );
    Ok(())
}

fn expand(
    config: AppConfig,
    vault: &str,
    diagram: &str,
    document: Option<&str>,
    direction: Direction,
) -> Result<(), LinkmapError> {
    let vault = Vault::open(vault)?;
    let focus = document
        .map(|document| resolve_document(&vault, document))
        .transpose()?;

    let added = CanvasBuilder::new(config).expand_stored(
        &FsDiagramStore::new(),
        Path::new(diagram),
        vault.index(),
        focus.as_ref(),
        direction.expand_directions(),
    )?;

    info!(diagram, added; "Expansion finished");
    Ok(())
}

fn grow(config: AppConfig, vault: &str, diagram: &str) -> Result<(), LinkmapError> {
    let vault = Vault::open(vault)?;
    let store = FsDiagramStore::new();
    let path = Path::new(diagram);

    let mut canvas = store.read(path)?;
    let added = CanvasBuilder::new(config).grow(&mut canvas, vault.index())?;
    if added > 0 {
        store.write(path, &canvas)?;
    }

    info!(diagram, added; "Growth finished");
    Ok(())
}

fn resolve_document(vault: &Vault, name: &str) -> Result<DocumentRef, LinkmapError> {
    vault.resolve(name).ok_or_else(|| {
        LinkmapError::NotFound(format!(
            "document `{name}` in vault `{}`",
            vault.root().display()
        ))
    })
}
