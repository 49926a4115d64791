pub mod analyze;
pub mod strip;

use crate::config::ResolvedConfig;
use crate::error::{CliError, Result};
use rsgc::core::io::bgf::{BgfFile, BgfMetadata};
use rsgc::core::io::traits::MolecularFile;
use rsgc::core::models::structure::Structure;
use std::path::Path;
use tracing::info;

/// Prefix for molecule labels: the input file name without its extension.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads a BGF structure and flags the configured solvent residues.
pub fn load_structure(path: &Path, config: &ResolvedConfig) -> Result<(Structure, BgfMetadata)> {
    info!("Loading input structure from {:?}", path);
    let (mut structure, metadata) =
        BgfFile::read_from_path(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    let solvents = structure.mark_solvents(&config.solvent_residues);
    info!(
        molecules = structure.molecules.len(),
        atoms = structure.atom_count(),
        solvents,
        "Structure loaded."
    );
    Ok((structure, metadata))
}
