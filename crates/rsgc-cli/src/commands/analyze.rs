use crate::cli::AnalyzeArgs;
use crate::commands::{load_structure, source_name};
use crate::config::PartialStripConfig;
use crate::error::Result;
use rsgc::core::models::structure::Structure;
use rsgc::engine::config::StripConfig;
use rsgc::engine::error::EngineError;
use rsgc::workflows::strip::{Analysis, analyze};
use rsgc::workflows::structure::molecule_label;
use std::io::{self, Write};
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let config = PartialStripConfig::load(&args.config)?.merge_with_cli(&args.config)?;
    let (structure, _) = load_structure(&args.input, &config)?;
    let source = source_name(&args.input);

    let stdout = io::stdout();
    let analyzed = render(&structure, &source, &config.strip, &mut stdout.lock())?;
    info!(analyzed, "Analysis complete.");
    Ok(())
}

/// Writes one classification line per molecule and returns how many were analyzed.
/// Molecules rejected for a ring hydrogen are listed but do not stop the listing.
fn render(
    structure: &Structure,
    source: &str,
    config: &StripConfig,
    out: &mut impl Write,
) -> Result<usize> {
    let mut analyzed = 0;
    for entry in &structure.molecules {
        let label = molecule_label(source, entry);
        if entry.is_solvent {
            writeln!(out, "{label}: solvent, left unchanged")?;
            continue;
        }
        if entry.molecule.is_empty() {
            writeln!(out, "{label}: empty")?;
            continue;
        }
        match analyze(&entry.molecule, &label, config) {
            Ok(analysis) => {
                writeln!(out, "{}", describe(&label, entry.molecule.len(), &analysis))?;
                analyzed += 1;
            }
            Err(EngineError::HydrogenInRing { hydrogen, ring, .. }) => {
                writeln!(out, "{label}: rejected, hydrogen {hydrogen} closes ring {ring:?}")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(analyzed)
}

fn describe(label: &str, atoms: usize, analysis: &Analysis) -> String {
    let layers = &analysis.layers;
    let mut line = format!(
        "{label}: {atoms} atoms, {} ring(s) ({} flat), keep {}, between {}, branch {} (alpha {}, beta {}, gamma {})",
        analysis.rings.len(),
        analysis.flat_rings.len(),
        analysis.connection.keep.len(),
        analysis.connection.between.len(),
        analysis.branch.len(),
        layers.alpha.len(),
        layers.beta.len(),
        layers.gamma.len(),
    );
    if analysis.ring_note.is_some() {
        line.push_str(" (Ring may have hydrogen bonding in it.)");
    }
    line
}
