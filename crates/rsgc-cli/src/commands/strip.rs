use crate::cli::{OnEmpty, StripArgs};
use crate::commands::{load_structure, source_name};
use crate::config::PartialStripConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use rsgc::core::io::bgf::BgfFile;
use rsgc::core::io::traits::MolecularFile;
use rsgc::core::models::structure::MoleculeEntry;
use rsgc::engine::diagnostics::Diagnostic;
use rsgc::engine::progress::ProgressReporter;
use rsgc::workflows::strip::StripReport;
use rsgc::workflows::structure::{
    self, ConflictResolver, EmptyMoleculeAction, FixedResolver, StructureOutcome, molecule_label,
};
use serde::Serialize;
use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: StripArgs) -> Result<()> {
    if args.input == args.output {
        return Err(CliError::Argument(
            "input and output paths must differ".to_string(),
        ));
    }

    let config = PartialStripConfig::load(&args.config)?.merge_with_cli(&args.config)?;
    let (structure, metadata) = load_structure(&args.input, &config)?;
    let source = source_name(&args.input);

    let resolver: Box<dyn ConflictResolver> = match args.on_empty {
        OnEmpty::Ask => Box::new(PromptResolver::new(
            &source,
            io::stdin().lock(),
            io::stderr(),
        )),
        OnEmpty::Drop => Box::new(FixedResolver(EmptyMoleculeAction::Drop)),
        OnEmpty::Abort => Box::new(FixedResolver(EmptyMoleculeAction::Abort)),
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Stripping {} molecule(s)...", structure.molecules.len());
    let outcome = match structure::run(
        &structure,
        &source,
        &config.strip,
        resolver.as_ref(),
        &reporter,
    ) {
        Ok(outcome) => outcome,
        Err(e) => {
            if let (Some(path), Some(diagnostic)) = (&args.ring_report, Diagnostic::from_error(&e))
            {
                append_ring_report(path, std::slice::from_ref(&diagnostic))?;
            }
            return Err(e.into());
        }
    };

    if let Some(path) = &args.ring_report {
        append_ring_report(path, &outcome.diagnostics)?;
    }

    info!("Writing stripped structure to {:?}", &args.output);
    BgfFile::write_to_path(&outcome.structure, &metadata, &args.output).map_err(|e| {
        CliError::FileWriting {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;

    if let Some(path) = &args.summary {
        write_summary(path, &source, structure.atom_count(), &outcome)?;
    }

    println!(
        "✓ {} atoms -> {} atoms in {} molecule(s), written to: {}",
        structure.atom_count(),
        outcome.structure.atom_count(),
        outcome.structure.molecules.len(),
        args.output.display()
    );
    if !outcome.dropped.is_empty() {
        println!("  Dropped empty molecules: {}", outcome.dropped.join(", "));
    }
    if !outcome.diagnostics.is_empty() {
        println!(
            "  {} molecule(s) have rings that may be closed by hydrogen bonds.",
            outcome.diagnostics.len()
        );
    }
    Ok(())
}

/// Asks on `output` whether each empty molecule may be dropped. Anything but
/// `y`/`yes` (or a closed input) aborts.
pub struct PromptResolver<R, W> {
    source: String,
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(source: &str, input: R, output: W) -> Self {
        Self {
            source: source.to_string(),
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }
}

impl<R: BufRead, W: Write> ConflictResolver for PromptResolver<R, W> {
    fn resolve_empty(&self, entry: &MoleculeEntry, stripped: bool) -> EmptyMoleculeAction {
        let label = molecule_label(&self.source, entry);
        let reason = if stripped {
            "has no atoms left after stripping"
        } else {
            "has no atoms in the input"
        };
        {
            let mut output = self.output.borrow_mut();
            let _ = write!(output, "Molecule {label} {reason}. Drop it and continue? [y/N] ");
            let _ = output.flush();
        }

        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(0) => {
                warn!(molecule = %label, "No answer on standard input; aborting.");
                EmptyMoleculeAction::Abort
            }
            Ok(_) => match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => EmptyMoleculeAction::Drop,
                _ => EmptyMoleculeAction::Abort,
            },
            Err(e) => {
                warn!(molecule = %label, error = %e, "Could not read an answer; aborting.");
                EmptyMoleculeAction::Abort
            }
        }
    }
}

/// Appends one line per diagnostic, creating the file on first use.
fn append_ring_report(path: &Path, diagnostics: &[Diagnostic]) -> Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for diagnostic in diagnostics {
        writeln!(file, "{}", diagnostic.report_line())?;
    }
    info!(entries = diagnostics.len(), "Ring report updated: {:?}", path);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct Summary<'a> {
    source: &'a str,
    atoms_before: usize,
    atoms_after: usize,
    dropped: &'a [String],
    diagnostics: &'a [Diagnostic],
    molecules: &'a [StripReport],
}

fn write_summary(
    path: &Path,
    source: &str,
    atoms_before: usize,
    outcome: &StructureOutcome,
) -> Result<()> {
    let summary = Summary {
        source,
        atoms_before,
        atoms_after: outcome.structure.atom_count(),
        dropped: &outcome.dropped,
        diagnostics: &outcome.diagnostics,
        molecules: &outcome.reports,
    };
    let text = toml::to_string(&summary).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use crate::commands::test_support::propylbenzene_bgf;
    use rsgc::core::models::molecule::Molecule;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn strip_args(dir: &Path, on_empty: OnEmpty) -> StripArgs {
        let input = dir.join("cryst.bgf");
        std::fs::write(&input, propylbenzene_bgf()).unwrap();
        StripArgs {
            input,
            output: dir.join("stripped.bgf"),
            config: ConfigArgs::default(),
            on_empty,
            ring_report: Some(dir.join("rings.txt")),
            summary: Some(dir.join("summary.toml")),
        }
    }

    fn empty_entry() -> MoleculeEntry {
        MoleculeEntry::new("LIG", 'A', 7, Molecule::new())
    }

    #[test]
    fn prompt_accepts_yes_and_defaults_to_abort() {
        let yes = PromptResolver::new("cryst", Cursor::new("Yes\n"), Vec::new());
        assert_eq!(yes.resolve_empty(&empty_entry(), true), EmptyMoleculeAction::Drop);
        let prompt = String::from_utf8(yes.output.into_inner()).unwrap();
        assert!(prompt.contains("cryst#A:LIG7"));
        assert!(prompt.contains("after stripping"));

        let blank = PromptResolver::new("cryst", Cursor::new("\n"), Vec::new());
        assert_eq!(blank.resolve_empty(&empty_entry(), false), EmptyMoleculeAction::Abort);
    }

    #[test]
    fn prompt_aborts_when_input_is_closed() {
        let closed = PromptResolver::new("", Cursor::new(""), io::sink());
        assert_eq!(closed.resolve_empty(&empty_entry(), true), EmptyMoleculeAction::Abort);
    }

    #[test]
    fn prompt_answers_are_consumed_in_order() {
        let resolver = PromptResolver::new("cryst", Cursor::new("y\nn\n"), io::sink());
        assert_eq!(resolver.resolve_empty(&empty_entry(), true), EmptyMoleculeAction::Drop);
        assert_eq!(resolver.resolve_empty(&empty_entry(), true), EmptyMoleculeAction::Abort);
    }

    #[test]
    fn strip_drops_the_emptied_molecule_and_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let args = strip_args(dir.path(), OnEmpty::Drop);
        let output = args.output.clone();
        let summary = args.summary.clone().unwrap();
        let rings = args.ring_report.clone().unwrap();

        run(args).unwrap();

        let (stripped, _) = BgfFile::read_from_path(&output).unwrap();
        let molecules: Vec<_> = stripped
            .molecules
            .iter()
            .map(|e| (e.residue_name.as_str(), e.molecule.len()))
            .collect();
        assert_eq!(molecules, vec![("PRB", 15), ("HOH", 3)]);

        let summary = std::fs::read_to_string(summary).unwrap();
        assert!(summary.contains("atoms-before = 32"));
        assert!(summary.contains("atoms-after = 18"));
        assert!(summary.contains("cryst#A:ETH3"));
        assert!(!rings.exists());
    }

    #[test]
    fn solvent_residues_from_the_config_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("rsgc.toml");
        std::fs::write(&config_path, "solvent-residues = [\"HOH\", \"eth\"]\n").unwrap();
        let mut args = strip_args(dir.path(), OnEmpty::Abort);
        args.config.config = Some(config_path);
        args.config.ethyl = true;
        let output = args.output.clone();

        run(args).unwrap();

        let (stripped, _) = BgfFile::read_from_path(&output).unwrap();
        let sizes: Vec<_> = stripped.molecules.iter().map(|e| e.molecule.len()).collect();
        assert_eq!(sizes, vec![18, 3, 8]);
    }

    #[test]
    fn abort_leaves_no_output_behind() {
        let dir = tempfile::tempdir().unwrap();
        let args = strip_args(dir.path(), OnEmpty::Abort);
        let output = args.output.clone();

        let err = run(args).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
        assert!(!output.exists());
    }

    #[test]
    fn same_input_and_output_is_rejected() {
        let args = StripArgs {
            input: PathBuf::from("a.bgf"),
            output: PathBuf::from("a.bgf"),
            config: ConfigArgs::default(),
            on_empty: OnEmpty::Drop,
            ring_report: None,
            summary: None,
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }

    #[test]
    fn ring_report_appends_one_line_per_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rings.txt");
        let note = Diagnostic::PossibleHydrogenBond {
            label: "cryst#A:LIG1".into(),
            hydrogen: 1,
            ring: vec![0, 1, 2, 3],
        };
        let fatal = Diagnostic::HydrogenInRing {
            label: "cryst#A:LIG2".into(),
            hydrogen: 2,
            ring: vec![0, 1, 2],
        };
        append_ring_report(&path, std::slice::from_ref(&note)).unwrap();
        append_ring_report(&path, &[fatal]).unwrap();
        append_ring_report(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "cryst#A:LIG1 (Ring may have hydrogen bonding in it.)\ncryst#A:LIG2\n"
        );
    }
}
