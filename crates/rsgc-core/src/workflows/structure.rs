use super::strip::{StripReport, strip_molecule};
use crate::core::models::structure::{MoleculeEntry, Structure};
use crate::engine::config::StripConfig;
use crate::engine::diagnostics::Diagnostic;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What to do with a molecule that has no atoms left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyMoleculeAction {
    /// Remove it from the structure and carry on.
    Drop,
    /// Fail the whole structure.
    Abort,
}

/// Decides the fate of empty molecules. Called sequentially, one molecule at a
/// time, so implementations may prompt a user.
pub trait ConflictResolver {
    /// `stripped` is `false` when the molecule was already empty in the input.
    fn resolve_empty(&self, entry: &MoleculeEntry, stripped: bool) -> EmptyMoleculeAction;
}

impl<F> ConflictResolver for F
where
    F: Fn(&MoleculeEntry, bool) -> EmptyMoleculeAction,
{
    fn resolve_empty(&self, entry: &MoleculeEntry, stripped: bool) -> EmptyMoleculeAction {
        self(entry, stripped)
    }
}

/// Applies the same action to every empty molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedResolver(pub EmptyMoleculeAction);

impl ConflictResolver for FixedResolver {
    fn resolve_empty(&self, _entry: &MoleculeEntry, _stripped: bool) -> EmptyMoleculeAction {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct StructureOutcome {
    pub structure: Structure,
    pub diagnostics: Vec<Diagnostic>,
    pub reports: Vec<StripReport>,
    /// Labels of molecules removed because they ended up empty.
    pub dropped: Vec<String>,
}

/// Label used for a molecule of the structure read from `source`.
pub fn molecule_label(source: &str, entry: &MoleculeEntry) -> String {
    if source.is_empty() {
        entry.label()
    } else {
        format!("{source}#{}", entry.label())
    }
}

struct Processed {
    entry: MoleculeEntry,
    was_empty: bool,
    diagnostics: Vec<Diagnostic>,
    report: Option<StripReport>,
}

fn process_entry(
    entry: &MoleculeEntry,
    source: &str,
    config: &StripConfig,
) -> Result<Processed, EngineError> {
    let was_empty = entry.molecule.is_empty();
    if entry.is_solvent || was_empty {
        return Ok(Processed {
            entry: entry.clone(),
            was_empty,
            diagnostics: Vec::new(),
            report: None,
        });
    }
    let outcome = strip_molecule(&entry.molecule, &molecule_label(source, entry), config)?;
    Ok(Processed {
        entry: MoleculeEntry {
            molecule: outcome.molecule,
            ..entry.clone()
        },
        was_empty,
        diagnostics: outcome.diagnostics,
        report: Some(outcome.report),
    })
}

/// Strips every non-solvent molecule of `structure`.
///
/// Molecules are independent, so with the `parallel` feature they are processed
/// on the rayon pool; results keep the input order. Molecules that are empty
/// (in the input or after stripping) go to `resolver`; dropped ones are removed
/// and the survivors keep their relative order.
///
/// # Errors
///
/// The first per-molecule error in structure order, [`EngineError::EmptyMolecules`]
/// when the resolver aborts, or [`EngineError::Internal`] if the stripped
/// structure has more atoms than the input (hydrogens added by alpha-carbon
/// completion aside).
#[instrument(skip_all, name = "strip_structure_workflow")]
pub fn run(
    structure: &Structure,
    source: &str,
    config: &StripConfig,
    resolver: &dyn ConflictResolver,
    reporter: &ProgressReporter,
) -> Result<StructureOutcome, EngineError> {
    let total_before = structure.atom_count();
    info!(
        molecules = structure.molecules.len(),
        atoms = total_before,
        "Starting structure stripping."
    );

    let results: Vec<Result<Processed, EngineError>> = reporter.phase("Stripping molecules", || {
        reporter.report(Progress::TaskStart {
            total_steps: structure.molecules.len() as u64,
        });

        #[cfg(not(feature = "parallel"))]
        let iter = structure.molecules.iter();
        #[cfg(feature = "parallel")]
        let iter = structure.molecules.par_iter();

        let results: Vec<_> = iter
            .map(|entry| {
                let result = process_entry(entry, source, config);
                reporter.report(Progress::TaskIncrement);
                result
            })
            .collect();
        reporter.report(Progress::TaskFinish);
        results
    });

    let mut processed = Vec::with_capacity(results.len());
    for result in results {
        processed.push(result?);
    }

    let mut stripped = Structure::new(structure.cell);
    let mut diagnostics = Vec::new();
    let mut reports = Vec::new();
    let mut dropped = Vec::new();
    let mut aborted = Vec::new();

    for item in processed {
        for diagnostic in &item.diagnostics {
            reporter.report(Progress::Warning(diagnostic.report_line()));
        }
        diagnostics.extend(item.diagnostics);
        reports.extend(item.report);

        if !item.entry.molecule.is_empty() {
            stripped.push(item.entry);
            continue;
        }
        let label = molecule_label(source, &item.entry);
        match resolver.resolve_empty(&item.entry, !item.was_empty) {
            EmptyMoleculeAction::Drop => {
                warn!(molecule = %label, "Dropping empty molecule");
                dropped.push(label);
            }
            EmptyMoleculeAction::Abort => aborted.push(label),
        }
    }

    if !aborted.is_empty() {
        return Err(EngineError::EmptyMolecules { labels: aborted });
    }

    let total_after = stripped.atom_count();
    let added: usize = reports.iter().map(|r| r.hydrogens_added).sum();
    if total_after.saturating_sub(added) > total_before {
        return Err(EngineError::Internal(format!(
            "stripping grew the structure from {total_before} to {total_after} atoms"
        )));
    }

    info!(
        molecules = stripped.molecules.len(),
        atoms = total_after,
        dropped = dropped.len(),
        diagnostics = diagnostics.len(),
        "Structure stripping complete."
    );
    Ok(StructureOutcome {
        structure: stripped,
        diagnostics,
        reports,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::fixtures;
    use crate::core::models::molecule::Molecule;
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(name: &str, number: isize, molecule: Molecule) -> MoleculeEntry {
        MoleculeEntry::new(name, 'A', number, molecule)
    }

    fn sample_structure() -> Structure {
        let mut structure = Structure::default();
        structure.push(entry("PRB", 1, fixtures::propylbenzene()));
        structure.push(entry("CHX", 2, fixtures::chair_cyclohexane()));
        structure.push(entry("HOH", 3, fixtures::hydrogen_bonded_square()));
        structure
    }

    #[test]
    fn solvents_pass_through_and_aliphatic_molecules_are_dropped() {
        let mut structure = sample_structure();
        structure.molecules[2].is_solvent = true;

        let outcome = run(
            &structure,
            "cryst",
            &StripConfig::default(),
            &FixedResolver(EmptyMoleculeAction::Drop),
            &ProgressReporter::new(),
        )
        .unwrap();

        let names: Vec<_> = outcome
            .structure
            .molecules
            .iter()
            .map(|e| e.residue_name.as_str())
            .collect();
        assert_eq!(names, vec!["PRB", "HOH"]);
        assert_eq!(outcome.structure.molecules[0].molecule.len(), 15);
        assert_eq!(outcome.structure.molecules[1], structure.molecules[2]);
        assert_eq!(outcome.dropped, vec!["cryst#A:CHX2".to_string()]);
        assert_eq!(outcome.reports.len(), 2);
        assert!(outcome.structure.atom_count() <= structure.atom_count());
    }

    #[test]
    fn abort_resolver_fails_with_the_empty_labels() {
        let result = run(
            &sample_structure(),
            "",
            &StripConfig::default(),
            &FixedResolver(EmptyMoleculeAction::Abort),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::EmptyMolecules { labels }) if labels == vec!["A:CHX2".to_string()]
        ));
    }

    #[test]
    fn resolver_learns_whether_the_molecule_was_empty_in_the_input() {
        let mut structure = sample_structure();
        structure.push(entry("NIL", 4, Molecule::new()));
        let calls = RefCell::new(Vec::new());
        let resolver = |e: &MoleculeEntry, stripped: bool| {
            calls.borrow_mut().push((e.residue_name.clone(), stripped));
            EmptyMoleculeAction::Drop
        };

        run(
            &structure,
            "",
            &StripConfig::default(),
            &resolver,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(
            calls.into_inner(),
            vec![("CHX".to_string(), true), ("NIL".to_string(), false)]
        );
    }

    #[test]
    fn hydrogen_bond_diagnostics_are_collected() {
        let outcome = run(
            &sample_structure(),
            "cryst",
            &StripConfig::default(),
            &FixedResolver(EmptyMoleculeAction::Drop),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].label(), "cryst#A:HOH3");
    }

    #[test]
    fn molecule_errors_fail_the_structure() {
        let mut structure = sample_structure();
        structure.push(entry("BAD", 9, fixtures::hydrogen_bridged_triangle()));
        let result = run(
            &structure,
            "cryst",
            &StripConfig::default(),
            &FixedResolver(EmptyMoleculeAction::Drop),
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::HydrogenInRing { label, .. }) if label == "cryst#A:BAD9"
        ));
    }

    #[test]
    fn progress_reports_one_increment_per_molecule() {
        let increments = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::TaskIncrement) {
                increments.fetch_add(1, Ordering::SeqCst);
            }
        }));
        run(
            &sample_structure(),
            "",
            &StripConfig::default(),
            &FixedResolver(EmptyMoleculeAction::Drop),
            &reporter,
        )
        .unwrap();
        drop(reporter);
        assert_eq!(increments.load(Ordering::SeqCst), 3);
    }
}
