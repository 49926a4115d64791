use super::TopologyError;
use crate::core::models::molecule::Molecule;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

pub const DEFAULT_SEARCH_LIMIT: usize = 5_000_000;

/// Raw output of the moiety path search, each list deduplicated by atom set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoietyPaths {
    /// Paths that start at a keep-set atom and end on a keep-set atom.
    pub moiety_to_moiety: Vec<Vec<usize>>,
    /// Paths that start at a keep-set atom and stop where no unvisited neighbor remains.
    pub dead_ends: Vec<Vec<usize>>,
}

/// The keep set together with the atoms on the retained paths joining its members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub keep: BTreeSet<usize>,
    pub between: BTreeSet<usize>,
    pub retained_paths: Vec<Vec<usize>>,
}

impl Connection {
    /// Keep set plus the atoms between moieties.
    pub fn protected(&self) -> BTreeSet<usize> {
        self.keep.union(&self.between).copied().collect()
    }
}

/// Exhaustive simple-path search from every keep-set atom.
///
/// The search is exponential in the worst case, so it carries a budget on the
/// number of path extensions; running out aborts with
/// [`TopologyError::SearchLimitExceeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoietyConnector {
    search_limit: usize,
}

impl Default for MoietyConnector {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl MoietyConnector {
    pub fn new(search_limit: usize) -> Self {
        Self { search_limit }
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    pub fn find_paths(
        &self,
        molecule: &Molecule,
        keep: &BTreeSet<usize>,
    ) -> Result<MoietyPaths, TopologyError> {
        let mut found = MoietyPaths::default();
        let mut seen_complete: HashSet<Vec<usize>> = HashSet::new();
        let mut seen_dead_ends: HashSet<Vec<usize>> = HashSet::new();
        let mut expansions = 0usize;

        for &start in keep {
            let mut path: Vec<usize> = Vec::new();
            let mut stack: Vec<(Vec<usize>, usize)> = Vec::new();
            let mut entering = Some(start);

            loop {
                if let Some(atom) = entering.take() {
                    expansions += 1;
                    if expansions > self.search_limit {
                        return Err(TopologyError::SearchLimitExceeded {
                            limit: self.search_limit,
                        });
                    }
                    path.push(atom);
                    let neighbors: Vec<usize> = molecule.neighbors(atom).collect();
                    if neighbors.iter().all(|n| path.contains(n)) {
                        if seen_dead_ends.insert(sorted_key(&path)) {
                            found.dead_ends.push(path.clone());
                        }
                        path.pop();
                    } else {
                        stack.push((neighbors, 0));
                    }
                }

                let Some(frame) = stack.last_mut() else {
                    break;
                };
                let next = frame.0.get(frame.1).copied();
                frame.1 += 1;
                let Some(next) = next else {
                    stack.pop();
                    path.pop();
                    continue;
                };

                if keep.contains(&next) {
                    let is_round_trip = path[0] == next && path.len() < 3;
                    if !is_round_trip {
                        let mut completed = path.clone();
                        completed.push(next);
                        if seen_complete.insert(sorted_key(&completed)) {
                            found.moiety_to_moiety.push(completed);
                        }
                    }
                } else if !path.contains(&next) {
                    entering = Some(next);
                }
            }
        }

        debug!(
            expansions,
            moiety_paths = found.moiety_to_moiety.len(),
            dead_ends = found.dead_ends.len(),
            "Moiety path search finished"
        );
        Ok(found)
    }

    /// Finds the atoms that lie on the shortest unique paths between keep-set atoms.
    pub fn connect(
        &self,
        molecule: &Molecule,
        keep: &BTreeSet<usize>,
    ) -> Result<Connection, TopologyError> {
        let paths = self.find_paths(molecule, keep)?;
        let retained_paths = shortest_unique_paths(&paths.moiety_to_moiety);

        let between: BTreeSet<usize> = retained_paths
            .iter()
            .flatten()
            .copied()
            .filter(|atom| !keep.contains(atom))
            .collect();

        if !keep.is_disjoint(&between) {
            return Err(TopologyError::Inconsistent(
                "keep set and atoms between moieties overlap".to_string(),
            ));
        }

        Ok(Connection {
            keep: keep.clone(),
            between,
            retained_paths,
        })
    }
}

fn sorted_key(path: &[usize]) -> Vec<usize> {
    let mut key = path.to_vec();
    key.sort_unstable();
    key
}

fn common_prefix_len(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &[usize], b: &[usize]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}

/// Reduces moiety-to-moiety paths to the shortest unique subset.
///
/// Paths are visited shortest first (stable for equal lengths). A path is
/// dropped when some already accepted path shares both a non-empty common
/// prefix and a non-empty common suffix with it, i.e. it links the same two
/// endpoints by a route that is no shorter.
pub fn shortest_unique_paths(paths: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut ordered: Vec<&Vec<usize>> = paths.iter().collect();
    ordered.sort_by_key(|path| path.len());

    let mut accepted: Vec<Vec<usize>> = Vec::new();
    for path in ordered {
        let redundant = accepted.iter().any(|kept| {
            common_prefix_len(path, kept) > 0 && common_suffix_len(path, kept) > 0
        });
        if !redundant {
            accepted.push(path.clone());
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::fixtures;
    use nalgebra::Point3;

    fn chain(elements: &[&str]) -> Molecule {
        let atoms = elements
            .iter()
            .enumerate()
            .map(|(i, e)| Atom::new(e, Point3::new(1.5 * i as f64, 0.0, 0.0)))
            .collect();
        Molecule::from_parts(atoms, (1..elements.len()).map(|i| (i - 1, i))).unwrap()
    }

    #[test]
    fn bridge_between_two_moieties_is_protected() {
        // O-C-C-N: the two carbons connect the heteroatoms.
        let molecule = chain(&["O", "C", "C", "N"]);
        let keep: BTreeSet<usize> = [0, 3].into_iter().collect();
        let connection = MoietyConnector::default().connect(&molecule, &keep).unwrap();
        assert_eq!(connection.between, [1, 2].into_iter().collect::<BTreeSet<usize>>());
        assert_eq!(connection.retained_paths, vec![vec![0, 1, 2, 3]]);
        assert!(connection.keep.is_disjoint(&connection.between));
    }

    #[test]
    fn dead_end_branches_are_recorded_but_not_protected() {
        // O-C-C with nothing past the last carbon.
        let molecule = chain(&["O", "C", "C"]);
        let keep: BTreeSet<usize> = [0].into_iter().collect();
        let connector = MoietyConnector::default();

        let paths = connector.find_paths(&molecule, &keep).unwrap();
        assert_eq!(paths.dead_ends, vec![vec![0, 1, 2]]);
        assert!(paths.moiety_to_moiety.is_empty());
        assert!(connector.connect(&molecule, &keep).unwrap().between.is_empty());
    }

    #[test]
    fn trivial_round_trip_is_ignored() {
        let molecule = chain(&["O", "C", "H"]);
        let keep: BTreeSet<usize> = [0].into_iter().collect();
        let paths = MoietyConnector::default().find_paths(&molecule, &keep).unwrap();
        assert!(paths.moiety_to_moiety.is_empty());
    }

    #[test]
    fn propylbenzene_has_no_atoms_between_moieties() {
        let molecule = fixtures::propylbenzene();
        let keep: BTreeSet<usize> = (0..6).collect();
        let connection = MoietyConnector::default().connect(&molecule, &keep).unwrap();
        assert!(connection.between.is_empty());
        assert_eq!(connection.protected(), keep);
    }

    #[test]
    fn paths_are_deduplicated_by_atom_set() {
        let molecule = chain(&["O", "C", "N"]);
        let keep: BTreeSet<usize> = [0, 2].into_iter().collect();
        let paths = MoietyConnector::default().find_paths(&molecule, &keep).unwrap();
        // 0-1-2 and 2-1-0 are the same path.
        assert_eq!(paths.moiety_to_moiety, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn shortest_unique_paths_prefers_shorter_route_between_same_ends() {
        let paths = vec![vec![0, 5, 6, 7, 3], vec![0, 1, 3], vec![0, 2]];
        let unique = shortest_unique_paths(&paths);
        assert_eq!(unique, vec![vec![0, 2], vec![0, 1, 3]]);
    }

    #[test]
    fn shortest_unique_paths_is_idempotent() {
        let paths = vec![vec![0, 1, 3], vec![4, 1, 0], vec![0, 2, 3], vec![4, 5]];
        let once = shortest_unique_paths(&paths);
        assert_eq!(shortest_unique_paths(&once), once);
    }

    #[test]
    fn search_limit_aborts_the_search() {
        let molecule = fixtures::propylbenzene();
        let keep: BTreeSet<usize> = (0..6).collect();
        let result = MoietyConnector::new(3).find_paths(&molecule, &keep);
        assert_eq!(result, Err(TopologyError::SearchLimitExceeded { limit: 3 }));
    }
}
