use crate::core::models::graph::BondGraph;
use std::collections::BTreeSet;

/// Branch atoms layered by bond distance from the protected set.
///
/// Each pair is `(outer, inner)`: a beta atom with the alpha atom it hangs
/// from, or a gamma atom with its beta atom. An outer atom bonded to several
/// inner atoms appears in one pair per bond.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchLayers {
    pub alpha: BTreeSet<usize>,
    pub beta: BTreeSet<usize>,
    pub gamma: BTreeSet<usize>,
    pub beta_alpha: Vec<(usize, usize)>,
    pub gamma_beta: Vec<(usize, usize)>,
}

/// All atoms of the graph outside `protected`.
pub fn branch_atoms(graph: &BondGraph, protected: &BTreeSet<usize>) -> BTreeSet<usize> {
    (0..graph.node_count())
        .filter(|atom| !protected.contains(atom))
        .collect()
}

pub fn classify(
    branch: &BTreeSet<usize>,
    protected: &BTreeSet<usize>,
    graph: &BondGraph,
) -> BranchLayers {
    let mut layers = BranchLayers {
        alpha: branch
            .iter()
            .copied()
            .filter(|&atom| graph.neighbors(atom).any(|n| protected.contains(&n)))
            .collect(),
        ..BranchLayers::default()
    };

    for &alpha in &layers.alpha {
        for n in graph.neighbors(alpha) {
            if protected.contains(&n) || layers.alpha.contains(&n) {
                continue;
            }
            layers.beta.insert(n);
            layers.beta_alpha.push((n, alpha));
        }
    }

    for &beta in &layers.beta {
        for n in graph.neighbors(beta) {
            if protected.contains(&n) || layers.alpha.contains(&n) || layers.beta.contains(&n) {
                continue;
            }
            layers.gamma.insert(n);
            layers.gamma_beta.push((n, beta));
        }
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::fixtures;

    fn propylbenzene_layers() -> BranchLayers {
        let molecule = fixtures::propylbenzene();
        let protected: BTreeSet<usize> = (0..6).collect();
        let branch = branch_atoms(molecule.graph(), &protected);
        classify(&branch, &protected, molecule.graph())
    }

    #[test]
    fn alpha_atoms_touch_the_protected_set() {
        let layers = propylbenzene_layers();
        assert_eq!(layers.alpha, [6, 7, 8, 9, 10, 11].into_iter().collect::<BTreeSet<usize>>());
    }

    #[test]
    fn beta_and_gamma_follow_the_chain_outward() {
        let layers = propylbenzene_layers();
        assert_eq!(layers.beta, [12, 13, 14].into_iter().collect::<BTreeSet<usize>>());
        assert_eq!(layers.gamma, [15, 16, 17].into_iter().collect::<BTreeSet<usize>>());
        assert_eq!(layers.beta_alpha, vec![(12, 11), (13, 11), (14, 11)]);
        assert_eq!(layers.gamma_beta, vec![(15, 14), (16, 14), (17, 14)]);
    }

    #[test]
    fn layers_are_disjoint_from_each_other_and_from_protected() {
        let layers = propylbenzene_layers();
        let protected: BTreeSet<usize> = (0..6).collect();
        assert!(layers.alpha.is_disjoint(&layers.beta));
        assert!(layers.beta.is_disjoint(&layers.gamma));
        assert!(layers.alpha.is_disjoint(&layers.gamma));
        assert!(layers.gamma.is_disjoint(&protected));
    }

    #[test]
    fn branch_atoms_exclude_protected() {
        let molecule = fixtures::propylbenzene();
        let protected: BTreeSet<usize> = (0..6).collect();
        let branch = branch_atoms(molecule.graph(), &protected);
        assert_eq!(branch.len(), 15);
        assert!(branch.is_disjoint(&protected));
    }

    #[test]
    fn beta_reached_from_two_alphas_is_listed_once_with_both_pairs() {
        let molecule = fixtures::doubly_anchored_branch();
        let protected: BTreeSet<usize> = [0].into_iter().collect();
        let branch = branch_atoms(molecule.graph(), &protected);
        let layers = classify(&branch, &protected, molecule.graph());

        assert_eq!(layers.alpha, [1, 2].into_iter().collect::<BTreeSet<usize>>());
        assert_eq!(layers.beta, [3].into_iter().collect::<BTreeSet<usize>>());
        assert_eq!(layers.beta_alpha, vec![(3, 1), (3, 2)]);
        assert_eq!(layers.gamma_beta, vec![(4, 3)]);
    }

    #[test]
    fn empty_protected_set_yields_no_layers() {
        let molecule = fixtures::chair_cyclohexane();
        let protected = BTreeSet::new();
        let branch = branch_atoms(molecule.graph(), &protected);
        assert_eq!(classify(&branch, &protected, molecule.graph()), BranchLayers::default());
    }
}
