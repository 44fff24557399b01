use std::collections::HashMap;

/// An atom addressed as (molecule index, atom index).
pub type AtomRef = (usize, usize);

/// Disjoint-set forest with union by size and path halving.
#[derive(Debug, Default, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn push(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.size.push(1);
        id
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Collects charge-equivalence constraints across molecules.
///
/// The substructure-matching collaborator reports, for each matched position
/// of a common substructure, the set of atoms that occupy that position
/// across all molecules. Overlapping reports merge transitively, so an atom
/// appearing in two positions fuses both classes regardless of how many
/// reports are involved.
#[derive(Debug, Default)]
pub struct EquivalenceGrouper {
    ids: HashMap<AtomRef, usize>,
    atoms: Vec<AtomRef>,
    sets: DisjointSet,
}

impl EquivalenceGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, atom: AtomRef) -> usize {
        match self.ids.get(&atom) {
            Some(&id) => id,
            None => {
                let id = self.sets.push();
                self.ids.insert(atom, id);
                self.atoms.push(atom);
                id
            }
        }
    }

    /// Records that all the given atoms must carry equal charge.
    pub fn add_equivalent(&mut self, atoms: &[AtomRef]) {
        let Some((&first, rest)) = atoms.split_first() else {
            return;
        };
        let first_id = self.intern(first);
        for &atom in rest {
            let id = self.intern(atom);
            self.sets.union(first_id, id);
        }
    }

    /// Returns the equivalence classes with at least two members.
    ///
    /// Classes and their members are sorted, so the output is deterministic
    /// regardless of insertion order.
    pub fn groups(&mut self) -> Vec<Vec<AtomRef>> {
        let mut by_root: HashMap<usize, Vec<AtomRef>> = HashMap::new();
        for index in 0..self.atoms.len() {
            let root = self.sets.find(index);
            by_root.entry(root).or_default().push(self.atoms[index]);
        }
        let mut groups: Vec<Vec<AtomRef>> = by_root
            .into_values()
            .filter(|members| members.len() >= 2)
            .map(|mut members| {
                members.sort_unstable();
                members
            })
            .collect();
        groups.sort_unstable();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_reports_stay_separate() {
        let mut grouper = EquivalenceGrouper::new();
        grouper.add_equivalent(&[(0, 0), (1, 0)]);
        grouper.add_equivalent(&[(0, 3), (1, 3)]);
        let groups = grouper.groups();
        assert_eq!(
            groups,
            vec![vec![(0, 0), (1, 0)], vec![(0, 3), (1, 3)]]
        );
    }

    #[test]
    fn partial_overlaps_merge_transitively_across_many_reports() {
        // Three reports chained by single shared atoms; the truthiness-based
        // merge in older implementations dropped exactly this case.
        let mut grouper = EquivalenceGrouper::new();
        grouper.add_equivalent(&[(0, 0), (1, 1)]);
        grouper.add_equivalent(&[(1, 1), (2, 2)]);
        grouper.add_equivalent(&[(2, 2), (3, 3)]);
        let groups = grouper.groups();
        assert_eq!(groups, vec![vec![(0, 0), (1, 1), (2, 2), (3, 3)]]);
    }

    #[test]
    fn singleton_reports_produce_no_groups() {
        let mut grouper = EquivalenceGrouper::new();
        grouper.add_equivalent(&[(0, 5)]);
        grouper.add_equivalent(&[]);
        assert!(grouper.groups().is_empty());
    }

    #[test]
    fn duplicate_atoms_within_a_report_are_harmless() {
        let mut grouper = EquivalenceGrouper::new();
        grouper.add_equivalent(&[(0, 1), (0, 1), (1, 1)]);
        assert_eq!(grouper.groups(), vec![vec![(0, 1), (1, 1)]]);
    }

    #[test]
    fn output_is_deterministic_regardless_of_insertion_order() {
        let mut forward = EquivalenceGrouper::new();
        forward.add_equivalent(&[(0, 0), (1, 0)]);
        forward.add_equivalent(&[(0, 2), (1, 2)]);

        let mut reversed = EquivalenceGrouper::new();
        reversed.add_equivalent(&[(1, 2), (0, 2)]);
        reversed.add_equivalent(&[(1, 0), (0, 0)]);

        assert_eq!(forward.groups(), reversed.groups());
    }
}
