//! Orbit classification of word sets
//!
//! [`classify`] partitions a finite word set into orbits of the dihedral
//! group (optionally extended by the color swap) and keeps one canonical
//! representative per orbit.
//!
//! [`combine_with_swap`] derives the `D_n x <swap>` grouping from an existing
//! dihedral classification. Classes are linked through a union-find over
//! class indices, so the grouping does not depend on the order in which the
//! classes were produced.

use crate::symmetry::{canonical, orbit, swap_colors};
use crate::word::Word;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One orbit: its smallest member and the number of input words in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitClass {
    pub size: usize,
    #[serde(rename = "rep")]
    pub representative: Word,
}

/// Dihedral classes merged under the color swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapGroup {
    /// Representatives of the merged classes, sorted
    pub reps: Vec<Word>,
    /// Sum of the merged class sizes
    pub total_size: usize,
}

/// Partition `words` into orbits
///
/// The smallest unassigned word seeds each orbit; the orbit is intersected
/// with `words`, its minimum becomes the representative, and its members
/// leave the pool. Classes come out in increasing representative order.
pub fn classify(words: &BTreeSet<Word>, include_swap: bool) -> Vec<OrbitClass> {
    let mut pool = words.clone();
    let mut classes = Vec::new();

    while let Some(seed) = pool.pop_first() {
        let members: BTreeSet<Word> = orbit(&seed, include_swap)
            .into_iter()
            .filter(|w| words.contains(w))
            .collect();
        for member in &members {
            pool.remove(member);
        }
        let size = members.len();
        let representative = members.into_iter().next().unwrap_or(seed);
        classes.push(OrbitClass {
            size,
            representative,
        });
    }

    classes
}

/// Merge dihedral classes whose representatives are swaps of each other
///
/// A class pairs with the class whose representative equals the dihedral
/// canonical form of its own swapped representative. Classes without a
/// partner (or that are their own partner) form singleton groups. Groups are
/// listed in order of their first class.
pub fn combine_with_swap(classes: &[OrbitClass]) -> Vec<SwapGroup> {
    let index: HashMap<&Word, usize> = classes
        .iter()
        .enumerate()
        .map(|(i, class)| (&class.representative, i))
        .collect();

    let mut groups = SwapPartition::singletons(classes.len());
    for (i, class) in classes.iter().enumerate() {
        let partner = canonical(&swap_colors(&class.representative), false);
        if let Some(&j) = index.get(&partner) {
            groups.join(i, j);
        }
    }

    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for i in 0..classes.len() {
        let root = groups.leader_of(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            members.push(Vec::new());
            members.len() - 1
        });
        members[slot].push(i);
    }

    members
        .into_iter()
        .map(|group| {
            let mut reps: Vec<Word> = group
                .iter()
                .map(|&i| classes[i].representative.clone())
                .collect();
            reps.sort();
            SwapGroup {
                reps,
                total_size: group.iter().map(|&i| classes[i].size).sum(),
            }
        })
        .collect()
}

/// Classification report of an arbitrary word list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSetReport {
    pub num_words: usize,
    pub num_orbits: usize,
    pub orbit_sizes: Vec<usize>,
    pub reps: Vec<Word>,
    pub with_swap: bool,
}

impl WordSetReport {
    pub fn new(words: &BTreeSet<Word>, with_swap: bool) -> Self {
        let classes = classify(words, with_swap);
        Self {
            num_words: words.len(),
            num_orbits: classes.len(),
            orbit_sizes: classes.iter().map(|c| c.size).collect(),
            reps: classes.into_iter().map(|c| c.representative).collect(),
            with_swap,
        }
    }
}

/// Partition of orbit classes into swap groups
///
/// Entries are indices into the class list. Joining two groups always keeps
/// the lower index as leader, so a group's leader is its first class.
struct SwapPartition {
    leader: Vec<usize>,
}

impl SwapPartition {
    fn singletons(classes: usize) -> Self {
        Self {
            leader: (0..classes).collect(),
        }
    }

    fn leader_of(&mut self, class: usize) -> usize {
        let parent = self.leader[class];
        if parent == class {
            return class;
        }
        let root = self.leader_of(parent);
        self.leader[class] = root;
        root
    }

    fn join(&mut self, class: usize, partner: usize) {
        let a = self.leader_of(class);
        let b = self.leader_of(partner);
        let (keep, absorb) = if a <= b { (a, b) } else { (b, a) };
        self.leader[absorb] = keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::enumerate_valid;

    fn set(words: &[&str]) -> BTreeSet<Word> {
        words.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_swap_partition_leader_is_first_class() {
        let mut groups = SwapPartition::singletons(5);
        groups.join(4, 3);
        groups.join(3, 1);
        groups.join(2, 2);
        assert_eq!(groups.leader_of(4), 1);
        assert_eq!(groups.leader_of(3), 1);
        assert_eq!(groups.leader_of(2), 2);
        assert_eq!(groups.leader_of(0), 0);
    }

    #[test]
    fn test_classify_two_letter_words() {
        let classes = classify(&set(&["BB", "BR", "RB", "RR"]), false);
        let reps: Vec<String> = classes.iter().map(|c| c.representative.to_string()).collect();
        assert_eq!(reps, ["BB", "BR", "RR"]);
        assert_eq!(classes.iter().map(|c| c.size).collect::<Vec<_>>(), [1, 2, 1]);

        let with_swap = classify(&set(&["BB", "BR", "RB", "RR"]), true);
        assert_eq!(with_swap.len(), 2);
        assert_eq!(with_swap[0].size, 2);
    }

    #[test]
    fn test_classify_partial_orbit_counts_only_inputs() {
        // RB is missing from the input, so the BR orbit has one member.
        let classes = classify(&set(&["BR", "BB"]), false);
        assert_eq!(classes.len(), 2);
        assert!(classes.iter().all(|c| c.size == 1));
    }

    #[test]
    fn test_classify_empty_set() {
        assert!(classify(&BTreeSet::new(), true).is_empty());
    }

    #[test]
    fn test_sizes_sum_to_input_for_valid_words() {
        for n in 4..=11 {
            let words: BTreeSet<Word> = enumerate_valid(n).unwrap().into_iter().collect();
            for include_swap in [false, true] {
                let classes = classify(&words, include_swap);
                let total: usize = classes.iter().map(|c| c.size).sum();
                assert_eq!(total, words.len(), "n = {n}");
            }
        }
    }

    #[test]
    fn test_combine_pairs_swapped_classes() {
        let words = set(&["BBR", "BRB", "RBB", "BRR", "RBR", "RRB"]);
        let classes = classify(&words, false);
        assert_eq!(classes.len(), 2);

        let groups = combine_with_swap(&classes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_size, 6);
        let reps: Vec<String> = groups[0].reps.iter().map(Word::to_string).collect();
        assert_eq!(reps, ["BBR", "BRR"]);
    }

    #[test]
    fn test_combine_keeps_self_paired_and_unmatched_classes() {
        // BR is its own swap partner; BBR's partner BRR is absent.
        let classes = classify(&set(&["BR", "RB"]), false);
        let groups = combine_with_swap(&classes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_size, 2);

        let classes = classify(&set(&["BBR", "BRB", "RBB"]), false);
        let groups = combine_with_swap(&classes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].reps.len(), 1);
    }

    #[test]
    fn test_combine_is_order_independent() {
        let words: BTreeSet<Word> = enumerate_valid(10).unwrap().into_iter().collect();
        let classes = classify(&words, false);
        let mut reversed = classes.clone();
        reversed.reverse();

        let mut forward: Vec<SwapGroup> = combine_with_swap(&classes);
        let mut backward: Vec<SwapGroup> = combine_with_swap(&reversed);
        forward.sort_by(|a, b| a.reps.cmp(&b.reps));
        backward.sort_by(|a, b| a.reps.cmp(&b.reps));
        assert_eq!(forward, backward);

        let total: usize = forward.iter().map(|g| g.total_size).sum();
        assert_eq!(total, words.len());
    }

    #[test]
    fn test_word_set_report() {
        let report = WordSetReport::new(&set(&["BB", "BR", "RB", "RR"]), true);
        assert_eq!(report.num_words, 4);
        assert_eq!(report.num_orbits, 2);
        assert_eq!(report.orbit_sizes, [2, 2]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reps"][0], "BB");
        assert_eq!(json["with_swap"], true);
    }

    #[test]
    fn test_orbit_class_json_shape() {
        let class = OrbitClass {
            size: 3,
            representative: "BBR".parse().unwrap(),
        };
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["size"], 3);
        assert_eq!(json["rep"], "BBR");
    }
}
