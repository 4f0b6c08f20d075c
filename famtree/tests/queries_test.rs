//! Tests for the read-only family tree queries

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rstest::{fixture, rstest};

use famtree::domain::sample::qempa_family;
use famtree::domain::{FamilyTree, FamilyTreeBuilder, PersonId, Violation};
use famtree::util::testing::init_test_setup;

#[fixture]
fn qempa() -> FamilyTree {
    init_test_setup();
    qempa_family().expect("sample family builds")
}

#[fixture]
fn adam() -> FamilyTree {
    init_test_setup();
    FamilyTreeBuilder::new().person(1, "Adam", 1).build().unwrap()
}

fn pids(tree: &FamilyTree, idxs: &[generational_arena::Index]) -> Vec<PersonId> {
    idxs.iter().map(|&i| tree.person(i).unwrap().pid).collect()
}

fn set(ids: &[PersonId]) -> BTreeSet<PersonId> {
    ids.iter().copied().collect()
}

fn alive(ids: &[PersonId]) -> HashSet<PersonId> {
    ids.iter().copied().collect()
}

// ============================================================
// Single person
// ============================================================

#[rstest]
fn given_single_person_when_querying_then_trivial_answers(adam: FamilyTree) {
    let root = adam.root();
    assert!(adam.is_valid(root));
    assert!(adam.valid_family_tree(root));
    assert_eq!(adam.parents_younger_than(root, 18), BTreeSet::new());
    assert_eq!(adam.parents_older_than(root, 81), BTreeSet::new());
    assert_eq!(adam.childless(root), set(&[1]));
    assert!(adam.ancestors(root).is_empty());
    assert_eq!(adam.order_of_succession(root, &alive(&[1])), BTreeMap::new());
}

// ============================================================
// Validity
// ============================================================

#[rstest]
fn given_sample_family_when_validating_then_valid_everywhere(qempa: FamilyTree) {
    for (idx, _) in qempa.iter() {
        assert!(qempa.is_valid(idx));
        assert!(qempa.valid_family_tree(idx));
    }
}

#[rstest]
fn given_empty_name_when_validating_then_whole_tree_invalid(mut qempa: FamilyTree) {
    let thok_mak = qempa.find(127).unwrap();
    let alex = qempa.find(1000).unwrap();
    qempa.person_mut(thok_mak).unwrap().name = String::new();

    assert!(!qempa.is_valid(qempa.root()));
    assert_eq!(qempa.validate(qempa.root()), Err(Violation::EmptyName(127)));
    assert!(qempa.is_valid(alex));
    assert!(!qempa.valid_family_tree(qempa.root()));
    assert!(!qempa.valid_family_tree(alex));

    qempa.person_mut(thok_mak).unwrap().name = "Thok Mak".to_string();
    assert!(qempa.valid_family_tree(alex));
}

#[rstest]
fn given_child_born_same_year_as_parent_when_validating_then_invalid(mut qempa: FamilyTree) {
    let thok_mak = qempa.find(127).unwrap();
    let alex = qempa.find(1000).unwrap();
    qempa.person_mut(thok_mak).unwrap().birth_year = 2302;

    assert_eq!(
        qempa.validate(qempa.root()),
        Err(Violation::BirthYearNotAfterParent {
            pid: 561,
            birth_year: 2302,
            parent_birth_year: 2302,
        })
    );
    assert!(qempa.is_valid(alex));
    assert!(!qempa.valid_family_tree(alex));
}

#[rstest]
fn given_duplicate_sibling_names_when_validating_then_invalid(mut qempa: FamilyTree) {
    let elumen = qempa.find(106).unwrap();
    let worf = qempa.find(390).unwrap();
    qempa.person_mut(elumen).unwrap().name = "Grehka".to_string();

    assert_eq!(
        qempa.validate(qempa.root()),
        Err(Violation::DuplicateSiblingName {
            parent: 590,
            name: "Grehka".to_string(),
        })
    );
    assert!(qempa.is_valid(worf));
}

#[rstest]
fn given_root_born_in_year_zero_when_validating_then_invalid(mut qempa: FamilyTree) {
    let root = qempa.root();
    qempa.person_mut(root).unwrap().birth_year = 0;
    assert!(!qempa.is_valid(root));
}

#[rstest]
fn given_removed_person_when_validating_then_unknown(mut qempa: FamilyTree) {
    let ag_ax = qempa.find(611).unwrap();
    qempa.remove_extinct_branches(qempa.root(), &alive(&[]));
    assert_eq!(qempa.validate(ag_ax), Err(Violation::UnknownPerson));
}

// ============================================================
// Ancestors and childless
// ============================================================

#[rstest]
fn given_sample_family_when_listing_ancestors_then_root_first(qempa: FamilyTree) {
    let alex = qempa.find(1000).unwrap();
    let thok_mak = qempa.find(127).unwrap();

    assert_eq!(pids(&qempa, &qempa.ancestors(alex)), vec![17, 290, 490, 390]);
    assert_eq!(pids(&qempa, &qempa.ancestors(thok_mak)), vec![17]);
    assert!(qempa.ancestors(qempa.root()).is_empty());
}

#[rstest]
fn given_any_person_when_listing_ancestors_then_length_is_depth(qempa: FamilyTree) {
    for (idx, _) in qempa.iter() {
        let mut depth = 0;
        let mut current = idx;
        while let Some(parent) = qempa.parent(current) {
            depth += 1;
            current = parent;
        }
        assert_eq!(qempa.ancestors(idx).len(), depth);
    }
}

#[rstest]
fn given_sample_family_when_listing_childless_then_leaves(qempa: FamilyTree) {
    assert_eq!(
        qempa.childless(qempa.root()),
        set(&[101, 106, 253, 429, 561, 611, 702, 898])
    );
    let thok_mak = qempa.find(127).unwrap();
    assert_eq!(qempa.childless(thok_mak), set(&[611, 561, 702]));
}

// ============================================================
// Age gaps
// ============================================================

#[rstest]
#[case(12, &[])]
#[case(15, &[590])]
#[case(21, &[290, 590])]
fn given_limit_when_filtering_younger_parents_then_strictly_below(
    qempa: FamilyTree,
    #[case] limit: i32,
    #[case] expected: &[PersonId],
) {
    assert_eq!(qempa.parents_younger_than(qempa.root(), limit), set(expected));
}

#[rstest]
#[case(48, &[])]
#[case(47, &[390])]
#[case(40, &[390])]
fn given_limit_when_filtering_older_parents_then_strictly_above(
    qempa: FamilyTree,
    #[case] limit: i32,
    #[case] expected: &[PersonId],
) {
    assert_eq!(qempa.parents_older_than(qempa.root(), limit), set(expected));
}

#[rstest]
fn given_gap_equal_to_limit_when_filtering_then_neither_younger_nor_older(qempa: FamilyTree) {
    // K'alaga was born 21 years after Thok Mak
    let thok_mak = qempa.find(127).unwrap();
    assert!(!qempa.parents_younger_than(thok_mak, 21).contains(&127));
    assert!(!qempa.parents_older_than(thok_mak, 36).contains(&127));
    assert!(qempa.parents_older_than(thok_mak, 35).contains(&127));
}

#[rstest]
fn given_subtree_when_filtering_then_only_subtree_parents(qempa: FamilyTree) {
    let thok_mak = qempa.find(127).unwrap();
    assert_eq!(qempa.parents_younger_than(thok_mak, 21), BTreeSet::new());
    assert_eq!(qempa.parents_older_than(thok_mak, 40), BTreeSet::new());
}

// ============================================================
// Succession
// ============================================================

fn full_succession() -> BTreeMap<PersonId, usize> {
    [
        (127, 1),
        (561, 2),
        (611, 3),
        (702, 4),
        (290, 5),
        (490, 6),
        (390, 7),
        (1000, 8),
        (253, 9),
        (898, 10),
        (590, 11),
        (106, 12),
        (429, 13),
        (101, 14),
    ]
    .into_iter()
    .collect()
}

#[rstest]
fn given_everyone_alive_when_ordering_succession_then_eldest_line_first(qempa: FamilyTree) {
    let everyone: HashSet<PersonId> = qempa.iter().map(|(_, n)| n.data.pid).collect();
    assert_eq!(qempa.order_of_succession(qempa.root(), &everyone), full_succession());
}

#[rstest]
fn given_root_dead_when_ordering_succession_then_unchanged(qempa: FamilyTree) {
    let mut living: HashSet<PersonId> = qempa.iter().map(|(_, n)| n.data.pid).collect();
    living.remove(&17);
    assert_eq!(qempa.order_of_succession(qempa.root(), &living), full_succession());
}

#[rstest]
fn given_some_dead_when_ordering_succession_then_ranks_close_up(qempa: FamilyTree) {
    let living = alive(&[101, 106, 253, 390, 429, 561, 611, 702, 898, 1000]);

    let expected: BTreeMap<PersonId, usize> = [
        (561, 1),
        (611, 2),
        (702, 3),
        (390, 4),
        (1000, 5),
        (253, 6),
        (898, 7),
        (106, 8),
        (429, 9),
        (101, 10),
    ]
    .into_iter()
    .collect();
    assert_eq!(qempa.order_of_succession(qempa.root(), &living), expected);

    let mogh = qempa.find(490).unwrap();
    let expected: BTreeMap<PersonId, usize> = [
        (390, 1),
        (1000, 2),
        (253, 3),
        (898, 4),
        (106, 5),
        (429, 6),
        (101, 7),
    ]
    .into_iter()
    .collect();
    assert_eq!(qempa.order_of_succession(mogh, &living), expected);
}

#[rstest]
fn given_one_heir_dies_when_ordering_succession_then_others_keep_relative_order(qempa: FamilyTree) {
    let mut living: HashSet<PersonId> = qempa.iter().map(|(_, n)| n.data.pid).collect();
    let before = qempa.order_of_succession(qempa.root(), &living);
    living.remove(&1000);
    let after = qempa.order_of_succession(qempa.root(), &living);

    assert_eq!(after.len(), before.len() - 1);
    assert!(!after.contains_key(&1000));
    let mut ranks: Vec<usize> = after.values().copied().collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=after.len()).collect::<Vec<_>>());

    let order = |m: &BTreeMap<PersonId, usize>| {
        let mut v: Vec<(usize, PersonId)> = m.iter().map(|(&p, &r)| (r, p)).collect();
        v.sort_unstable();
        v.into_iter().map(|(_, p)| p).filter(|&p| p != 1000).collect::<Vec<_>>()
    };
    assert_eq!(order(&before), order(&after));
}

#[test]
fn given_three_generations_when_ordering_succession_then_child_before_grandchild() {
    init_test_setup();
    let tree = FamilyTreeBuilder::new()
        .person(1, "A", 1)
        .person(2, "B", 2)
        .person(3, "C", 3)
        .children(1, [2])
        .children(2, [3])
        .build()
        .unwrap();

    let expected: BTreeMap<PersonId, usize> = [(2, 1), (3, 2)].into_iter().collect();
    assert_eq!(tree.order_of_succession(tree.root(), &alive(&[1, 2, 3])), expected);
}

#[test]
fn given_younger_sibling_with_elder_grandchild_when_ordering_then_sorted_per_level() {
    init_test_setup();
    // Sorting the whole line by birth year would put 4 before 3.
    let tree = FamilyTreeBuilder::new()
        .person(1, "Root", 1900)
        .person(2, "Elder", 1920)
        .person(3, "Younger", 1950)
        .person(4, "Grandchild", 1940)
        .children(1, [3, 2])
        .children(2, [4])
        .build()
        .unwrap();

    let expected: BTreeMap<PersonId, usize> = [(2, 1), (4, 2), (3, 3)].into_iter().collect();
    assert_eq!(tree.order_of_succession(tree.root(), &alive(&[2, 3, 4])), expected);
}

#[test]
fn given_extreme_birth_years_when_filtering_gaps_then_no_overflow() {
    init_test_setup();
    let tree = FamilyTreeBuilder::new()
        .person(1, "Ancient", -2_000_000_000)
        .person(2, "Distant", 2_000_000_000)
        .person(3, "Reversed", i32::MIN)
        .children(1, [2])
        .children(2, [3])
        .build()
        .unwrap();
    let root = tree.root();

    assert_eq!(tree.parents_older_than(root, 10), set(&[1]));
    assert_eq!(tree.parents_older_than(root, i32::MAX), set(&[1]));
    assert_eq!(tree.parents_younger_than(root, 10), set(&[2]));
    assert_eq!(tree.parents_younger_than(root, i32::MIN), set(&[2]));
}
