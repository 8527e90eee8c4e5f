use std::collections::HashSet;

use harvest_core::next_key;

fn pool(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[test]
fn advances_round_robin_from_current_index() {
    let keys = pool(&["a", "b", "c"]);
    let exhausted = HashSet::new();

    assert_eq!(next_key(&keys, &exhausted, 0), Some((1, "b")));
    assert_eq!(next_key(&keys, &exhausted, 1), Some((2, "c")));
    // Wraps back to the front of the pool.
    assert_eq!(next_key(&keys, &exhausted, 2), Some((0, "a")));
}

#[test]
fn skips_exhausted_indices() {
    let keys = pool(&["a", "b", "c"]);
    let exhausted: HashSet<usize> = [1].into_iter().collect();

    assert_eq!(next_key(&keys, &exhausted, 0), Some((2, "c")));
}

#[test]
fn wraps_past_exhausted_tail() {
    let keys = pool(&["a", "b", "c"]);
    let exhausted: HashSet<usize> = [1, 2].into_iter().collect();

    assert_eq!(next_key(&keys, &exhausted, 0), Some((0, "a")));
}

#[test]
fn none_when_every_index_is_exhausted() {
    let keys = pool(&["a", "b"]);
    let exhausted: HashSet<usize> = [0, 1].into_iter().collect();

    assert_eq!(next_key(&keys, &exhausted, 0), None);
    assert_eq!(next_key(&keys, &exhausted, 1), None);
}

#[test]
fn single_key_pool_keeps_returning_it_until_exhausted() {
    let keys = pool(&["only"]);

    assert_eq!(next_key(&keys, &HashSet::new(), 0), Some((0, "only")));

    let exhausted: HashSet<usize> = [0].into_iter().collect();
    assert_eq!(next_key(&keys, &exhausted, 0), None);
}

#[test]
fn empty_pool_yields_none() {
    assert_eq!(next_key(&[], &HashSet::new(), 0), None);
}
