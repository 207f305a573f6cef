//! Seeded stratified train/test split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// Split sample indices into `(train, test)` stratified on the encoded
/// labels: each class contributes `test_size` of its members to the test
/// set after a seeded shuffle. Classes with a single member stay in train.
pub fn stratified_split(y: &[u32], test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut by_class: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, &class) in y.iter().enumerate() {
        by_class.entry(class).or_default().push(i);
    }

    // Deterministic iteration order over classes.
    let mut classes: Vec<u32> = by_class.keys().copied().collect();
    classes.sort_unstable();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in classes {
        let mut members = by_class.remove(&class).unwrap();
        if members.len() < 2 {
            train.extend(members);
            continue;
        }
        members.shuffle(&mut rng);
        let n_test = ((members.len() as f64 * test_size).round() as usize)
            .min(members.len() - 1);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    (train, test)
}
