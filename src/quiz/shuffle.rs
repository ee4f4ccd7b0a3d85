use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Returns a uniformly shuffled copy of `items`. A fresh RNG is seeded for every call.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut StdRng::from_entropy())
}

/// Fisher–Yates over a copy of `items`, walking from the last index down to 1.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Shuffles and keeps the first `limit` items. A limit of 0 or past the end keeps everything.
pub fn shuffle_with_limit<T: Clone>(items: &[T], limit: usize) -> Vec<T> {
    let mut shuffled = shuffle(items);
    if limit > 0 && limit < shuffled.len() {
        shuffled.truncate(limit);
    }
    shuffled
}
