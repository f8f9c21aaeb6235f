//! Random selection primitives used to build rounds.
//!
//! All functions take the RNG explicitly so callers (and tests) control seeding.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::Item;
use crate::error::DrillError;

/// Uniform choice over `pool`.
pub fn pick_one<'a, R: Rng + ?Sized>(pool: &'a [Item], rng: &mut R) -> Result<&'a Item, DrillError> {
  pool.choose(rng).ok_or(DrillError::EmptyPool)
}

/// Uniform choice among items whose id differs from `exclude_id`.
///
/// The eligible subset is computed up front and sampled once. If nothing is
/// eligible (single-item pool) the excluded item itself comes back.
pub fn pick_one_excluding<'a, R: Rng + ?Sized>(
  pool: &'a [Item],
  exclude_id: Option<&str>,
  rng: &mut R,
) -> Result<&'a Item, DrillError> {
  let Some(exclude) = exclude_id else { return pick_one(pool, rng) };
  let eligible: Vec<&Item> = pool.iter().filter(|it| it.id != exclude).collect();
  match eligible.choose(rng) {
    Some(it) => Ok(*it),
    None => pick_one(pool, rng),
  }
}

/// Up to `k` distinct elements in random order; all of them when `items.len() < k`.
pub fn sample_without_replacement<T: Clone, R: Rng + ?Sized>(items: &[T], k: usize, rng: &mut R) -> Vec<T> {
  let mut picked: Vec<T> = items.choose_multiple(rng, k).cloned().collect();
  // choose_multiple does not randomize order
  picked.shuffle(rng);
  picked
}

/// Bernoulli draw with probability `numerator / denominator`.
pub fn coin_flip<R: Rng + ?Sized>(numerator: u32, denominator: u32, rng: &mut R) -> bool {
  if denominator == 0 || numerator == 0 {
    return false;
  }
  if numerator >= denominator {
    return true;
  }
  rng.gen_ratio(numerator, denominator)
}

/// Uniform in-place permutation (Fisher-Yates via `SliceRandom::shuffle`).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
  items.shuffle(rng);
}

#[cfg(test)]
mod tests {
  use std::collections::{HashMap, HashSet};

  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;

  fn pool(ids: &[&str]) -> Vec<Item> {
    ids.iter().map(|id| Item::new(*id, vec![], vec![*id])).collect()
  }

  #[test]
  fn pick_one_fails_on_empty() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(pick_one(&[], &mut rng).unwrap_err(), DrillError::EmptyPool);
  }

  #[test]
  fn pick_one_excluding_never_returns_excluded() {
    let items = pool(&["a", "b", "c", "d"]);
    for seed in 0..200 {
      let mut rng = StdRng::seed_from_u64(seed);
      let it = pick_one_excluding(&items, Some("b"), &mut rng).unwrap();
      assert_ne!(it.id, "b");
    }
  }

  #[test]
  fn pick_one_excluding_two_items_alternates() {
    let items = pool(&["a", "b"]);
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..50 {
      assert_eq!(pick_one_excluding(&items, Some("a"), &mut rng).unwrap().id, "b");
    }
  }

  #[test]
  fn pick_one_excluding_single_item_returns_it() {
    let items = pool(&["solo"]);
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(pick_one_excluding(&items, Some("solo"), &mut rng).unwrap().id, "solo");
  }

  #[test]
  fn pick_one_excluding_covers_all_eligible() {
    let items = pool(&["a", "b", "c", "d"]);
    let mut rng = StdRng::seed_from_u64(42);
    let seen: HashSet<String> = (0..300)
      .map(|_| pick_one_excluding(&items, Some("a"), &mut rng).unwrap().id.clone())
      .collect();
    assert_eq!(seen.len(), 3);
  }

  #[test]
  fn sample_returns_all_when_short() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut got = sample_without_replacement(&["x", "y"], 5, &mut rng);
    got.sort();
    assert_eq!(got, vec!["x", "y"]);
  }

  #[test]
  fn sample_is_distinct_and_bounded() {
    let items: Vec<u32> = (0..10).collect();
    for seed in 0..100 {
      let mut rng = StdRng::seed_from_u64(seed);
      let got = sample_without_replacement(&items, 2, &mut rng);
      assert_eq!(got.len(), 2);
      assert_ne!(got[0], got[1]);
    }
  }

  #[test]
  fn sample_order_is_random() {
    let mut rng = StdRng::seed_from_u64(21);
    let orders: HashSet<Vec<u8>> = (0..200)
      .map(|_| sample_without_replacement(&[1u8, 2, 3], 3, &mut rng))
      .collect();
    assert_eq!(orders.len(), 6);
  }

  #[test]
  fn coin_flip_edges() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..100 {
      assert!(!coin_flip(0, 6, &mut rng));
      assert!(coin_flip(6, 6, &mut rng));
      assert!(!coin_flip(1, 0, &mut rng));
    }
  }

  #[test]
  fn coin_flip_one_in_six_is_roughly_fair() {
    let mut rng = StdRng::seed_from_u64(2024);
    let hits = (0..60_000).filter(|_| coin_flip(1, 6, &mut rng)).count();
    // expected 10_000
    assert!((9_400..10_600).contains(&hits), "hits = {hits}");
  }

  #[test]
  fn shuffle_is_a_permutation() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut v: Vec<u32> = (0..20).collect();
    shuffle(&mut v, &mut rng);
    let mut sorted = v.clone();
    sorted.sort();
    assert_eq!(sorted, (0..20).collect::<Vec<_>>());
  }

  #[test]
  fn shuffle_reaches_every_ordering_of_three() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
    for _ in 0..6_000 {
      let mut v = vec![1u8, 2, 3];
      shuffle(&mut v, &mut rng);
      *counts.entry(v).or_default() += 1;
    }
    assert_eq!(counts.len(), 6);
    for (order, n) in counts {
      assert!((800..1_200).contains(&n), "{order:?} drawn {n} times");
    }
  }
}
