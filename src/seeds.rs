//! Built-in item pool so the service is usable without a pool file.

use crate::domain::Item;

pub const SEED_POOL_NAME: &str = "built-in kanji";

/// A handful of N5 kanji with kun readings and English meanings.
pub fn seed_items() -> Vec<Item> {
  vec![
    Item::new("火", vec!["ひ", "ほ"], vec!["fire"]),
    Item::new("水", vec!["みず"], vec!["water"]),
    Item::new("木", vec!["き", "こ"], vec!["tree", "wood"]),
    Item::new("金", vec!["かね", "かな"], vec!["gold", "money", "metal"]),
    Item::new("土", vec!["つち"], vec!["earth", "soil"]),
    Item::new("日", vec!["ひ", "か"], vec!["sun", "day"]),
    Item::new("月", vec!["つき"], vec!["moon", "month"]),
    Item::new("山", vec!["やま"], vec!["mountain"]),
    Item::new("川", vec!["かわ"], vec!["river"]),
    Item::new("人", vec!["ひと"], vec!["person"]),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Pool;

  #[test]
  fn seed_pool_is_valid() {
    let pool = Pool::new(seed_items()).unwrap();
    assert!(pool.len() >= 3);
  }
}
