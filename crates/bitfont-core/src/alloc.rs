//! Hash collections used across bitfont.
//!
//! Glyph tables are keyed by `char` and looked up on every layout pass,
//! so the crates share the AHash-backed maps re-exported here.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_keyed_map() {
        let mut map = HashMap::new();
        map.insert('A', 65u32);
        assert_eq!(map.get(&'A'), Some(&65));
        assert_eq!(map.get(&'B'), None);
    }

    #[test]
    fn test_char_set_dedup() {
        let set: HashSet<char> = "aab a".chars().collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&' '));
    }
}
