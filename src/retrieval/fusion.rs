//! Multi-query id fusion

use crate::embedding::SENTINEL_ID;
use ahash::AHashSet;

/// Merge per-query hit lists into one deterministic id set
///
/// Ids are deduplicated across queries (a chunk matching two query sources
/// counts once), sentinel entries dropped, and the survivors ordered by
/// ascending id before truncation to `combined_k`.
///
/// Ascending id is a reproducibility tie-break, not a relevance ranking:
/// scores produced by different query embeddings are not comparable, so no
/// cross-query score merge is attempted.
pub fn fuse_ids<I>(id_lists: I, combined_k: usize) -> Vec<i64>
where
    I: IntoIterator<Item = Vec<i64>>,
{
    let mut unique: AHashSet<i64> = AHashSet::new();
    for ids in id_lists {
        for id in ids {
            if id != SENTINEL_ID {
                unique.insert(id);
            }
        }
    }

    let mut fused: Vec<i64> = unique.into_iter().collect();
    fused.sort_unstable();
    fused.truncate(combined_k);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_dedup() {
        let fused = fuse_ids(vec![vec![3, 1, 4], vec![4, 2, 3]], 10);
        assert_eq!(fused, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sentinels_dropped() {
        let fused = fuse_ids(vec![vec![2, SENTINEL_ID, SENTINEL_ID], vec![SENTINEL_ID]], 10);
        assert_eq!(fused, vec![2]);
    }

    #[test]
    fn test_truncation_keeps_lowest_ids() {
        let fused = fuse_ids(vec![vec![9, 5, 7], vec![1, 3, 8]], 3);
        assert_eq!(fused, vec![1, 3, 5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(fuse_ids(Vec::<Vec<i64>>::new(), 5).is_empty());
        assert!(fuse_ids(vec![vec![], vec![]], 5).is_empty());
    }
}
