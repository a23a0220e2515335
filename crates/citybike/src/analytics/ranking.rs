//! Top-N ranking: aggregate descending, ties by ascending key.

/// Sort groups by `score` descending, breaking ties by ascending key.
pub fn rank<K: Ord, V>(mut groups: Vec<(K, V)>, score: impl Fn(&V) -> f64) -> Vec<(K, V)> {
    groups.sort_by(|(ka, va), (kb, vb)| {
        score(vb)
            .total_cmp(&score(va))
            .then_with(|| ka.cmp(kb))
    });
    groups
}

/// The `n` highest-ranked groups.
pub fn top_n<K: Ord, V>(
    groups: Vec<(K, V)>,
    n: usize,
    score: impl Fn(&V) -> f64,
) -> Vec<(K, V)> {
    let mut ranked = rank(groups, score);
    ranked.truncate(n);
    ranked
}

/// The single highest-ranked group.
pub fn top_one<K: Ord + Clone, V: Clone>(
    groups: &[(K, V)],
    score: impl Fn(&V) -> f64,
) -> Option<(K, V)> {
    groups
        .iter()
        .max_by(|(ka, va), (kb, vb)| {
            score(va)
                .total_cmp(&score(vb))
                .then_with(|| kb.cmp(ka))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ties_by_key() {
        let groups = vec![("S3", 2usize), ("S1", 5), ("S2", 5), ("S0", 1)];
        let ranked = rank(groups, |v| *v as f64);
        let keys: Vec<&str> = ranked.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["S1", "S2", "S3", "S0"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let groups = vec![("a", 1usize), ("b", 3), ("c", 2)];
        let top = top_n(groups, 2, |v| *v as f64);
        assert_eq!(top, vec![("b", 3), ("c", 2)]);
        assert!(top_n(Vec::<(&str, usize)>::new(), 3, |v| *v as f64).is_empty());
    }

    #[test]
    fn test_top_one_prefers_smaller_key() {
        let groups = vec![("2024-02", 4usize), ("2024-01", 4), ("2024-03", 1)];
        assert_eq!(top_one(&groups, |v| *v as f64), Some(("2024-01", 4)));
    }
}
