//! Tally post-processing: series shaping, top-N ranking, distributions

use serde::Serialize;

use super::engine::Tally;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LabelValue {
    pub label: String,
    pub value: u64,
}

/// Day-bucketed tally as an ascending time series. The tally is a
/// BTreeMap, so iteration order is already chronological for
/// `YYYY-MM-DD` keys.
pub fn day_series(tally: &Tally) -> Vec<DayCount> {
    tally
        .iter()
        .map(|(date, count)| DayCount {
            date: date.clone(),
            count: *count,
        })
        .collect()
}

/// All categories sorted by count descending with an ascending-key
/// tie-break, so equal counts always emit in the same order.
pub fn ranked(tally: &Tally) -> Vec<CategoryCount> {
    let mut entries: Vec<CategoryCount> = tally
        .iter()
        .map(|(name, count)| CategoryCount {
            name: name.clone(),
            count: *count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries
}

/// Top `n` of `ranked`.
pub fn top_n(tally: &Tally, n: usize) -> Vec<CategoryCount> {
    let mut entries = ranked(tally);
    entries.truncate(n);
    entries
}

/// Full category set in key order, for consumers that chart every bucket.
pub fn full_set(tally: &Tally) -> Vec<CategoryCount> {
    tally
        .iter()
        .map(|(name, count)| CategoryCount {
            name: name.clone(),
            count: *count,
        })
        .collect()
}

/// Fixed-key distribution: every enumerated key is always present, zero
/// when never observed. Charting layers rely on the complete shape.
pub fn distribution(tally: &Tally, keys: &[&str]) -> Vec<LabelValue> {
    keys.iter()
        .map(|key| LabelValue {
            label: (*key).to_string(),
            value: tally.get(*key).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(pairs: &[(&str, u64)]) -> Tally {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn top_n_breaks_ties_alphabetically() {
        let t = tally(&[("B", 5), ("A", 5), ("C", 3)]);
        let top = top_n(&t, 2);
        assert_eq!(
            top,
            vec![
                CategoryCount { name: "A".into(), count: 5 },
                CategoryCount { name: "B".into(), count: 5 },
            ]
        );
    }

    #[test]
    fn distribution_emits_every_key_even_when_empty() {
        let dist = distribution(&Tally::new(), &["positive", "neutral", "negative"]);
        assert_eq!(dist.len(), 3);
        assert!(dist.iter().all(|d| d.value == 0));

        let t = tally(&[("negative", 2)]);
        let dist = distribution(&t, &["positive", "neutral", "negative"]);
        assert_eq!(dist[0].value, 0);
        assert_eq!(dist[2].value, 2);
    }

    #[test]
    fn day_series_is_chronological() {
        let t = tally(&[("2025-06-03", 1), ("2025-06-01", 2), ("2025-06-02", 3)]);
        let series = day_series(&t);
        let days: Vec<_> = series.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(days, vec!["2025-06-01", "2025-06-02", "2025-06-03"]);
    }
}
