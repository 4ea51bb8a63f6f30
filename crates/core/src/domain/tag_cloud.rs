use std::collections::BTreeMap;

use serde::Serialize;

pub const DEFAULT_TOP_TAGS: usize = 75;
pub const DEFAULT_BUCKETS: usize = 5;

/// Tag name to occurrence count, as returned by the tags endpoint.
pub type TagFrequency = BTreeMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCloudEntry {
    pub key: String,
    pub count: u64,
    pub weight: usize,
}

/// Picks the `top_n` most frequent tags and spreads them over `bucket_count`
/// weights so each bucket holds roughly the same total count.
///
/// Tags are walked from most to least frequent; a tag whose count would push
/// the current bucket over the mean opens the next bucket. The last bucket
/// takes everything that remains. Output is ordered by tag name.
pub fn bucketize<I>(frequencies: I, top_n: usize, bucket_count: usize) -> Vec<TagCloudEntry>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut tags: Vec<(String, u64)> = frequencies.into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1));
    tags.truncate(top_n);

    if tags.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let sum: u64 = tags.iter().map(|(_, count)| count).sum();
    let fair_share = sum as f64 / tags.len() as f64;

    let mut entries = Vec::with_capacity(tags.len());
    let mut current = 0usize;
    let mut bucket_sum = 0u64;
    for (key, count) in tags {
        if (bucket_sum + count) as f64 > fair_share && current + 1 < bucket_count {
            current += 1;
            bucket_sum = 0;
        }
        bucket_sum += count;
        entries.push(TagCloudEntry {
            key,
            count,
            weight: current,
        });
    }

    entries.sort_by(|a, b| a.key.cmp(&b.key));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_cloud() {
        assert!(bucketize(TagFrequency::new(), DEFAULT_TOP_TAGS, DEFAULT_BUCKETS).is_empty());
    }

    #[test]
    fn equal_counts_get_one_bucket_each() {
        let input = freq(&[("a", 10), ("b", 10), ("c", 10), ("d", 10), ("e", 10)]);
        let cloud = bucketize(input, DEFAULT_TOP_TAGS, DEFAULT_BUCKETS);
        let keys: Vec<_> = cloud.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
        assert!(cloud.iter().all(|entry| entry.count == 10));
        let weights: Vec<_> = cloud.iter().map(|entry| entry.weight).collect();
        assert_eq!(weights, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn overflow_stays_in_last_bucket() {
        let input = freq(&[
            ("a", 1),
            ("b", 1),
            ("c", 1),
            ("d", 1),
            ("e", 1),
            ("f", 1),
            ("g", 1),
        ]);
        let cloud = bucketize(input, DEFAULT_TOP_TAGS, DEFAULT_BUCKETS);
        let weights: Vec<_> = cloud.iter().map(|entry| entry.weight).collect();
        assert_eq!(weights, vec![0, 1, 2, 3, 4, 4, 4]);
    }

    #[test]
    fn heavy_tag_takes_first_bucket_alone() {
        let input = freq(&[("bug", 90), ("docs", 5), ("ui", 3), ("build", 2)]);
        let cloud = bucketize(input, DEFAULT_TOP_TAGS, DEFAULT_BUCKETS);
        let weight_of = |key: &str| cloud.iter().find(|e| e.key == key).unwrap().weight;
        // mean is 25: "bug" overflows the empty first bucket and opens bucket 1,
        // the small tags fit under the mean together.
        assert_eq!(weight_of("bug"), 1);
        assert_eq!(weight_of("docs"), 2);
        assert_eq!(weight_of("ui"), 2);
        assert_eq!(weight_of("build"), 2);
    }

    #[test]
    fn keeps_only_top_n() {
        let input = freq(&[("a", 5), ("b", 4), ("c", 3), ("d", 2)]);
        let cloud = bucketize(input, 2, DEFAULT_BUCKETS);
        let keys: Vec<_> = cloud.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn zero_buckets_yields_empty_cloud() {
        assert!(bucketize(freq(&[("a", 1)]), DEFAULT_TOP_TAGS, 0).is_empty());
    }
}
