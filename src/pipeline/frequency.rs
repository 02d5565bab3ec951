//! Value counts over the four rock tiers

use std::collections::BTreeMap;

use super::schema::Pedra;

/// Count each canonical tier in `values`.
///
/// Output is indexed by [`Pedra::index`]; tiers that never occur count zero
/// and any other label (including blanks and `#NULO!`) is ignored.
pub fn tier_counts(values: &[Option<String>]) -> [u32; 4] {
    let mut counts = [0u32; 4];
    for pedra in values.iter().flatten().filter_map(|v| Pedra::from_label(v)) {
        counts[pedra.index()] += 1;
    }
    counts
}

/// Cross-tabulate a grouping column against tiers.
///
/// Rows with a missing key or a non-canonical tier are skipped. Keys come
/// back sorted; every key carries all four tier counts.
pub fn tier_crosstab(keys: &[Option<String>], tiers: &[Option<String>]) -> BTreeMap<String, [u32; 4]> {
    let mut table: BTreeMap<String, [u32; 4]> = BTreeMap::new();
    for (key, tier) in keys.iter().zip(tiers.iter()) {
        let (Some(key), Some(tier)) = (key, tier) else {
            continue;
        };
        if let Some(pedra) = Pedra::from_label(tier) {
            table.entry(key.clone()).or_insert([0; 4])[pedra.index()] += 1;
        }
    }
    table
}

/// Share of each count in their sum, as percentages. All zero when the sum is zero.
pub fn percentages(counts: &[u32]) -> Vec<f64> {
    let total: u32 = counts.iter().sum();
    counts
        .iter()
        .map(|&c| {
            if total == 0 {
                0.0
            } else {
                c as f64 / total as f64 * 100.0
            }
        })
        .collect()
}
