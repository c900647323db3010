use careflow_core::ClinicalEvent;
use indexmap::IndexMap;

/// Count events per activity label.
///
/// Sorted by descending count, ties broken by label, so the frequency
/// table is deterministic for a given input.
pub fn activity_frequencies(events: &[ClinicalEvent]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for event in events {
        *counts.entry(event.activity.clone()).or_insert(0) += 1;
    }
    counts.sort_by(|ka, va, kb, vb| vb.cmp(va).then_with(|| ka.cmp(kb)));
    counts
}

/// The `n` most frequent activities.
pub fn top_activities(events: &[ClinicalEvent], n: usize) -> Vec<(String, usize)> {
    activity_frequencies(events)
        .into_iter()
        .take(n)
        .collect()
}

/// Mean of a sample, `None` when empty.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
