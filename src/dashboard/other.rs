//! Folds the smallest slices of a pie chart into a single "Other" slice.

use serde::{Deserialize, Serialize};

use crate::transaction::UNTAGGED_LABEL;

/// The default largest share, in percent, that the "Other" slice may take.
pub const DEFAULT_OTHER_THRESHOLD: f64 = 10.0;

/// One named value in a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// The label, e.g. a category name.
    pub name: String,
    /// The value, e.g. the category total.
    pub value: f64,
}

/// The result of [compress_slices].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedSlices {
    /// The kept slices, largest first, followed by "Other" if anything was folded.
    pub slices: Vec<Slice>,
    /// The names of the slices folded into "Other", smallest first.
    pub others_members: Vec<String>,
}

fn sorted_descending(mut slices: Vec<Slice>) -> Vec<Slice> {
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    slices
}

/// Fold the smallest slices into an "Other" slice taking at most `threshold`
/// percent of the total.
///
/// Nothing is folded when there are fewer than two slices, when the total is
/// not positive, or when the two smallest slices together already exceed
/// `threshold`. Otherwise slices are absorbed smallest first for as long as
/// the absorbed share stays at or under `threshold`.
///
/// The total value is unchanged: the "Other" slice holds exactly the sum of
/// the absorbed slices.
pub fn compress_slices(slices: &[Slice], threshold: f64) -> CompressedSlices {
    let uncompressed = || CompressedSlices {
        slices: sorted_descending(slices.to_vec()),
        others_members: Vec::new(),
    };

    let total: f64 = slices.iter().map(|slice| slice.value).sum();
    if slices.len() < 2 || total <= 0.0 {
        return uncompressed();
    }

    let share = |slice: &Slice| slice.value * 100.0 / total;

    let mut ascending: Vec<&Slice> = slices.iter().collect();
    ascending.sort_by(|a, b| a.value.total_cmp(&b.value));

    if share(ascending[0]) + share(ascending[1]) > threshold {
        return uncompressed();
    }

    let mut absorbed_share = 0.0;
    let mut absorbed_count = 0;
    for slice in &ascending {
        let next_share = absorbed_share + share(*slice);
        if next_share > threshold {
            break;
        }

        absorbed_share = next_share;
        absorbed_count += 1;
    }

    if absorbed_count == 0 {
        return uncompressed();
    }

    let (absorbed, kept) = ascending.split_at(absorbed_count);
    let other_value: f64 = absorbed.iter().map(|slice| slice.value).sum();
    let others_members = absorbed.iter().map(|slice| slice.name.clone()).collect();

    let mut kept = sorted_descending(kept.iter().map(|&slice| slice.clone()).collect());
    match kept.iter_mut().find(|slice| slice.name == UNTAGGED_LABEL) {
        Some(existing_other) => existing_other.value += other_value,
        None => kept.push(Slice {
            name: UNTAGGED_LABEL.to_owned(),
            value: other_value,
        }),
    }

    CompressedSlices {
        slices: kept,
        others_members,
    }
}
