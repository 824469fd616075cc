//! Collapse overlapping busy intervals into disjoint busy blocks.

use crate::interval::TimeInterval;

/// Merge overlapping or touching intervals.
///
/// Returns a sorted list of disjoint, non-adjacent blocks whose union equals
/// the union of the input. Each new interval is compared against the running
/// end of the current block, so chains of overlaps collapse into one block.
pub fn merge_intervals(mut intervals: Vec<TimeInterval>) -> Vec<TimeInterval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_by_key(|i| i.start());

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    let mut current_start = intervals[0].start();
    let mut current_end = intervals[0].end();

    for interval in &intervals[1..] {
        if interval.start() <= current_end {
            current_end = current_end.max(interval.end());
        } else {
            merged.push(TimeInterval::from_ordered(current_start, current_end));
            current_start = interval.start();
            current_end = interval.end();
        }
    }
    merged.push(TimeInterval::from_ordered(current_start, current_end));

    merged
}

/// Clip each interval to `window`, dropping those entirely outside it.
pub fn clip_all(intervals: &[TimeInterval], window: &TimeInterval) -> Vec<TimeInterval> {
    intervals.iter().filter_map(|i| i.clip_to(window)).collect()
}
