/// Picks evenly spaced label indices out of `len` visible labels.
///
/// The first and the last label are always selected. The stride is the
/// smallest divisor of `len - 1` that keeps the count within `max_count`, so
/// the result holds the largest evenly spaced subset allowed. `max_count`
/// below 2 is treated as 2.
#[must_use]
pub fn select_label_indices(len: usize, max_count: usize) -> Vec<usize> {
    match len {
        0 => return Vec::new(),
        1 => return vec![0],
        _ => {}
    }

    let max_count = max_count.max(2);
    if len <= max_count {
        return (0..len).collect();
    }

    let span = len - 1;
    let stride = (1..=span)
        .find(|stride| span % stride == 0 && span / stride < max_count)
        .unwrap_or(span);
    (0..=span).step_by(stride).collect()
}
