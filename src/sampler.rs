//! Frame sampling.

/// Pick `cell_count` frame indices spread evenly over `[0, frame_count)`.
///
/// Index `i` is `floor(i * frame_count / cell_count)`, computed exactly in
/// integer arithmetic. The interval is half-open, so the last frame is never
/// chosen as an endpoint. When `cell_count > frame_count` some indices repeat
/// and the sheet shows duplicate frames.
///
/// # Panics
///
/// Panics if `frame_count` is zero.
///
/// # Example
///
/// ```
/// assert_eq!(vidsheet::sample_indices(100, 4), vec![0, 25, 50, 75]);
/// assert_eq!(vidsheet::sample_indices(2, 4), vec![0, 0, 1, 1]);
/// ```
pub fn sample_indices(frame_count: u64, cell_count: u32) -> Vec<u64> {
    assert!(frame_count > 0, "cannot sample a video with no frames");

    let cells = u128::from(cell_count);
    (0..cells)
        .map(|index| (index * u128::from(frame_count) / cells) as u64)
        .collect()
}
