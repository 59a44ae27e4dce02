//! Frame sampling tests.

use vidsheet::sample_indices;

#[test]
fn evenly_spaced() {
    assert_eq!(sample_indices(100, 4), vec![0, 25, 50, 75]);
}

#[test]
fn last_frame_is_not_an_endpoint() {
    assert_eq!(sample_indices(10, 3), vec![0, 3, 6]);
    assert_eq!(sample_indices(5, 5), vec![0, 1, 2, 3, 4]);
}

#[test]
fn more_cells_than_frames_repeats() {
    assert_eq!(sample_indices(2, 4), vec![0, 0, 1, 1]);
    assert_eq!(sample_indices(1, 3), vec![0, 0, 0]);
}

#[test]
fn single_cell_is_first_frame() {
    assert_eq!(sample_indices(12_345, 1), vec![0]);
}

#[test]
fn huge_frame_counts_do_not_overflow() {
    let indices = sample_indices(u64::MAX, 4);
    assert_eq!(indices[0], 0);
    assert_eq!(indices[2], u64::MAX / 2);
    assert!(indices[3] < u64::MAX);
}

#[test]
#[should_panic(expected = "no frames")]
fn zero_frames_panics() {
    sample_indices(0, 4);
}

#[test]
fn indices_are_in_range_and_non_decreasing() {
    for frame_count in [1_u64, 2, 3, 7, 16, 100, 1_001, 86_400] {
        for cells in [1_u32, 2, 3, 4, 9, 16, 25, 100] {
            let indices = sample_indices(frame_count, cells);
            assert_eq!(indices.len(), cells as usize);
            assert_eq!(indices[0], 0);
            assert!(indices.iter().all(|&index| index < frame_count));
            assert!(indices.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}
