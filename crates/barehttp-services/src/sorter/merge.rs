//! Bottom-up merge sort

/// Stable ascending sort into a new vector.
///
/// Runs of width 1, 2, 4, ... are merged between two buffers that swap
/// roles after every pass.
pub fn merge_sort<T: Ord + Clone>(source: &[T]) -> Vec<T> {
    let n = source.len();
    let mut a = source.to_vec();
    if n <= 1 {
        return a;
    }
    let mut b = a.clone();

    let mut width = 1;
    while width < n {
        let mut start = 0;
        while start < n {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            merge(&a[start..mid], &a[mid..end], &mut b[start..end]);
            start += 2 * width;
        }
        std::mem::swap(&mut a, &mut b);
        width *= 2;
    }
    a
}

/// Merge two sorted runs; ties take from `left` first
fn merge<T: Ord + Clone>(left: &[T], right: &[T], out: &mut [T]) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        let take_left = j >= right.len() || (i < left.len() && left[i] <= right[j]);
        if take_left {
            *slot = left[i].clone();
            i += 1;
        } else {
            *slot = right[j].clone();
            j += 1;
        }
    }
}
