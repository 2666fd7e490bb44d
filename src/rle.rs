//! Run-length encoding for boolean vectors (mask, boundary, and domain-mask payloads).

/// Encode `arr` as (value of the first run, run lengths).
///
/// `arr` must be non-empty. The sum of the returned run lengths always equals
/// `arr.len()`.
pub fn encode(arr: &[bool]) -> (bool, Vec<u64>) {
    assert!(!arr.is_empty(), "cannot RLE-encode an empty array");

    let first = arr[0];
    let mut runs = Vec::new();
    let mut count = 1u64;
    for i in 1..arr.len() {
        if arr[i] == arr[i - 1] {
            count += 1;
        } else {
            runs.push(count);
            count = 1;
        }
    }
    runs.push(count);
    (first, runs)
}

/// Inverse of [`encode`]: alternates `first`, `!first`, `first`, ... for each run length.
pub fn decode(first: bool, runs: &[u64]) -> Vec<bool> {
    let total: u64 = runs.iter().sum();
    let mut out = Vec::with_capacity(total as usize);
    let mut current = first;
    for &run in runs {
        out.extend(std::iter::repeat(current).take(run as usize));
        current = !current;
    }
    out
}
