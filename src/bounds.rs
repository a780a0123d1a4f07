/// Panics unless `index` addresses an element of an array of `LEN` registers.
#[inline]
#[track_caller]
pub(crate) const fn check_index<const LEN: usize>(index: usize) {
    assert!(index < LEN, "register index out of bounds");
}

/// Panics unless `[start..end]` is a subslice of an array of `LEN` registers.
#[inline]
#[track_caller]
pub(crate) const fn check_slice<const LEN: usize>(start: usize, end: usize) {
    assert!(start <= end, "register slice starts after its end");
    assert!(end <= LEN, "register slice end out of bounds");
}
