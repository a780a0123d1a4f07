//! Iterators over arrays of registers.

use core::iter::{DoubleEndedIterator, ExactSizeIterator, FusedIterator, Iterator};
use core::marker::PhantomData;

use crate::handle::Reg;
use crate::register::Register;

/// Iterator over the handles of a register array.
///
/// This struct is created by the [`iter`](crate::RegArray::iter) and
/// [`iter_slice`](crate::RegArray::iter_slice) methods on [`RegArray`](crate::RegArray).
pub(crate) struct RegArrayIter<R> {
    base: usize,
    // invariant: start <= end, both within the array
    start: usize,
    end: usize,
    _reg: PhantomData<R>,
}

impl<R> Clone for RegArrayIter<R> {
    fn clone(&self) -> Self {
        Self {
            base: self.base,
            start: self.start,
            end: self.end,
            _reg: PhantomData,
        }
    }
}

impl<R: Register> RegArrayIter<R> {
    pub(crate) const fn new(base: usize, start: usize, end: usize) -> Self {
        Self {
            base,
            start,
            end,
            _reg: PhantomData,
        }
    }

    #[inline(always)]
    fn handle(&self, index: usize) -> Reg<R> {
        // SAFETY: indices between start and end are in bounds of the array
        unsafe { Reg::at_index(self.base, index) }
    }
}

impl<R: Register> Iterator for RegArrayIter<R> {
    type Item = Reg<R>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        } else {
            self.start += 1;
            Some(self.handle(self.start - 1))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.len();
        (exact, Some(exact))
    }

    #[inline]
    fn count(self) -> usize {
        self.len()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.len() {
            self.start = self.end;
            None
        } else {
            self.start += n;
            self.next()
        }
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<R: Register> ExactSizeIterator for RegArrayIter<R> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<R: Register> DoubleEndedIterator for RegArrayIter<R> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        } else {
            self.end -= 1;
            Some(self.handle(self.end))
        }
    }

    #[inline]
    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.len() {
            self.end = self.start;
            None
        } else {
            self.end -= n;
            self.next_back()
        }
    }
}

impl<R: Register> FusedIterator for RegArrayIter<R> {}
