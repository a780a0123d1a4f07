use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::bounds;
use crate::handle::Reg;
use crate::iter::RegArrayIter;
use crate::register::Register;

/// `N` registers described by `R`, laid out contiguously.
///
/// Element `i` lives at `base + i * size_of::<R::Word>()`, where `base` is [`Register::ADDRESS`]
/// unless given explicitly. Each element is reached through an ordinary [`Reg`] handle, so fields
/// of `R` apply to all of them.
///
/// ```
/// use reg_field::{RegArray, Register};
///
/// #[derive(Register)]
/// #[register(address = 0x1201_0000)]
/// struct PllConfig0;
///
/// // SAFETY: four PLLs are documented at 0x1201_0000
/// let plls = unsafe { RegArray::<PllConfig0, 4>::new() };
/// assert_eq!(plls.idx(0).address(), 0x1201_0000);
/// assert_eq!(plls.idx(3).address(), 0x1201_000C);
/// assert_eq!(plls.iter_slice(1, 3).map(|reg| reg.address()).sum::<usize>(), 0x2402_000C);
/// ```
pub struct RegArray<R, const N: usize> {
    base: usize,
    _reg: PhantomData<R>,
}

impl<R, const N: usize> Clone for RegArray<R, N> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, const N: usize> Copy for RegArray<R, N> {}

impl<R, const N: usize> fmt::Debug for RegArray<R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegArray")
            .field("base", &format_args!("{:#x}", self.base))
            .field("len", &N)
            .finish()
    }
}

impl<R: Register, const N: usize> RegArray<R, N> {
    /// Creates an array starting at the address of the description.
    ///
    /// # Safety
    /// The description only vouches for its own address: the `N - 1` registers following it must
    /// satisfy the requirements of [`Reg::at`] as well.
    #[inline]
    pub const unsafe fn new() -> Self {
        Self {
            base: R::ADDRESS,
            _reg: PhantomData,
        }
    }

    /// Creates an array starting at `base`.
    ///
    /// # Safety
    /// Each of the `N` element addresses must satisfy the requirements of [`Reg::at`].
    #[inline]
    pub const unsafe fn at(base: usize) -> Self {
        Self {
            base,
            _reg: PhantomData,
        }
    }

    /// Address of the first element.
    #[inline]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Returns the number of registers in the array.
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Handle to the register at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds, i.e. if `index >= N`.
    #[inline]
    #[track_caller]
    pub fn idx(&self, index: usize) -> Reg<R> {
        bounds::check_index::<N>(index);
        // SAFETY: we checked index is in bounds
        unsafe { self.idx_unchecked(index) }
    }

    /// Handle to the register at `index`, without doing bounds checking.
    ///
    /// # Safety
    /// `index` must be in bounds: `index < N`.
    #[inline]
    pub const unsafe fn idx_unchecked(&self, index: usize) -> Reg<R> {
        // SAFETY: the caller promises we are in bounds, element addresses are valid
        unsafe { Reg::at_index(self.base, index) }
    }

    /// Returns an iterator over the registers of the array.
    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = Reg<R>>
    + DoubleEndedIterator
    + FusedIterator
    + Clone
    + use<R, N> {
        RegArrayIter::new(self.base, 0, N)
    }

    /// Returns an iterator over the registers `[start..end]` of the array.
    ///
    /// # Panics
    /// If `[start..end]` is out of bounds.
    #[track_caller]
    pub fn iter_slice(
        &self,
        start: usize,
        end: usize,
    ) -> impl ExactSizeIterator<Item = Reg<R>>
    + DoubleEndedIterator
    + FusedIterator
    + Clone
    + use<R, N> {
        bounds::check_slice::<N>(start, end);
        RegArrayIter::new(self.base, start, end)
    }
}
