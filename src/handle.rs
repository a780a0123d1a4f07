//! Handles binding a register description to an address.

use core::fmt;
use core::marker::PhantomData;

use crate::access::{Access, AccessMode, Readable, Writable};
use crate::bus;
use crate::compose::{self, CompareList, ReadList, WriteList};
use crate::field::FieldSpec;
use crate::integers::RegWord;
use crate::register::{BoundField, Register};
use crate::reserved::ReservedChain;

/// Rejects fields of another register. Must be evaluated in constant context.
const fn check_field<R: Register, F: BoundField>(address: usize) {
    assert!(
        <F::Register as Register>::ADDRESS == address,
        "field does not belong to this register"
    );
    assert!(
        <<F::Register as Register>::Word as RegWord>::BITS == <R::Word as RegWord>::BITS,
        "field belongs to a register of another width"
    );
}

/// Rejects read-modify-writes of unreadable registers. Must be evaluated in constant context.
const fn check_update<R: Register>(blind: bool) {
    assert!(blind || R::READABLE, "register is not readable");
}

/// A stateless handle to the register `R`.
///
/// Every method performs its own bus accesses, preceded by the read barrier and followed by the
/// write barrier of `R`. Handles are `Copy` and carry only the address.
///
/// # Addressing
/// A handle created with [`Reg::new`] uses [`Register::ADDRESS`]. [`Reg::at`] and
/// [`Reg::at_index`] bind the description to another address, e.g. for several instances of the
/// same peripheral. Fields are still checked against the description: they must be fields of `R`.
pub struct Reg<R> {
    address: usize,
    _reg: PhantomData<R>,
}

impl<R> Clone for Reg<R> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Reg<R> {}

impl<R> fmt::Debug for Reg<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reg")
            .field("address", &format_args!("{:#x}", self.address))
            .finish()
    }
}

impl<R: Register> Default for Reg<R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Register> Reg<R> {
    /// Creates a handle at the address of the description.
    #[inline]
    pub const fn new() -> Self {
        Self {
            address: R::ADDRESS,
            _reg: PhantomData,
        }
    }

    /// Creates a handle at `address`.
    ///
    /// # Safety
    /// `address` must be valid for volatile loads and stores of `R::Word` through `R::Bus`, and
    /// properly aligned, for as long as the handle or any handle derived from it is used.
    #[inline]
    pub const unsafe fn at(address: usize) -> Self {
        Self {
            address,
            _reg: PhantomData,
        }
    }

    /// Creates a handle to element `index` of an array of registers starting at `base`, i.e. at
    /// `base + index * size_of::<R::Word>()`.
    ///
    /// # Safety
    /// See [`Reg::at`], for the computed address.
    #[inline]
    pub const unsafe fn at_index(base: usize, index: usize) -> Self {
        // SAFETY: forwarded to the caller
        unsafe { Self::at(base + index * size_of::<R::Word>()) }
    }

    /// Address of the register.
    #[inline]
    pub const fn address(&self) -> usize {
        self.address
    }

    /// Width of the register in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        size_of::<R::Word>()
    }

    #[inline(always)]
    fn load_raw(&self) -> u64 {
        // SAFETY: the address is valid by the contract of `Register` or of `Reg::at`
        unsafe { bus::load::<R>(self.address) }
    }

    /// Loads for a read-modify-write. Callers reject unreadable registers through `check_update`.
    #[inline(always)]
    fn load_for_update(&self) -> u64 {
        // SAFETY: as for `load_raw`
        unsafe { bus::load_unchecked::<R>(self.address) }
    }

    #[inline(always)]
    fn store_raw(&self, raw: u64) {
        // SAFETY: the address is valid by the contract of `Register` or of `Reg::at`
        unsafe { bus::store::<R>(self.address, raw) }
    }

    /// Loads the whole register.
    #[inline]
    pub fn load(&self) -> R::Word {
        R::Word::from_u64(self.load_raw())
    }

    /// Stores the whole register.
    #[inline]
    pub fn store(&self, value: R::Word) {
        self.store_raw(value.into_u64())
    }

    /// Sets the bits of `mask` with one read-modify-write.
    #[inline]
    pub fn set_bits(&self, mask: R::Word) {
        self.store_raw(self.load_raw() | mask.into_u64())
    }

    /// Clears the bits of `mask` with one read-modify-write.
    #[inline]
    pub fn clear_bits(&self, mask: R::Word) {
        self.store_raw(self.load_raw() & !mask.into_u64())
    }

    /// Replaces the register with `f` applied to its current value.
    #[inline]
    pub fn modify(&self, f: impl FnOnce(R::Word) -> R::Word) {
        self.store(f(self.load()))
    }

    /// Reads the field `F`.
    #[inline]
    pub fn get<F: BoundField>(&self) -> <F::Spec as FieldSpec>::Value
    where
        F::Access: Readable,
    {
        const { check_field::<R, F>(R::ADDRESS) };
        <F::Spec as FieldSpec>::extract(self.load_raw())
    }

    /// Writes the field `F`.
    ///
    /// A read-write field is updated with a read-modify-write, unless it spans the whole
    /// register. A write-only field is stored with every other bit cleared, the register is never
    /// read. Reserved bits are left alone in both cases, see [`Reg::write`] to rewrite them.
    #[inline]
    pub fn set<F: BoundField>(&self, value: <F::Spec as FieldSpec>::Value)
    where
        F::Access: Writable,
    {
        let blind = const {
            check_field::<R, F>(R::ADDRESS);
            let blind = matches!(<F::Access as Access>::MODE, AccessMode::WriteOnly)
                || F::MASK == <R::Word as RegWord>::FULL;
            check_update::<R>(blind);
            blind
        };
        let bits = <F::Spec as FieldSpec>::insert(value);
        if blind {
            self.store_raw(bits);
        } else {
            self.store_raw((self.load_for_update() & !F::MASK) | bits);
        }
    }

    /// Writes the fields `S` together, rewriting the reserved bits of `R` with their defaults.
    ///
    /// When the fields and the reserved bits cover the whole register this is a single store.
    /// Otherwise the bits outside of them are preserved with one read-modify-write.
    #[inline]
    pub fn write<S: WriteList>(&self, values: S::Values) {
        let (mask, blind) = const {
            compose::check_write::<R, S>(R::ADDRESS);
            let mask = compose::write_mask::<R, S>();
            let full = <R::Word as RegWord>::FULL;
            let blind = mask & full == full;
            check_update::<R>(blind);
            (mask, blind)
        };
        let bits = S::compose(values) | <R::Reserved as ReservedChain>::DEFAULT;
        if blind {
            self.store_raw(bits);
        } else {
            self.store_raw((self.load_for_update() & !mask) | bits);
        }
    }

    /// Reads the fields `S` from one load.
    #[inline]
    pub fn read<S: ReadList>(&self) -> S::Values {
        const { compose::check_read::<R, S>(R::ADDRESS) };
        S::extract(self.load_raw())
    }

    /// Compares the fields `S`, and the reserved bits of `R`, against `values` with one load.
    #[inline]
    pub fn is_equal<S: CompareList>(&self, values: S::Values) -> bool {
        const { compose::check_compare::<R, S>(R::ADDRESS) };
        let mask = const { compose::compare_mask::<R, S>() };
        let bits = S::compose(values) | <R::Reserved as ReservedChain>::DEFAULT;
        self.load_raw() & mask == bits & mask
    }

    /// Busy-waits until [`Reg::is_equal`] holds. There is no timeout.
    #[inline]
    pub fn wait_equal<S: CompareList>(&self, values: S::Values)
    where
        S::Values: Copy,
    {
        while !self.is_equal::<S>(values) {
            core::hint::spin_loop();
        }
    }

    /// Loads the register into a [`Shadow`] copy.
    #[inline]
    pub fn checkout(&self) -> Shadow<R> {
        Shadow {
            reg: *self,
            value: self.load_raw(),
        }
    }

    /// Loads the register into a [`Cached`] copy, stored back when dropped.
    #[inline]
    pub fn cached(&self) -> Cached<R> {
        Cached {
            shadow: self.checkout(),
        }
    }
}

/// An in-memory copy of a register, loaded by [`checkout`](Shadow::checkout) and stored by
/// [`commit`](Shadow::commit).
///
/// Field accesses on the copy perform no bus access and issue no barrier. Nothing prevents other
/// handles from changing the register between checkout and commit, the commit overwrites their
/// changes.
///
/// Write-only fields cannot be staged: their register is never read, so there is nothing to stage
/// them onto.
/// ```compile_fail
/// use reg_field::{Field, Reg, Register, Wo};
///
/// #[derive(Register)]
/// #[register(address = 0x4000_0010)]
/// struct IntClear;
///
/// type Mask = Wo<IntClear, Field<7, 0, u8>>;
///
/// let mut shadow = Reg::<IntClear>::new().checkout();
/// shadow.set::<Mask>(1); // write-only fields cannot be staged in a shadow copy
/// ```
pub struct Shadow<R: Register> {
    reg: Reg<R>,
    value: u64,
}

impl<R: Register> fmt::Debug for Shadow<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shadow")
            .field("address", &format_args!("{:#x}", self.reg.address))
            .field("value", &format_args!("{:#x}", self.value))
            .finish()
    }
}

const fn check_staged(write_only: bool) {
    assert!(
        !write_only,
        "write-only fields cannot be staged in a shadow copy"
    );
}

impl<R: Register> Shadow<R> {
    /// Handle to the register the copy belongs to.
    #[inline]
    pub fn reg(&self) -> Reg<R> {
        self.reg
    }

    /// The whole copy.
    #[inline]
    pub fn value(&self) -> R::Word {
        R::Word::from_u64(self.value)
    }

    /// Replaces the whole copy.
    #[inline]
    pub fn set_value(&mut self, value: R::Word) {
        self.value = value.into_u64();
    }

    /// Reads the field `F` from the copy.
    #[inline]
    pub fn get<F: BoundField>(&self) -> <F::Spec as FieldSpec>::Value
    where
        F::Access: Readable,
    {
        const { check_field::<R, F>(R::ADDRESS) };
        <F::Spec as FieldSpec>::extract(self.value)
    }

    /// Writes the field `F` into the copy.
    #[inline]
    pub fn set<F: BoundField>(&mut self, value: <F::Spec as FieldSpec>::Value)
    where
        F::Access: Writable,
    {
        const {
            check_field::<R, F>(R::ADDRESS);
            check_staged(matches!(<F::Access as Access>::MODE, AccessMode::WriteOnly));
        };
        self.value = (self.value & !F::MASK) | <F::Spec as FieldSpec>::insert(value);
    }

    /// Writes the fields `S` into the copy, rewriting the reserved bits of `R`.
    #[inline]
    pub fn write<S: WriteList>(&mut self, values: S::Values) {
        const {
            compose::check_write::<R, S>(R::ADDRESS);
            check_staged(S::WRITE_ONLY);
        };
        let mask = const { compose::write_mask::<R, S>() };
        let bits = S::compose(values) | <R::Reserved as ReservedChain>::DEFAULT;
        self.value = (self.value & !mask) | bits;
    }

    /// Reads the fields `S` from the copy.
    #[inline]
    pub fn read<S: ReadList>(&self) -> S::Values {
        const { compose::check_read::<R, S>(R::ADDRESS) };
        S::extract(self.value)
    }

    /// Reloads the copy from the register, dropping uncommitted changes.
    #[inline]
    pub fn checkout(&mut self) {
        self.value = self.reg.load_raw();
    }

    /// Stores the copy to the register. The copy stays valid and can be committed again.
    #[inline]
    pub fn commit(&self) {
        self.reg.store_raw(self.value);
    }
}

/// A [`Shadow`] copy committed when dropped.
///
/// Creating it loads the register once, dropping it stores the register once, whatever happened
/// in between, unwinding included. Between the two no bus access takes place.
///
/// The register is not locked: when two cached handles to the same register are alive at once,
/// the last one dropped wins.
pub struct Cached<R: Register> {
    shadow: Shadow<R>,
}

impl<R: Register> Cached<R> {
    /// Loads the register at the address of the description.
    #[inline]
    pub fn new() -> Self {
        Reg::<R>::new().cached()
    }

    /// Handle to the register the copy belongs to.
    #[inline]
    pub fn reg(&self) -> Reg<R> {
        self.shadow.reg
    }

    /// The whole copy.
    #[inline]
    pub fn value(&self) -> R::Word {
        self.shadow.value()
    }

    /// Replaces the whole copy.
    #[inline]
    pub fn set_value(&mut self, value: R::Word) {
        self.shadow.set_value(value)
    }

    /// Reads the field `F` from the copy.
    #[inline]
    pub fn get<F: BoundField>(&self) -> <F::Spec as FieldSpec>::Value
    where
        F::Access: Readable,
    {
        self.shadow.get::<F>()
    }

    /// Writes the field `F` into the copy.
    #[inline]
    pub fn set<F: BoundField>(&mut self, value: <F::Spec as FieldSpec>::Value)
    where
        F::Access: Writable,
    {
        self.shadow.set::<F>(value)
    }

    /// Writes the fields `S` into the copy, rewriting the reserved bits of `R`.
    #[inline]
    pub fn write<S: WriteList>(&mut self, values: S::Values) {
        self.shadow.write::<S>(values)
    }

    /// Reads the fields `S` from the copy.
    #[inline]
    pub fn read<S: ReadList>(&self) -> S::Values {
        self.shadow.read::<S>()
    }
}

impl<R: Register> Default for Cached<R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Register> fmt::Debug for Cached<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cached").field(&self.shadow).finish()
    }
}

impl<R: Register> Drop for Cached<R> {
    #[inline]
    fn drop(&mut self) {
        self.shadow.commit();
    }
}
