//! Register descriptions and the access policies binding fields to them.

use core::marker::PhantomData;

use crate::access::{Access, ReadOnly, ReadWrite, Readable, Writable, WriteOnly};
use crate::bus::Bus;
use crate::field::FieldSpec;
use crate::handle::Reg;
use crate::integers::{FieldValue, RegWord};
use crate::reserved::ReservedChain;
use crate::sync::SyncPolicy;

#[cfg(doc)]
use crate::sync::{CacheSync, CpuSync, NoSync};

/// Description of a register: where it lives, how wide it is, how accesses to it are ordered.
///
/// ⚠️ Implement this trait through the derive macro [`Register`](macro@crate::Register):
/// ```
/// use reg_field::{Field, NoSync, Register, Rs, Rw};
///
/// #[derive(Register)]
/// #[register(address = 0x1201_0004, word = u32, read_sync = NoSync, reserved = Reserved)]
/// struct PllConfig1;
///
/// type Refdiv = Rw<PllConfig1, Field<17, 12, u8>>;
/// type Reserved = Rs<PllConfig1, Field<19, 18>, Rs<PllConfig1, Field<31, 27>>>;
///
/// assert_eq!(PllConfig1::ADDRESS, 0x1201_0004);
/// assert_eq!(Refdiv::MASK, 0x3F000);
/// ```
///
/// # Safety
/// [`Self::ADDRESS`] must be valid for volatile loads and stores of [`Self::Word`] through
/// [`Self::Bus`] for the whole lifetime of the program. Safe code creates handles to it freely.
pub unsafe trait Register: Sized + 'static {
    /// The storage word of the register.
    type Word: RegWord + FieldValue;

    /// Address of the register.
    const ADDRESS: usize;

    /// Policy applied before every load. One of [`NoSync`], [`CpuSync`] or [`CacheSync`].
    type ReadSync: SyncPolicy;

    /// Policy applied after every store.
    type WriteSync: SyncPolicy;

    /// Bit ranges rewritten with their defaults by every multi-field write. [`Nil`] when none.
    ///
    /// [`Nil`]: crate::Nil
    type Reserved: ReservedChain;

    /// Backend performing the loads and stores.
    type Bus: Bus;

    /// Whether the register may be loaded. Loading a register that is not fails to build.
    const READABLE: bool = true;

    /// Whether the register may be stored. Storing a register that is not fails to build.
    const WRITABLE: bool = true;

    /// Mask ANDed into every loaded word, before any field is extracted.
    const READ_AND: u64 = u64::MAX;

    /// Bits ORed into every loaded word, after [`Self::READ_AND`].
    const READ_OR: u64 = 0;

    /// Mask ANDed into every stored word, after fields and reserved defaults are placed.
    const WRITE_AND: u64 = u64::MAX;

    /// Bits ORed into every stored word, after [`Self::WRITE_AND`].
    const WRITE_OR: u64 = 0;
}

/// Checks that `F` fits in a `W` and returns its mask. Must be evaluated in constant context.
pub(crate) const fn fitted_mask<W: RegWord, F: FieldSpec>() -> u64 {
    assert!(F::MSB < W::BITS, "field does not fit in the register");
    F::MASK
}

/// A field `F` of register `R` with access permission `A`.
///
/// Use the aliases [`Rw`], [`Ro`] and [`Wo`].
///
/// A bound field reads and writes its register on its own through the static methods
/// [`get`](Bound::get) and [`set`](Bound::set), or through a register handle with
/// [`Reg::get`] and [`Reg::set`]. Several bound fields combine into one access through
/// [`Reg::write`], [`Reg::read`] and [`Reg::is_equal`].
///
/// Permissions are checked at compile time:
/// ```compile_fail,E0277
/// use reg_field::{Bit, Register, Ro};
///
/// #[derive(Register)]
/// #[register(address = 0x1201_01E8)]
/// struct PllLockStatus;
///
/// type APll = Ro<PllLockStatus, Bit<0>>;
///
/// APll::set(true); // error[E0277]: cannot write to a read-only field
/// ```
/// ```compile_fail,E0277
/// use reg_field::{Field, Register, Wo};
///
/// #[derive(Register)]
/// #[register(address = 0x4000_0010)]
/// struct IntClear;
///
/// type Mask = Wo<IntClear, Field<7, 0, u8>>;
///
/// Mask::get(); // error[E0277]: cannot read from a write-only field
/// ```
pub struct Bound<R, F, A> {
    _reg: PhantomData<(R, F, A)>,
}

/// A read-write field of register `R`.
pub type Rw<R, F> = Bound<R, F, ReadWrite>;

/// A read-only field of register `R`.
pub type Ro<R, F> = Bound<R, F, ReadOnly>;

/// A write-only field of register `R`.
///
/// Setting it on its own stores the field with every other bit of the register cleared. Write it
/// together with the rest of the register through [`Reg::write`] instead when the register holds
/// more than this one field.
pub type Wo<R, F> = Bound<R, F, WriteOnly>;

impl<R: Register, F: FieldSpec, A: Access> Bound<R, F, A> {
    /// Mask of the field within the register.
    pub const MASK: u64 = fitted_mask::<R::Word, F>();

    /// Reads the field through a handle at the default address of `R`.
    #[inline]
    pub fn get() -> F::Value
    where
        A: Readable,
    {
        Reg::<R>::new().get::<Self>()
    }

    /// Writes the field through a handle at the default address of `R`.
    #[inline]
    pub fn set(value: F::Value)
    where
        A: Writable,
    {
        Reg::<R>::new().set::<Self>(value)
    }
}

/// Fields bound to a register: implemented by [`Bound`].
///
/// ⚠️ This trait is sealed and cannot be implemented for types outside of this crate.
pub trait BoundField: private::Sealed {
    /// Register owning the field.
    type Register: Register;
    /// Position and value type.
    type Spec: FieldSpec;
    /// Permission.
    type Access: Access;
    /// Mask of the field within the register, checked to fit.
    const MASK: u64;
}

impl<R: Register, F: FieldSpec, A: Access> BoundField for Bound<R, F, A> {
    type Register = R;
    type Spec = F;
    type Access = A;
    const MASK: u64 = fitted_mask::<R::Word, F>();
}

/// The register a group of fields belongs to, joined across the group at compile time.
#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// No field in the group is bound to an address.
    Any,
    /// Every bound field lives at `address`, in a register of `bits` bits.
    At { address: usize, bits: u32 },
    /// The group mixes fields of different registers.
    Conflict,
}

impl Owner {
    /// Owner of the fields of `R`.
    pub const fn of<R: Register>() -> Owner {
        Owner::At {
            address: R::ADDRESS,
            bits: <R::Word as RegWord>::BITS,
        }
    }

    pub const fn join(self, other: Owner) -> Owner {
        match (self, other) {
            (Owner::Any, owner) | (owner, Owner::Any) => owner,
            (Owner::At { address: a, bits: x }, Owner::At { address: b, bits: y })
                if a == b && x == y =>
            {
                Owner::At { address: a, bits: x }
            }
            _ => Owner::Conflict,
        }
    }

    pub const fn admits(self, address: usize) -> bool {
        match self {
            Owner::Any => true,
            Owner::At { address: owner, .. } => owner == address,
            Owner::Conflict => false,
        }
    }

    pub const fn fits(self, bits: u32) -> bool {
        match self {
            Owner::Any => true,
            Owner::At { bits: owner, .. } => owner == bits,
            Owner::Conflict => false,
        }
    }
}

mod private {
    pub trait Sealed {}
    impl<R, F, A> Sealed for super::Bound<R, F, A> {}
}
