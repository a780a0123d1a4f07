//! Lists of fields accessed together through one load and/or one store.
//!
//! A list is a single [`Bound`] field, a reserved chain [`Rs`], or a tuple of up to 12 lists.
//! Values are passed and returned in the same shape: a bare value for a single field, `()` for a
//! reserved chain, and a tuple for a tuple.
//!
//! ```
//! use reg_field::{Bit, Field, Reg, Register, Rs, Rw};
//! # use reg_field::{Barrier, Bus, RegWord};
//! # use std::cell::Cell;
//! # thread_local!(static MEM: Cell<u64> = Cell::new(0xFFFF_FFFF));
//! # struct Memory;
//! # impl Bus for Memory {
//! #     unsafe fn load<W: RegWord>(_: usize) -> W { W::from_u64(MEM.get()) }
//! #     unsafe fn store<W: RegWord>(_: usize, v: W) { MEM.set(v.into_u64()) }
//! #     fn barrier(_: Barrier) {}
//! # }
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0000, reserved = Reserved, bus = Memory)]
//! struct PllConfig0;
//!
//! type Postdiv2 = Rw<PllConfig0, Field<30, 28, u8>>;
//! type Postdiv1 = Rw<PllConfig0, Field<26, 24, u8>>;
//! type Frac = Rw<PllConfig0, Field<23, 0>>;
//! type Reserved = Rs<PllConfig0, Bit<27>, Rs<PllConfig0, Bit<31>>>;
//!
//! let reg = Reg::<PllConfig0>::new();
//! reg.write::<(Postdiv2, Postdiv1)>((1, 2));
//! // reserved bits 27 and 31 are rewritten, Frac is preserved
//! assert_eq!(reg.load(), 0x12FF_FFFF);
//! assert_eq!(reg.read::<(Postdiv1, Frac)>(), (2, 0xFF_FFFF));
//! assert!(reg.is_equal::<(Postdiv2, Postdiv1)>((1, 2)));
//! ```
//!
//! Every field in a list must belong to the register it is used with:
//! ```compile_fail
//! use reg_field::{Field, Reg, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0000)]
//! struct PllConfig0;
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0004)]
//! struct PllConfig1;
//!
//! type Frac = Rw<PllConfig0, Field<23, 0>>;
//! type FBdiv = Rw<PllConfig1, Field<11, 0, u16>>;
//!
//! Reg::<PllConfig1>::new().write::<(FBdiv, Frac)>((75, 0)); // field list does not belong ...
//! ```
//! The same holds for reads and comparisons:
//! ```compile_fail
//! use reg_field::{Field, Reg, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0000)]
//! struct PllConfig0;
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0004)]
//! struct PllConfig1;
//!
//! type Frac = Rw<PllConfig0, Field<23, 0>>;
//!
//! let _ = Reg::<PllConfig1>::new().read::<Frac>(); // field list does not belong ...
//! ```
//! ```compile_fail
//! use reg_field::{Field, Reg, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0000)]
//! struct PllConfig0;
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0004)]
//! struct PllConfig1;
//!
//! type Frac = Rw<PllConfig0, Field<23, 0>>;
//!
//! let _ = Reg::<PllConfig1>::new().is_equal::<Frac>(0); // field list does not belong ...
//! ```
//!
//! Sharing the address is not enough, the register widths must match too:
//! ```compile_fail
//! use reg_field::{Field, Reg, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0100, word = u8)]
//! struct Narrow;
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0100)]
//! struct Wide;
//!
//! type High = Rw<Wide, Field<15, 8, u8>>;
//!
//! Reg::<Narrow>::new().write::<High>(0xAB); // field list belongs to a register of another width
//! ```
//! ```compile_fail
//! use reg_field::{Field, Reg, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0100, word = u8)]
//! struct Narrow;
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0100)]
//! struct Wide;
//!
//! type High = Rw<Wide, Field<15, 8, u8>>;
//!
//! let _ = Reg::<Narrow>::new().read::<(High,)>(); // field list belongs to a register of ...
//! ```
//!
//! Write-only fields are never read back, so a list holding one must cover the whole register:
//! ```compile_fail
//! use reg_field::{Field, Reg, Register, Wo};
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0010)]
//! struct IntClear;
//!
//! type Low = Wo<IntClear, Field<15, 0, u16>>;
//! type High = Wo<IntClear, Field<31, 16, u16>>;
//!
//! Reg::<IntClear>::new().write::<(Low, High)>((1, 2)); // fine, the register is covered
//! Reg::<IntClear>::new().write::<Low>(1); // write-only fields must be written together ...
//! ```

use crate::access::{AccessMode, Readable, Writable};
use crate::field::FieldSpec;
use crate::integers::RegWord;
use crate::register::{Bound, Owner, Register, fitted_mask};
use crate::reserved::{ReservedChain, Rs};

/// Fields written together by one store.
///
/// Implemented by writable [`Bound`] fields, by reserved chains and by tuples of these.
pub trait WriteList {
    /// Values of the fields, in the shape of the list.
    type Values;

    #[doc(hidden)]
    const MASK: u64;
    #[doc(hidden)]
    const OWNER: Owner;
    #[doc(hidden)]
    const WRITE_ONLY: bool;

    /// Places every value into its bit range.
    fn compose(values: Self::Values) -> u64;
}

/// Fields extracted together from one load.
///
/// Implemented by readable [`Bound`] fields and by tuples of these.
pub trait ReadList {
    /// Values of the fields, in the shape of the list.
    type Values;

    #[doc(hidden)]
    const OWNER: Owner;

    /// Extracts every field from a register word.
    fn extract(raw: u64) -> Self::Values;
}

/// Fields compared together against one load.
///
/// Implemented by readable [`Bound`] fields, by reserved chains and by tuples of these.
pub trait CompareList {
    /// Values of the fields, in the shape of the list.
    type Values;

    #[doc(hidden)]
    const MASK: u64;
    #[doc(hidden)]
    const OWNER: Owner;

    /// Places every value into its bit range.
    fn compose(values: Self::Values) -> u64;
}

impl<R: Register, F: FieldSpec, A: Writable> WriteList for Bound<R, F, A> {
    type Values = F::Value;

    const MASK: u64 = fitted_mask::<R::Word, F>();
    const OWNER: Owner = Owner::of::<R>();
    const WRITE_ONLY: bool = matches!(A::MODE, AccessMode::WriteOnly);

    #[inline(always)]
    fn compose(value: F::Value) -> u64 {
        F::insert(value)
    }
}

impl<R: Register, F: FieldSpec, A: Readable> ReadList for Bound<R, F, A> {
    type Values = F::Value;

    const OWNER: Owner = Owner::of::<R>();

    #[inline(always)]
    fn extract(raw: u64) -> F::Value {
        F::extract(raw)
    }
}

impl<R: Register, F: FieldSpec, A: Readable> CompareList for Bound<R, F, A> {
    type Values = F::Value;

    const MASK: u64 = fitted_mask::<R::Word, F>();
    const OWNER: Owner = Owner::of::<R>();

    #[inline(always)]
    fn compose(value: F::Value) -> u64 {
        F::insert(value)
    }
}

impl<R, F, Next, const DEFAULT: u64> WriteList for Rs<R, F, Next, DEFAULT>
where
    Self: ReservedChain,
{
    type Values = ();

    const MASK: u64 = <Self as ReservedChain>::MASK;
    const OWNER: Owner = <Self as ReservedChain>::OWNER;
    const WRITE_ONLY: bool = false;

    #[inline(always)]
    fn compose((): ()) -> u64 {
        <Self as ReservedChain>::DEFAULT
    }
}

impl<R, F, Next, const DEFAULT: u64> CompareList for Rs<R, F, Next, DEFAULT>
where
    Self: ReservedChain,
{
    type Values = ();

    const MASK: u64 = <Self as ReservedChain>::MASK;
    const OWNER: Owner = <Self as ReservedChain>::OWNER;

    #[inline(always)]
    fn compose((): ()) -> u64 {
        <Self as ReservedChain>::DEFAULT
    }
}

macro_rules! impl_lists {
    ($($list:ident $idx:tt),+) => {
        impl<$($list: WriteList),+> WriteList for ($($list,)+) {
            type Values = ($($list::Values,)+);

            const MASK: u64 = 0 $(| $list::MASK)+;
            const OWNER: Owner = Owner::Any $(.join($list::OWNER))+;
            const WRITE_ONLY: bool = false $(|| $list::WRITE_ONLY)+;

            #[inline(always)]
            fn compose(values: Self::Values) -> u64 {
                0 $(| $list::compose(values.$idx))+
            }
        }

        impl<$($list: ReadList),+> ReadList for ($($list,)+) {
            type Values = ($($list::Values,)+);

            const OWNER: Owner = Owner::Any $(.join($list::OWNER))+;

            #[inline(always)]
            fn extract(raw: u64) -> Self::Values {
                ($($list::extract(raw),)+)
            }
        }

        impl<$($list: CompareList),+> CompareList for ($($list,)+) {
            type Values = ($($list::Values,)+);

            const MASK: u64 = 0 $(| $list::MASK)+;
            const OWNER: Owner = Owner::Any $(.join($list::OWNER))+;

            #[inline(always)]
            fn compose(values: Self::Values) -> u64 {
                0 $(| $list::compose(values.$idx))+
            }
        }
    };
}

impl_lists!(A 0);
impl_lists!(A 0, B 1);
impl_lists!(A 0, B 1, C 2);
impl_lists!(A 0, B 1, C 2, D 3);
impl_lists!(A 0, B 1, C 2, D 3, E 4);
impl_lists!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_lists!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_lists!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
impl_lists!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
impl_lists!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
impl_lists!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
impl_lists!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);

/// Mask of every bit a write of `S` to `R` sets, reserved chain included.
#[inline(always)]
pub(crate) const fn write_mask<R: Register, S: WriteList>() -> u64 {
    S::MASK | <R::Reserved as ReservedChain>::MASK
}

/// Mask of every bit a comparison of `S` against `R` looks at, reserved chain included.
#[inline(always)]
pub(crate) const fn compare_mask<R: Register, S: CompareList>() -> u64 {
    S::MASK | <R::Reserved as ReservedChain>::MASK
}

/// Rejects lists holding fields of another register. Must be evaluated in constant context.
const fn check_owner<R: Register>(owner: Owner, address: usize) {
    assert!(
        owner.admits(address),
        "field list does not belong to this register"
    );
    assert!(
        owner.fits(<R::Word as RegWord>::BITS),
        "field list belongs to a register of another width"
    );
}

const fn check_reserved<R: Register>(address: usize) {
    let owner = <R::Reserved as ReservedChain>::OWNER;
    assert!(
        owner.admits(address) && owner.fits(<R::Word as RegWord>::BITS),
        "reserved chain does not belong to this register"
    );
}

/// Rejects writes of `S` to a register at `address`. Must be evaluated in constant context.
pub(crate) const fn check_write<R: Register, S: WriteList>(address: usize) {
    check_owner::<R>(S::OWNER, address);
    check_reserved::<R>(address);
    assert!(
        !S::WRITE_ONLY
            || write_mask::<R, S>() & <R::Word as RegWord>::FULL == <R::Word as RegWord>::FULL,
        "write-only fields must be written together with every other bit of the register"
    );
}

pub(crate) const fn check_read<R: Register, S: ReadList>(address: usize) {
    check_owner::<R>(S::OWNER, address);
}

pub(crate) const fn check_compare<R: Register, S: CompareList>(address: usize) {
    check_owner::<R>(S::OWNER, address);
    check_reserved::<R>(address);
}
