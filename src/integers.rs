//! Types that can be stored in a register word or in a field of it.

use core::fmt::Debug;
use core::hash::Hash;

/// Types that can be the storage word of a [`Register`](crate::Register).
///
/// This trait is implemented on the unsigned integer types [`u8`], [`u16`], [`u32`] and [`u64`],
/// i.e. registers that are 1, 2, 4 or 8 bytes wide.
///
/// All mask arithmetic in this crate is carried out on [`u64`] and narrowed to the register word
/// only at the bus boundary, so that masks can be computed in constant context for every width.
///
/// ⚠️ This trait is sealed and cannot be implemented for types outside of this crate.
pub trait RegWord:
    Debug + Default + Copy + Eq + Ord + Hash + Sized + Send + Sync + 'static + private::Sealed
{
    /// Width of the register word in bits.
    const BITS: u32;

    /// Mask with every bit of the register word set, widened to `u64`.
    const FULL: u64;

    /// Narrows `bits` to the register word, dropping the bits above [`Self::BITS`].
    fn from_u64(bits: u64) -> Self;

    /// Widens the register word to `u64`.
    fn into_u64(self) -> u64;
}

macro_rules! impl_reg_word {
    ($type:ty) => {
        impl RegWord for $type {
            const BITS: u32 = <$type>::BITS;
            const FULL: u64 = <$type>::MAX as u64;

            #[inline(always)]
            fn from_u64(bits: u64) -> Self {
                bits as $type
            }

            #[inline(always)]
            fn into_u64(self) -> u64 {
                self as u64
            }
        }
    };
}

impl_reg_word!(u8);
impl_reg_word!(u16);
impl_reg_word!(u32);
impl_reg_word!(u64);

/// Types that can be the value of a register field.
///
/// Implemented for [`bool`] and the unsigned integer types. Fieldless enums implement it through
/// the derive macro [`FieldValue`](crate::FieldValue).
///
/// Conversions are total: [`from_bits`](FieldValue::from_bits) receives the field bits already
/// shifted down and masked to the field width, and must always produce a value. A register that
/// holds an unexpected pattern yields a wrong but well-typed value, never a panic.
pub trait FieldValue: Copy {
    /// Width of the value type in bits. A field may not be wider than this.
    const BITS: u32;

    /// Converts the value into raw field bits (not yet shifted or masked).
    fn into_bits(self) -> u64;

    /// Converts raw field bits into a value.
    fn from_bits(bits: u64) -> Self;
}

impl FieldValue for bool {
    const BITS: u32 = 1;

    #[inline(always)]
    fn into_bits(self) -> u64 {
        self as u64
    }

    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        bits != 0
    }
}

macro_rules! impl_field_value {
    ($type:ty) => {
        impl FieldValue for $type {
            const BITS: u32 = <$type>::BITS;

            #[inline(always)]
            fn into_bits(self) -> u64 {
                self as u64
            }

            #[inline(always)]
            fn from_bits(bits: u64) -> Self {
                bits as $type
            }
        }
    };
}

impl_field_value!(u8);
impl_field_value!(u16);
impl_field_value!(u32);
impl_field_value!(u64);

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}
