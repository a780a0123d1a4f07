//! Bit-range descriptors of register fields.

use core::marker::PhantomData;

use crate::integers::{FieldValue, RegWord};

/// A contiguous bit range `[MSB:LSB]` of a register word, read and written as a `V`.
///
/// Layout violations are rejected when the descriptor is used, i.e. the build fails if:
/// - `MSB < LSB`;
/// - the field is wider than its value type `V`;
/// - the field lies beyond bit 63.
///
/// Whether the field fits in a particular register is checked by the access policy that binds
/// it, see [`Bound`](crate::Bound).
///
/// ```
/// use reg_field::{Field, FieldSpec};
///
/// type Refdiv = Field<17, 12, u8>;
/// assert_eq!(Refdiv::WIDTH, 6);
/// assert_eq!(Refdiv::LSB_MASK, 0x3F);
/// assert_eq!(Refdiv::MASK, 0x3F << 12);
/// ```
pub struct Field<const MSB: u32, const LSB: u32, V = u32> {
    _val: PhantomData<V>,
}

/// A single-bit field at bit `N`.
pub type Bit<const N: u32, V = bool> = Field<N, N, V>;

/// The field spanning the whole register word `W`, used for whole-register loads and stores.
pub struct Value<W> {
    _word: PhantomData<W>,
}

/// Compile-time description of a field: its position, its value type, and the derived masks.
pub trait FieldSpec {
    /// Type the field is read and written as.
    type Value: FieldValue;

    /// Most significant bit of the field (inclusive).
    const MSB: u32;

    /// Least significant bit of the field.
    const LSB: u32;

    /// Number of bits in the field.
    const WIDTH: u32;

    /// `WIDTH` contiguous set bits starting at bit 0.
    const LSB_MASK: u64;

    /// [`Self::LSB_MASK`] shifted into place.
    const MASK: u64;

    /// Places `value` into its bit range, dropping the bits that do not fit the field.
    #[inline(always)]
    fn insert(value: Self::Value) -> u64 {
        (value.into_bits() & Self::LSB_MASK) << Self::LSB
    }

    /// Extracts the field from a register word.
    #[inline(always)]
    fn extract(raw: u64) -> Self::Value {
        Self::Value::from_bits((raw >> Self::LSB) & Self::LSB_MASK)
    }
}

/// Returns a mask with the `width` low order bits set.
#[inline(always)]
pub const fn lsb_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1 << width) - 1
    }
}

const fn checked_width(msb: u32, lsb: u32, value_bits: u32) -> u32 {
    assert!(msb >= lsb, "field msb is below its lsb");
    assert!(msb < u64::BITS, "field lies beyond bit 63");
    let width = msb - lsb + 1;
    assert!(width <= value_bits, "field is wider than its value type");
    width
}

impl<const MSB: u32, const LSB: u32, V: FieldValue> FieldSpec for Field<MSB, LSB, V> {
    type Value = V;

    const MSB: u32 = MSB;
    const LSB: u32 = LSB;
    const WIDTH: u32 = checked_width(MSB, LSB, V::BITS);
    const LSB_MASK: u64 = lsb_mask(Self::WIDTH);
    const MASK: u64 = Self::LSB_MASK << LSB;
}

impl<W: RegWord + FieldValue> FieldSpec for Value<W> {
    type Value = W;

    const MSB: u32 = <W as RegWord>::BITS - 1;
    const LSB: u32 = 0;
    const WIDTH: u32 = <W as RegWord>::BITS;
    const LSB_MASK: u64 = W::FULL;
    const MASK: u64 = W::FULL;
}
