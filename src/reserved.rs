//! Reserved bit ranges of a register.
//!
//! Hardware documentation commonly requires reserved bits to be written with a fixed value. A
//! register lists them as a chain of [`Rs`] nodes terminated by [`Nil`], named by the `reserved`
//! key of [`#[derive(Register)]`](macro@crate::Register):
//!
//! ```
//! use reg_field::{Bit, Field, Register, ReservedChain, Rs};
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0080, reserved = Reserved)]
//! struct SocClkSel;
//!
//! type Reserved = Rs<SocClkSel, Bit<2>, Rs<SocClkSel, Bit<7>, Rs<SocClkSel, Bit<9>,
//!     Rs<SocClkSel, Field<31, 11>>>>>;
//!
//! assert_eq!(Reserved::MASK, 0xFFFF_FA84);
//! assert_eq!(Reserved::DEFAULT, 0);
//! ```
//!
//! Every multi-field write ([`Reg::write`](crate::Reg::write)) rewrites the whole chain with its
//! defaults, and every comparison ([`Reg::is_equal`](crate::Reg::is_equal)) expects them.
//! A single-field [`set`](crate::Reg::set) leaves reserved bits as they are.

use core::marker::PhantomData;

use crate::field::FieldSpec;
use crate::register::{Owner, Register, fitted_mask};

/// End of a reserved chain, also the chain of registers without reserved bits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nil;

/// The reserved field `F` of register `R`, holding `DEFAULT`, followed by the chain `Next`.
///
/// `DEFAULT` is given unshifted, like a field value, and must fit the width of `F`.
pub struct Rs<R, F, Next = Nil, const DEFAULT: u64 = 0> {
    _reg: PhantomData<(R, F, Next)>,
}

/// A chain of reserved fields, see the [module documentation](self).
pub trait ReservedChain {
    /// Union of the masks of every node.
    const MASK: u64;

    /// Default values of every node, shifted into place.
    const DEFAULT: u64;

    #[doc(hidden)]
    const OWNER: Owner;
}

impl ReservedChain for Nil {
    const MASK: u64 = 0;
    const DEFAULT: u64 = 0;
    const OWNER: Owner = Owner::Any;
}

const fn checked_default<F: FieldSpec>(default: u64) -> u64 {
    assert!(
        default & !F::LSB_MASK == 0,
        "reserved default does not fit its field"
    );
    default << F::LSB
}

impl<R, F, Next, const DEFAULT: u64> ReservedChain for Rs<R, F, Next, DEFAULT>
where
    R: Register,
    F: FieldSpec,
    Next: ReservedChain,
{
    const MASK: u64 = fitted_mask::<R::Word, F>() | Next::MASK;
    const DEFAULT: u64 = checked_default::<F>(DEFAULT) | Next::DEFAULT;
    const OWNER: Owner = Owner::of::<R>().join(Next::OWNER);
}
