//! Helper types and traits to define read/write permissions on register fields.

use core::fmt::Debug;
use core::hash::Hash;

/// Capability of a field, as a value.
///
/// Reserved ranges have no access mode, they are described by [`Rs`](crate::Rs) chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessMode {
    /// The field can only be read.
    ReadOnly,
    /// The field can only be written; the register is never read on its behalf.
    WriteOnly,
    /// The field can be read and written.
    ReadWrite,
}

/// A zero-sized type indicating that a field provides only read access.
///
/// Implements the [`Readable`] trait.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadOnly {}

/// A zero-sized type indicating that a field provides only write access.
///
/// Implements the [`Writable`] trait.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WriteOnly {}

/// A zero-sized type indicating that a field provides both read and write access.
///
/// Implements the [`Readable`] and [`Writable`] traits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadWrite {}

/// Marker trait required by traits [`Readable`] and [`Writable`];
///
/// ⚠️ This trait is sealed and cannot be implemented for types outside of this crate.
pub trait Access:
    Debug + Default + Copy + Eq + Ord + Hash + Sized + Send + Sync + 'static + private::Sealed
{
    /// The capability as a value.
    const MODE: AccessMode;
}

/// Marker trait for readable fields implemented by types [`ReadOnly`] and [`ReadWrite`].
///
/// ⚠️ This trait is sealed and cannot be implemented for types outside of this crate.
#[diagnostic::on_unimplemented(
    message = "cannot read from a write-only field",
    label = "method cannot be called on write-only fields",
    note = "the field is write only because it was declared as `Wo<..>` in the register
  description"
)]
pub trait Readable: Access {}

/// Marker trait for writable fields implemented by types [`WriteOnly`] and [`ReadWrite`].
///
/// ⚠️ This trait is sealed and cannot be implemented for types outside of this crate.
#[diagnostic::on_unimplemented(
    message = "cannot write to a read-only field",
    label = "method cannot be called on read-only fields",
    note = "the field is read only because it was declared as `Ro<..>` in the register
  description"
)]
pub trait Writable: Access {}

impl Access for ReadOnly {
    const MODE: AccessMode = AccessMode::ReadOnly;
}
impl Access for WriteOnly {
    const MODE: AccessMode = AccessMode::WriteOnly;
}
impl Access for ReadWrite {
    const MODE: AccessMode = AccessMode::ReadWrite;
}
impl Readable for ReadOnly {}
impl Readable for ReadWrite {}
impl Writable for WriteOnly {}
impl Writable for ReadWrite {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::ReadOnly {}
    impl Sealed for super::WriteOnly {}
    impl Sealed for super::ReadWrite {}
}
