//! Type-checked access to the bit fields of memory-mapped registers.
//!
//! A register is described once, as a unit struct deriving [`Register`] plus type aliases for its
//! fields. All masks are computed at compile time, accesses compile down to volatile loads and
//! stores with the configured memory barriers around them, and misuse (writing a read-only field,
//! a field that does not fit its register, a field of another register) fails to build.
//!
//! **Table of contents**
//! - [Basic usage](#basic-usage)
//! - [Describing registers](#describing-registers)
//!   - [Fields](#fields)
//!   - [Field values](#field-values)
//!   - [Reserved bits](#reserved-bits)
//! - [Access permissions](#access-permissions)
//! - [Accessing registers](#accessing-registers)
//!   - [Single fields](#single-fields)
//!   - [Several fields at once](#several-fields-at-once)
//!   - [Shadow copies](#shadow-copies)
//!   - [Addresses and arrays](#addresses-and-arrays)
//! - [Synchronization](#synchronization)
//! - [Buses](#buses)
//! - [Thread safety](#thread-safety)
//! - [Crate features](#crate-features)
//! - [Compile-time errors](#compile-time-errors)
//!
//! # Basic usage
//!
//! ```rust
//! use reg_field::{Bit, Field, FieldValue, Reg, Register, Rs, Rw};
//! # use reg_field::{Barrier, Bus, RegWord};
//! # use std::cell::Cell;
//! # thread_local!(static MEM: Cell<u64> = Cell::new(0));
//! # struct Memory;
//! # impl Bus for Memory {
//! #     unsafe fn load<W: RegWord>(_: usize) -> W { W::from_u64(MEM.get()) }
//! #     unsafe fn store<W: RegWord>(_: usize, v: W) { MEM.set(v.into_u64()) }
//! #     fn barrier(_: Barrier) {}
//! # }
//!
//! // APLL configuration register 1 of a HiSilicon Hi3516EV200
//! #[derive(Register)]
//! #[register(address = 0x1201_0004, reserved = Reserved)]
//! # #[register(bus = Memory)]
//! struct PllConfig1;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
//! enum Mode {
//!     Fractional,
//!     Integer,
//! }
//!
//! type Bypass = Rw<PllConfig1, Bit<26>>;
//! type FracMode = Rw<PllConfig1, Bit<24, Mode>>;
//! type Refdiv = Rw<PllConfig1, Field<17, 12, u8>>;
//! type FBdiv = Rw<PllConfig1, Field<11, 0, u16>>;
//! type Reserved = Rs<PllConfig1, Field<19, 18>, Rs<PllConfig1, Field<31, 27>>>;
//!
//! // single fields, each one a read-modify-write
//! Bypass::set(true);
//! assert!(Bypass::get());
//!
//! // several fields with one read-modify-write
//! let pll = Reg::<PllConfig1>::new();
//! pll.write::<(Bypass, FracMode, Refdiv, FBdiv)>((false, Mode::Integer, 1, 75));
//! assert_eq!(pll.load(), 0x0100_104B);
//! assert_eq!(pll.read::<(FracMode, FBdiv)>(), (Mode::Integer, 75));
//! ```
//!
//! # Describing registers
//!
//! The derive macro [`Register`] implements the trait [`Register`](trait@Register) on a unit
//! struct. It takes its configuration from the `#[register(...)]` attribute:
//!
//! | key          | value                                      | default   |
//! |--------------|--------------------------------------------|-----------|
//! | `address`    | address of the register, a `usize`         | required  |
//! | `word`       | storage word: `u8`, `u16`, `u32` or `u64`  | `u32`     |
//! | `read_sync`  | policy before loads, see [`sync`]          | [`CpuSync`] |
//! | `write_sync` | policy after stores, see [`sync`]          | [`CpuSync`] |
//! | `reserved`   | reserved chain, see [`reserved`]           | [`Nil`]   |
//! | `bus`        | backend performing accesses, see [`bus`]   | [`Mmio`]  |
//! | `readable`   | whether the register may be loaded         | `true`    |
//! | `writable`   | whether the register may be stored         | `true`    |
//! | `read_and`   | mask ANDed into every loaded word          | all ones  |
//! | `read_or`    | bits ORed into every loaded word           | `0`       |
//! | `write_and`  | mask ANDed into every stored word          | all ones  |
//! | `write_or`   | bits ORed into every stored word           | `0`       |
//!
//! Deriving [`Register`] asserts that the address is valid for volatile accesses of the given
//! width for the whole program, that is the safety contract of the
//! [`Register`](trait@Register) trait.
//!
//! ## Fields
//!
//! A field is a contiguous bit range `[MSB:LSB]`, described by [`Field<MSB, LSB, V>`](Field)
//! where `V` is the type it is read and written as, `u32` by default. [`Bit<N, V>`](Bit) is a
//! one-bit field, read as a `bool` by default. [`Value<W>`](Value) spans the whole word.
//!
//! Masks are available as constants through the trait [`FieldSpec`].
//!
//! ## Field values
//!
//! Fields can be read and written as `bool`, as an unsigned integer, or as a fieldless enum
//! deriving [`FieldValue`]. Values are converted bit-exactly: `value as u64`, masked to the field
//! width, shifted into place. A register holding a bit pattern that matches no variant decodes to
//! the variant marked `#[field_value(other)]`, or to the first variant if none is marked:
//! ```
//! use reg_field::FieldValue;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
//! #[repr(u8)]
//! enum DdrClock {
//!     Freq24MHz = 0,
//!     Freq300MHz = 3,
//!     #[field_value(other)]
//!     Unknown = 7,
//! }
//!
//! assert_eq!(DdrClock::from_bits(3), DdrClock::Freq300MHz);
//! assert_eq!(DdrClock::from_bits(5), DdrClock::Unknown);
//! assert_eq!(DdrClock::Freq300MHz.into_bits(), 3);
//! ```
//!
//! ## Reserved bits
//!
//! Bits the hardware documentation marks as reserved are listed in a chain of [`Rs`] nodes named
//! by the `reserved` key. Every multi-field write rewrites them with their defaults. See the
//! [`reserved`] module.
//!
//! ## Register permissions and masks
//!
//! `readable = false` and `writable = false` forbid every load, respectively every store, of a
//! register, whatever the permissions of its fields. Any operation needing one fails to build:
//! ```compile_fail
//! use reg_field::{Field, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0010, readable = false)]
//! struct IntClear;
//!
//! type Mask = Rw<IntClear, Field<7, 0, u8>>;
//! Mask::set(1); // register is not readable, the read-modify-write needs a load
//! ```
//! ```compile_fail
//! use reg_field::{Reg, Register};
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_01E8, writable = false)]
//! struct PllLockStatus;
//!
//! Reg::<PllLockStatus>::new().store(0); // register is not writable
//! ```
//!
//! The mask keys force bit patterns on every access of the register, whichever operation
//! performs it: loaded words are ANDed with `read_and` then ORed with `read_or` before any field
//! is extracted, and stored words are ANDed with `write_and` then ORed with `write_or`. They are
//! typed as the register word:
//! ```
//! use reg_field::{Field, Reg, Register, Rw};
//! # use reg_field::{Barrier, Bus, RegWord};
//! # use std::cell::Cell;
//! # thread_local!(static MEM: Cell<u64> = Cell::new(0xFFFF_FFF1));
//! # struct Memory;
//! # impl Bus for Memory {
//! #     unsafe fn load<W: RegWord>(_: usize) -> W { W::from_u64(MEM.get()) }
//! #     unsafe fn store<W: RegWord>(_: usize, v: W) { MEM.set(v.into_u64()) }
//! #     fn barrier(_: Barrier) {}
//! # }
//!
//! // the upper half reads as garbage and must hold the unlock key on writes,
//! // bit 0 clears on writing one
//! #[derive(Register)]
//! #[register(address = 0x4000_0050, read_and = 0xFFFF, write_and = !0x1, write_or = 0x5A5A_0000)]
//! # #[register(bus = Memory)]
//! struct Locked;
//!
//! type Mode = Rw<Locked, Field<7, 4, u8>>;
//!
//! Mode::set(2);
//! # assert_eq!(MEM.get(), 0x5A5A_FF20);
//! assert_eq!(Reg::<Locked>::new().load(), 0xFF20);
//! ```
//!
//! # Access permissions
//!
//! A field is bound to its register with an access permission through one of the aliases
//! - [`Rw<R, F>`](Rw) for read-write fields;
//! - [`Ro<R, F>`](Ro) for read-only fields;
//! - [`Wo<R, F>`](Wo) for write-only fields.
//!
//! Permissions are implemented through the zero-sized structs [`ReadOnly`](access::ReadOnly),
//! [`WriteOnly`](access::WriteOnly) and [`ReadWrite`](access::ReadWrite), checked at compile
//! time by the bounds [`Readable`](access::Readable) and [`Writable`](access::Writable).
//!
//! Write-only registers are never read: setting a write-only field stores it with every other bit
//! cleared, and a multi-field write involving one must cover the whole register.
//!
//! # Accessing registers
//!
//! ## Single fields
//!
//! [`Bound::get`] loads the register and extracts the field. [`Bound::set`] loads the register,
//! replaces the field and stores it back; when the field spans the whole register, or when it is
//! write-only, the load is skipped. The same operations exist on handles, [`Reg::get`] and
//! [`Reg::set`], and on whole registers: [`Reg::load`], [`Reg::store`], [`Reg::set_bits`],
//! [`Reg::clear_bits`] and [`Reg::modify`].
//!
//! ## Several fields at once
//!
//! [`Reg::write`] takes a list of fields, as a tuple, and their values:
//! - the masks of the fields and of the reserved chain are joined at compile time;
//! - when they cover the whole register, the composed value is stored without loading;
//! - otherwise the register is loaded once, the masked bits replaced, and stored once.
//!
//! [`Reg::read`] extracts a tuple of fields from one load, [`Reg::is_equal`] compares them with
//! one load, and [`Reg::wait_equal`] busy-waits on [`Reg::is_equal`]. See the [`compose`]
//! module.
//!
//! ## Shadow copies
//!
//! [`Reg::checkout`] loads the register into a [`Shadow`]: fields are then read and written on
//! the copy without any bus access, until [`Shadow::commit`] stores it. [`Reg::cached`] returns a
//! [`Cached`] copy that commits itself when dropped, so that any number of field changes cost
//! one load and one store:
//! ```
//! # use reg_field::{Bit, Field, Reg, Register, Rw};
//! # use reg_field::{Barrier, Bus, RegWord};
//! # use std::cell::Cell;
//! # thread_local!(static MEM: Cell<u64> = Cell::new(0));
//! # struct Memory;
//! # impl Bus for Memory {
//! #     unsafe fn load<W: RegWord>(_: usize) -> W { W::from_u64(MEM.get()) }
//! #     unsafe fn store<W: RegWord>(_: usize, v: W) { MEM.set(v.into_u64()) }
//! #     fn barrier(_: Barrier) {}
//! # }
//! # #[derive(Register)]
//! # #[register(address = 0x1201_0004, bus = Memory)]
//! # struct PllConfig1;
//! # type Bypass = Rw<PllConfig1, Bit<26>>;
//! # type Refdiv = Rw<PllConfig1, Field<17, 12, u8>>;
//! {
//!     let mut pll = Reg::<PllConfig1>::new().cached();
//!     pll.set::<Bypass>(true);
//!     pll.set::<Refdiv>(pll.get::<Refdiv>() + 1);
//!     // nothing stored yet
//! #   assert_eq!(MEM.get(), 0);
//! } // stored here
//! # assert_eq!(MEM.get(), 0x0400_1000);
//! ```
//!
//! ## Addresses and arrays
//!
//! [`Reg::new`] uses the address of the description. [`Reg::at`] and [`Reg::at_index`] apply the
//! description to another address, and [`RegArray`] to `N` consecutive registers.
//!
//! # Synchronization
//!
//! Loads are preceded by the read barrier and stores followed by the write barrier of the
//! register, see the [`sync`] module. Shadow copies issue them only at checkout and commit.
//!
//! # Buses
//!
//! The `bus` key routes the accesses of a register through a [`Bus`] implementation. The default
//! [`Mmio`] performs volatile loads and stores. Other implementations can e.g. model a peripheral
//! on the host to test drivers, see the [`bus`] module.
//!
//! # Thread safety
//!
//! Volatile accesses are not atomic. Nothing in this crate serializes accesses to a register:
//! two read-modify-writes, or two shadow copies, of the same register racing each other lose
//! updates. Serializing them, e.g. by owning the register from a single context, is up to the
//! caller.
//!
//! # Crate features
//!
//! By default, no features are enabled. These features exist:
//!
//! - **std** -
//!   When enabled, this will cause `reg-field` to use the standard library. Currently, this
//!   feature is only used as a dependency of other features.
//!
//! - **debug-trace** -
//!   When enabled, every load, store and barrier of the [`Mmio`] bus prints a debug trace to
//!   standard error. Depends on feature `std`. For example, the code
//!   ```ignore
//!   Refdiv::set(1);
//!   ```
//!   might print something like
//!   ```text
//!   REG-FIELD SYNC  Memory
//!   REG-FIELD LOAD  0x12010004 0x2000000
//!   REG-FIELD STORE 0x12010004 0x2001000
//!   REG-FIELD SYNC  DataSync
//!   ```
//!   Note that this feature only works on targets that support `std`, and that printing to
//!   standard error for every register access might heavily impact performance.
//!
//! # Compile-time errors
//!
//! Layout violations fail to build:
//! ```compile_fail
//! use reg_field::{Field, FieldSpec};
//!
//! type Backwards = Field<3, 5, u8>;
//! let _ = Backwards::MASK; // field msb is below its lsb
//! ```
//! ```compile_fail
//! use reg_field::{Field, FieldSpec};
//!
//! type TooWide = Field<11, 0, u8>;
//! let _ = TooWide::MASK; // field is wider than its value type
//! ```
//! ```compile_fail
//! use reg_field::{Field, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0000, word = u8)]
//! struct Narrow;
//!
//! type Wide = Rw<Narrow, Field<11, 0, u16>>;
//! Wide::set(1); // field does not fit in the register
//! ```
//!
//! So does using a field with the handle of another register:
//! ```compile_fail
//! use reg_field::{Bit, Reg, Register, Rw};
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0000)]
//! struct PllConfig0;
//!
//! #[derive(Register)]
//! #[register(address = 0x1201_0004)]
//! struct PllConfig1;
//!
//! type Bypass = Rw<PllConfig1, Bit<26>>;
//! Reg::<PllConfig0>::new().set::<Bypass>(true); // field does not belong to this register
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// Derive macro implementing [`Register`](trait@Register) on a unit struct.
///
/// See the [top-level documentation](crate#describing-registers) for the attribute keys.
pub use reg_field_derive::Register;

/// Derive macro implementing [`FieldValue`](trait@FieldValue) on a fieldless enum.
///
/// See the [top-level documentation](crate#field-values) for usage information.
pub use reg_field_derive::FieldValue;

pub mod access;

mod arr;
pub use arr::RegArray;

mod bounds;

pub mod bus;
pub use bus::{Bus, Mmio};

pub mod compose;
pub use compose::{CompareList, ReadList, WriteList};

mod field;
pub use field::{Bit, Field, FieldSpec, Value, lsb_mask};

mod handle;
pub use handle::{Cached, Reg, Shadow};

pub mod integers;
pub use integers::{FieldValue, RegWord};

mod iter;

mod register;
pub use register::{Bound, BoundField, Register, Ro, Rw, Wo};

pub mod reserved;
pub use reserved::{Nil, ReservedChain, Rs};

pub mod sync;
pub use sync::{Barrier, Barriers, CacheSync, CpuSync, NoSync, SyncPolicy};
