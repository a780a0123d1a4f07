//! Backends performing the actual loads and stores of register words.
//!
//! The default backend, [`Mmio`], dereferences the register address with volatile semantics. Other
//! backends implement [`Bus`] to route register accesses elsewhere, e.g. to a model of a
//! peripheral when testing on a host.

use crate::integers::RegWord;
use crate::register::Register;
use crate::sync::{self, Barrier, SyncPolicy};

/// A mechanism to load and store register words at an address.
pub trait Bus: 'static {
    /// Loads the register word at `address`.
    ///
    /// # Safety
    /// `address` must be valid for a volatile read of a `W` and properly aligned.
    unsafe fn load<W: RegWord>(address: usize) -> W;

    /// Stores the register word `value` at `address`.
    ///
    /// # Safety
    /// `address` must be valid for a volatile write of a `W` and properly aligned.
    unsafe fn store<W: RegWord>(address: usize, value: W);

    /// Issues `barrier`. Called only when the register's synchronization policy asks for it.
    #[inline(always)]
    fn barrier(barrier: Barrier) {
        barrier.issue();
    }
}

/// Memory-mapped IO: volatile loads and stores through a raw pointer.
///
/// With the crate feature `debug-trace` every access is printed to standard error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mmio;

impl Bus for Mmio {
    #[inline(always)]
    unsafe fn load<W: RegWord>(address: usize) -> W {
        // SAFETY: the caller promises `address` is valid for reads
        let value = unsafe { core::ptr::read_volatile(address as *const W) };
        #[cfg(feature = "debug-trace")]
        std::eprintln!("REG-FIELD LOAD  {address:#x} {:#x}", value.into_u64());
        value
    }

    #[inline(always)]
    unsafe fn store<W: RegWord>(address: usize, value: W) {
        #[cfg(feature = "debug-trace")]
        std::eprintln!("REG-FIELD STORE {address:#x} {:#x}", value.into_u64());
        // SAFETY: the caller promises `address` is valid for writes
        unsafe { core::ptr::write_volatile(address as *mut W, value) }
    }

    #[inline(always)]
    fn barrier(barrier: Barrier) {
        #[cfg(feature = "debug-trace")]
        std::eprintln!("REG-FIELD SYNC  {barrier:?}");
        barrier.issue();
    }
}

/// Loads the word of `R` at `address`, preceded by the pre-read barrier, with the read masks of
/// `R` applied.
///
/// # Safety
/// `address` must hold a register described by `R`.
#[inline(always)]
pub(crate) unsafe fn load<R: Register>(address: usize) -> u64 {
    const { assert!(R::READABLE, "register is not readable") };
    // SAFETY: forwarded to the caller
    unsafe { load_unchecked::<R>(address) }
}

/// [`load`] without the readable check, for paths that load only when the register is readable.
/// Callers must check it themselves.
///
/// # Safety
/// `address` must hold a register described by `R`.
#[inline(always)]
pub(crate) unsafe fn load_unchecked<R: Register>(address: usize) -> u64 {
    const { sync::check::<R::ReadSync>() };
    if R::ReadSync::CPU {
        R::Bus::barrier(Barrier::Memory);
    }
    // SAFETY: forwarded to the caller
    let raw = unsafe { R::Bus::load::<R::Word>(address) }.into_u64();
    ((raw & R::READ_AND) | R::READ_OR) & <R::Word as RegWord>::FULL
}

/// Stores `raw` narrowed to the word of `R` at `address`, with the write masks of `R` applied,
/// followed by the post-write barrier.
///
/// # Safety
/// `address` must hold a register described by `R`.
#[inline(always)]
pub(crate) unsafe fn store<R: Register>(address: usize, raw: u64) {
    const {
        assert!(R::WRITABLE, "register is not writable");
        sync::check::<R::WriteSync>();
    };
    let raw = (raw & R::WRITE_AND) | R::WRITE_OR;
    // SAFETY: forwarded to the caller
    unsafe { R::Bus::store::<R::Word>(address, R::Word::from_u64(raw)) };
    if R::WriteSync::CPU {
        R::Bus::barrier(Barrier::DataSync);
    }
}
