//! Synchronization policies and the barrier primitives behind them.
//!
//! Every register description names two policies: one applied before each load
//! ([`Register::ReadSync`](crate::Register::ReadSync)) and one applied after each store
//! ([`Register::WriteSync`](crate::Register::WriteSync)). A policy has two parts:
//! - **CPU**: a memory barrier instruction. Before a load this is a data memory barrier (`dmb`),
//!   after a store a data synchronization barrier (`dsb`).
//! - **cache**: cache-line maintenance for non-coherent mappings. This is not implemented, and
//!   any register that asks for it fails to build:
//!
//! ```compile_fail
//! use reg_field::{CacheSync, Register, Reg};
//!
//! #[derive(Register)]
//! #[register(address = 0x4000_0000, write_sync = CacheSync)]
//! struct Cached;
//!
//! Reg::<Cached>::new().store(0);
//! ```
//!
//! Device memory attributes (strongly-ordered / device mappings) are expected to be established
//! by the memory map configuration outside of this crate.

use core::fmt::Debug;

/// A barrier instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Barrier {
    /// Data memory barrier: orders memory accesses before and after it.
    Memory,
    /// Data synchronization barrier: completes all prior memory accesses before continuing.
    DataSync,
}

impl Barrier {
    /// Issues the barrier on the executing core.
    ///
    /// On ARM targets this is the `dmb sy` / `dsb sy` instruction. Elsewhere, e.g. on a host
    /// running tests, both degrade to a sequentially consistent fence.
    #[inline(always)]
    pub fn issue(self) {
        #[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
        match self {
            // SAFETY: barrier instructions have no operands and no side effects beyond ordering
            Barrier::Memory => unsafe {
                core::arch::asm!("dmb sy", options(nostack, preserves_flags))
            },
            Barrier::DataSync => unsafe {
                core::arch::asm!("dsb sy", options(nostack, preserves_flags))
            },
        }
        #[cfg(not(any(target_arch = "arm", target_arch = "aarch64")))]
        {
            let _ = self;
            core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
        }
    }
}

/// A synchronization policy, see the [module documentation](self).
///
/// ⚠️ This trait is sealed and cannot be implemented for types outside of this crate.
pub trait SyncPolicy: Debug + Default + Copy + Send + Sync + 'static + private::Sealed {
    /// Issue a CPU barrier.
    const CPU: bool;
    /// Perform cache maintenance.
    const CACHE: bool;
}

/// Synchronization policy with the given CPU and cache parts.
///
/// Use one of the aliases [`NoSync`], [`CpuSync`] or [`CacheSync`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Barriers<const CPU: bool, const CACHE: bool> {}

/// No synchronization.
pub type NoSync = Barriers<false, false>;

/// CPU barrier only. This is the default for both loads and stores.
pub type CpuSync = Barriers<true, false>;

/// CPU barrier and cache maintenance. Not implemented: registers using it fail to build.
pub type CacheSync = Barriers<true, true>;

impl<const CPU: bool, const CACHE: bool> SyncPolicy for Barriers<CPU, CACHE> {
    const CPU: bool = CPU;
    const CACHE: bool = CACHE;
}

/// Rejects unimplemented parts of a policy. Must be evaluated in constant context.
pub(crate) const fn check<S: SyncPolicy>() {
    assert!(!S::CACHE, "cache synchronization is not implemented");
}

mod private {
    pub trait Sealed {}
    impl<const CPU: bool, const CACHE: bool> Sealed for super::Barriers<CPU, CACHE> {}
}
