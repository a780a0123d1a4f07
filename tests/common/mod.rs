//! A bus recording every access, backed by a sparse memory local to the test thread.

#![allow(dead_code)]

pub mod peri_crg;

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use reg_field::{Barrier, Bus, RegWord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Load(usize, u64),
    Store(usize, u64),
    Sync(Barrier),
}

#[derive(Default)]
struct State {
    memory: BTreeMap<usize, u64>,
    // values the next loads of an address observe, one per load, modelling hardware state
    scripted: BTreeMap<usize, VecDeque<u64>>,
    log: Vec<Access>,
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::default());
}

pub struct RecordingBus;

impl Bus for RecordingBus {
    unsafe fn load<W: RegWord>(address: usize) -> W {
        STATE.with_borrow_mut(|state| {
            if let Some(next) = state.scripted.get_mut(&address).and_then(VecDeque::pop_front) {
                state.memory.insert(address, next);
            }
            let value = W::from_u64(state.memory.get(&address).copied().unwrap_or(0));
            state.log.push(Access::Load(address, value.into_u64()));
            value
        })
    }

    unsafe fn store<W: RegWord>(address: usize, value: W) {
        STATE.with_borrow_mut(|state| {
            state.memory.insert(address, value.into_u64());
            state.log.push(Access::Store(address, value.into_u64()));
        })
    }

    fn barrier(barrier: Barrier) {
        STATE.with_borrow_mut(|state| state.log.push(Access::Sync(barrier)))
    }
}

impl RecordingBus {
    /// Clears memory, scripts and the log.
    pub fn reset() {
        STATE.with_borrow_mut(|state| *state = State::default());
    }

    /// Presets the value at `address` without logging it.
    pub fn poke(address: usize, value: u64) {
        STATE.with_borrow_mut(|state| {
            state.memory.insert(address, value);
        });
    }

    /// Reads the value at `address` without logging it.
    pub fn peek(address: usize) -> u64 {
        STATE.with_borrow(|state| state.memory.get(&address).copied().unwrap_or(0))
    }

    /// Makes the next loads of `address` observe `values`, one each.
    pub fn script(address: usize, values: impl IntoIterator<Item = u64>) {
        STATE.with_borrow_mut(|state| {
            state.scripted.entry(address).or_default().extend(values);
        });
    }

    /// Returns the log and clears it.
    pub fn take_log() -> Vec<Access> {
        STATE.with_borrow_mut(|state| std::mem::take(&mut state.log))
    }

    /// Bus accesses in the log, barriers left out.
    pub fn take_accesses() -> Vec<Access> {
        Self::take_log()
            .into_iter()
            .filter(|access| !matches!(access, Access::Sync(_)))
            .collect()
    }
}
