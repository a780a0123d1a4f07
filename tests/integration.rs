mod common;

use common::peri_crg::pll_lock_status::{APll, LockState, PllLockStatus, VPll};
use common::peri_crg::soc_clk_sel::{A7Clock, CoreA7ClkSel, DdrClkSel, DdrClock, SocClkSel};
use common::{Access, RecordingBus};
use reg_field::{
    Barrier, Bit, Cached, Field, NoSync, Reg, RegArray, Register, Ro, Rs, Rw, Value, Wo,
};

const CTRL: usize = 0x4000_0000;

#[derive(Register)]
#[register(address = 0x4000_0000, reserved = CtrlReserved, bus = RecordingBus)]
struct Ctrl;

type Enable = Rw<Ctrl, Bit<0>>;
type FieldX = Rw<Ctrl, Field<7, 4, u8>>;
type FieldY = Rw<Ctrl, Field<15, 8, u8>>;
type Status = Ro<Ctrl, Field<19, 16, u8>>;
type CtrlReserved = Rs<Ctrl, Field<31, 28>, reg_field::Nil, 0b0101>;

const INT_CLEAR: usize = 0x4000_0010;

#[derive(Register)]
#[register(address = 0x4000_0010, word = u16, bus = RecordingBus)]
struct IntClear;

type ClearLow = Wo<IntClear, Field<7, 0, u8>>;
type ClearHigh = Wo<IntClear, Field<15, 8, u8>>;

const QUIET: usize = 0x4000_0020;

#[derive(Register)]
#[register(
    address = 0x4000_0020,
    read_sync = NoSync,
    write_sync = NoSync,
    bus = RecordingBus
)]
struct Quiet;

type QuietWhole = Rw<Quiet, Value<u32>>;

const COUNTER: usize = 0x4000_0030;

#[derive(Register)]
#[register(address = 0x4000_0030, word = u64, bus = RecordingBus)]
struct Counter;

type CounterHigh = Rw<Counter, Field<63, 32>>;
type CounterLow = Rw<Counter, Field<31, 0>>;

const BYTE: usize = 0x4000_0040;

#[derive(Register)]
#[register(address = 0x4000_0040, word = u8, bus = RecordingBus)]
struct Byte;

type Nibble = Rw<Byte, Field<7, 4, u8>>;

#[test]
fn round_trip() {
    RecordingBus::reset();

    FieldX::set(0xA);
    assert_eq!(FieldX::get(), 0xA);
    assert_eq!(RecordingBus::peek(CTRL), 0xA0);

    FieldY::set(0x5C);
    assert_eq!(FieldY::get(), 0x5C);
    assert_eq!(FieldX::get(), 0xA);
    assert_eq!(RecordingBus::peek(CTRL), 0x5CA0);
}

#[test]
fn set_drops_bits_beyond_the_field() {
    RecordingBus::reset();

    FieldX::set(0xFF);
    assert_eq!(FieldX::get(), 0xF);
    assert_eq!(RecordingBus::peek(CTRL), 0xF0);
}

#[test]
fn set_is_read_modify_write() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0xFFFF_FFFF);

    FieldY::set(0x12);
    assert_eq!(
        RecordingBus::take_log(),
        [
            Access::Sync(Barrier::Memory),
            Access::Load(CTRL, 0xFFFF_FFFF),
            Access::Store(CTRL, 0xFFFF_12FF),
            Access::Sync(Barrier::DataSync),
        ]
    );
}

#[test]
fn set_leaves_reserved_bits_alone() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0xF000_0000);

    Enable::set(true);
    assert_eq!(RecordingBus::peek(CTRL), 0xF000_0001);
}

#[test]
fn get_reads_once() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0x000A_0000);

    assert_eq!(Status::get(), 0xA);
    assert_eq!(
        RecordingBus::take_log(),
        [
            Access::Sync(Barrier::Memory),
            Access::Load(CTRL, 0x000A_0000)
        ]
    );
}

#[test]
fn whole_register_field_is_stored_without_load() {
    RecordingBus::reset();
    RecordingBus::poke(QUIET, 0x1234_5678);

    QuietWhole::set(0xDEAD_BEEF);
    assert_eq!(
        RecordingBus::take_log(),
        [Access::Store(QUIET, 0xDEAD_BEEF)]
    );

    assert_eq!(QuietWhole::get(), 0xDEAD_BEEF);
    assert_eq!(
        RecordingBus::take_log(),
        [Access::Load(QUIET, 0xDEAD_BEEF)]
    );
}

#[test]
fn write_only_field_is_stored_blindly() {
    RecordingBus::reset();
    RecordingBus::poke(INT_CLEAR, 0xFFFF);

    ClearLow::set(0x5A);
    assert_eq!(
        RecordingBus::take_log(),
        [
            Access::Store(INT_CLEAR, 0x005A),
            Access::Sync(Barrier::DataSync)
        ]
    );
}

#[test]
fn write_only_fields_covering_the_register() {
    RecordingBus::reset();
    RecordingBus::poke(INT_CLEAR, 0xFFFF);

    Reg::<IntClear>::new().write::<(ClearLow, ClearHigh)>((0x34, 0x12));
    assert_eq!(
        RecordingBus::take_accesses(),
        [Access::Store(INT_CLEAR, 0x1234)]
    );
}

#[test]
fn write_merges_fields_and_reserved_defaults() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0xFFFF_FFFF);

    Reg::<Ctrl>::new().write::<(FieldX, FieldY)>((1, 2));
    assert_eq!(
        RecordingBus::take_log(),
        [
            Access::Sync(Barrier::Memory),
            Access::Load(CTRL, 0xFFFF_FFFF),
            Access::Store(CTRL, 0x5FFF_021F),
            Access::Sync(Barrier::DataSync),
        ]
    );
}

#[test]
fn write_is_idempotent() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0x0123_4567);
    let ctrl = Reg::<Ctrl>::new();

    ctrl.write::<(FieldX, Enable)>((0xC, false));
    let once = RecordingBus::peek(CTRL);
    ctrl.write::<(FieldX, Enable)>((0xC, false));
    assert_eq!(RecordingBus::peek(CTRL), once);

    let touched = 0xF000_00F1;
    assert_eq!(once & !touched, 0x0123_4567 & !touched);
}

#[test]
fn write_preserves_bits_outside_its_mask() {
    RecordingBus::reset();
    let ctrl = Reg::<Ctrl>::new();
    let mask = 0xF000_FF00;

    for live in [0, 0x1234_5678, 0xFFFF_FFFF, 0xA5A5_5A5A] {
        RecordingBus::poke(CTRL, live);
        ctrl.write::<FieldY>(0x99);
        let after = RecordingBus::peek(CTRL);
        assert_eq!(after & !mask, live & !mask);
        assert_eq!(after & mask, 0x5000_9900);
    }
}

#[test]
fn reserved_chain_as_list_member() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0xFFFF_FFFF);

    Reg::<Ctrl>::new().write::<(CtrlReserved, Enable)>(((), false));
    assert_eq!(RecordingBus::peek(CTRL), 0x5FFF_FFFE);
}

#[test]
fn read_extracts_from_one_load() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0x5FFF_021F);

    let values = Reg::<Ctrl>::new().read::<(Status, FieldY, FieldX, Enable)>();
    assert_eq!(values, (0xF, 0x02, 0x1, true));
    assert_eq!(
        RecordingBus::take_accesses(),
        [Access::Load(CTRL, 0x5FFF_021F)]
    );
}

#[test]
fn is_equal_compares_reserved_bits() {
    RecordingBus::reset();
    let ctrl = Reg::<Ctrl>::new();

    RecordingBus::poke(CTRL, 0x5000_0210);
    assert!(ctrl.is_equal::<(FieldX, FieldY)>((1, 2)));
    assert!(!ctrl.is_equal::<(FieldX, FieldY)>((1, 3)));
    // status bits are not compared
    RecordingBus::poke(CTRL, 0x500F_0210);
    assert!(ctrl.is_equal::<(FieldX, FieldY)>((1, 2)));
    // reserved bits off their default are
    RecordingBus::poke(CTRL, 0x0000_0210);
    assert!(!ctrl.is_equal::<(FieldX, FieldY)>((1, 2)));
}

#[test]
fn wait_equal_polls_until_locked() {
    RecordingBus::reset();
    let address = PllLockStatus::ADDRESS;
    RecordingBus::script(address, [0b000, 0b000, 0b100, 0b101]);

    Reg::<PllLockStatus>::new().wait_equal::<APll>(LockState::Locked);
    let loads = RecordingBus::take_accesses();
    assert_eq!(loads.len(), 4);
    assert_eq!(loads[3], Access::Load(address, 0b101));

    assert_eq!(
        Reg::<PllLockStatus>::new().read::<(APll, VPll)>(),
        (LockState::Locked, LockState::Locked)
    );
}

#[test]
fn lock_state_with_reserved_bit_set() {
    RecordingBus::reset();
    RecordingBus::poke(PllLockStatus::ADDRESS, 0b111);

    assert_eq!(APll::get(), LockState::Locked);
    assert!(!Reg::<PllLockStatus>::new().is_equal::<APll>(LockState::Locked));
}

#[test]
fn unknown_patterns_decode_to_fallback() {
    RecordingBus::reset();

    RecordingBus::poke(SocClkSel::ADDRESS, 0b011_000);
    assert_eq!(DdrClkSel::get(), DdrClock::Freq300MHz);
    RecordingBus::poke(SocClkSel::ADDRESS, 0b101_000);
    assert_eq!(DdrClkSel::get(), DdrClock::Freq24MHz);

    RecordingBus::poke(SocClkSel::ADDRESS, 0b11);
    assert_eq!(CoreA7ClkSel::get(), A7Clock::Freq600MHz);
    RecordingBus::poke(SocClkSel::ADDRESS, 0b10);
    assert_eq!(CoreA7ClkSel::get(), A7Clock::Reserved);
}

#[test]
fn whole_register_operations() {
    RecordingBus::reset();
    let ctrl = Reg::<Ctrl>::new();

    ctrl.store(0x0000_F00F);
    ctrl.set_bits(0x0000_0FF0);
    assert_eq!(ctrl.load(), 0x0000_FFFF);
    ctrl.clear_bits(0x0000_00FF);
    assert_eq!(ctrl.load(), 0x0000_FF00);
    ctrl.modify(|value| value.rotate_left(8));
    assert_eq!(ctrl.load(), 0x00FF_0000);
}

#[test]
fn cached_handle_stores_once_when_dropped() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0x0000_0001);

    {
        let mut ctrl = Reg::<Ctrl>::new().cached();
        assert_eq!(
            RecordingBus::take_accesses(),
            [Access::Load(CTRL, 0x0000_0001)]
        );

        ctrl.set::<FieldX>(1);
        ctrl.set::<FieldY>(2);
        assert_eq!(ctrl.get::<FieldX>(), 1);
        assert_eq!(ctrl.value(), 0x0000_0211);
        assert!(RecordingBus::take_log().is_empty());
        assert_eq!(RecordingBus::peek(CTRL), 0x0000_0001);
    }

    assert_eq!(
        RecordingBus::take_log(),
        [
            Access::Store(CTRL, 0x0000_0211),
            Access::Sync(Barrier::DataSync)
        ]
    );
}

#[test]
fn cached_handle_stores_on_unwind() {
    RecordingBus::reset();

    let result = std::panic::catch_unwind(|| {
        let mut ctrl = Cached::<Ctrl>::new();
        ctrl.set::<FieldY>(0x7F);
        panic!("bring-up failed");
    });

    assert!(result.is_err());
    assert_eq!(RecordingBus::peek(CTRL), 0x7F00);
}

#[test]
fn cached_write_rewrites_reserved() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0xFFFF_FFFF);

    Cached::<Ctrl>::new().write::<Enable>(false);
    assert_eq!(RecordingBus::peek(CTRL), 0x5FFF_FFFE);
}

#[test]
fn shadow_checkout_and_commit() {
    RecordingBus::reset();
    RecordingBus::poke(CTRL, 0x10);

    let mut shadow = Reg::<Ctrl>::new().checkout();
    assert_eq!(
        RecordingBus::take_log(),
        [Access::Sync(Barrier::Memory), Access::Load(CTRL, 0x10)]
    );

    shadow.set::<FieldY>(2);
    shadow.write::<(FieldX, Enable)>((3, true));
    assert_eq!(shadow.read::<(FieldX, FieldY)>(), (3, 2));
    assert_eq!(shadow.value(), 0x5000_0231);
    assert!(RecordingBus::take_log().is_empty());

    shadow.commit();
    assert_eq!(
        RecordingBus::take_accesses(),
        [Access::Store(CTRL, 0x5000_0231)]
    );

    RecordingBus::poke(CTRL, 0);
    shadow.checkout();
    assert_eq!(shadow.get::<FieldX>(), 0);
    shadow.set_value(0x40);
    shadow.commit();
    assert_eq!(RecordingBus::peek(CTRL), 0x40);
}

#[test]
fn handle_at_another_address() {
    RecordingBus::reset();
    let other = 0x5000_0000;

    // SAFETY: the recording bus accepts any address
    let reg = unsafe { Reg::<Ctrl>::at(other) };
    assert_eq!(reg.address(), other);
    reg.set::<FieldX>(3);
    assert_eq!(RecordingBus::peek(other), 0x30);
    assert_eq!(RecordingBus::peek(CTRL), 0);
}

#[test]
fn handle_at_index() {
    // SAFETY: the recording bus accepts any address
    unsafe {
        assert_eq!(Reg::<Ctrl>::at_index(0x5000_0000, 3).address(), 0x5000_000C);
        assert_eq!(Reg::<IntClear>::at_index(0x5000_0000, 3).address(), 0x5000_0006);
        assert_eq!(Reg::<Counter>::at_index(0x5000_0000, 3).address(), 0x5000_0018);
    }
    assert_eq!(Reg::<Ctrl>::new().size(), 4);
    assert_eq!(Reg::<IntClear>::new().size(), 2);
    assert_eq!(Reg::<Byte>::new().size(), 1);
}

#[test]
fn array_of_registers() {
    RecordingBus::reset();
    // SAFETY: the recording bus accepts any address
    let ctrls = unsafe { RegArray::<Ctrl, 4>::new() };
    assert_eq!(ctrls.len(), 4);
    assert_eq!(ctrls.iter().len(), 4);

    for (i, ctrl) in ctrls.iter().enumerate() {
        ctrl.set::<FieldY>(i as u8 + 1);
    }
    for i in 0..4 {
        assert_eq!(RecordingBus::peek(CTRL + 4 * i), (i as u64 + 1) << 8);
        assert_eq!(ctrls.idx(i).get::<FieldY>(), i as u8 + 1);
    }

    let addresses: Vec<_> = ctrls.iter_slice(1, 3).rev().map(|r| r.address()).collect();
    assert_eq!(addresses, [CTRL + 8, CTRL + 4]);
    assert_eq!(ctrls.iter().nth(2).map(|r| r.address()), Some(CTRL + 8));
    assert_eq!(ctrls.iter().last().map(|r| r.address()), Some(CTRL + 12));
    assert!(ctrls.iter_slice(2, 2).next().is_none());
}

#[test]
#[should_panic(expected = "register index out of bounds")]
fn array_index_out_of_bounds() {
    // SAFETY: the recording bus accepts any address
    let ctrls = unsafe { RegArray::<Ctrl, 4>::new() };
    ctrls.idx(4);
}

#[test]
#[should_panic(expected = "register slice end out of bounds")]
fn array_slice_out_of_bounds() {
    // SAFETY: the recording bus accepts any address
    let ctrls = unsafe { RegArray::<Ctrl, 4>::new() };
    let _ = ctrls.iter_slice(2, 5);
}

#[test]
fn wide_register() {
    RecordingBus::reset();

    CounterHigh::set(0xDEAD_BEEF);
    CounterLow::set(1);
    assert_eq!(RecordingBus::peek(COUNTER), 0xDEAD_BEEF_0000_0001);
    assert_eq!(Reg::<Counter>::new().load(), 0xDEAD_BEEF_0000_0001);
    assert_eq!(
        Reg::<Counter>::new().read::<(CounterLow, CounterHigh)>(),
        (1, 0xDEAD_BEEF)
    );
}

#[test]
fn narrow_register() {
    RecordingBus::reset();
    let byte = Reg::<Byte>::new();

    byte.store(0xA5);
    assert_eq!(Nibble::get(), 0xA);
    Nibble::set(0x3);
    assert_eq!(byte.load(), 0x35);
    assert_eq!(RecordingBus::peek(BYTE), 0x35);
}

mod masks {
    use crate::common::{Access, RecordingBus};
    use reg_field::{Bit, Cached, Field, FieldValue, Reg, Register, Ro, Rw, Value, Wo};

    const LOCKED: usize = 0x4000_0050;

    #[derive(Register)]
    #[register(
        address = 0x4000_0050,
        read_and = 0xFFFF,
        write_and = !0x1,
        write_or = 0x5A5A_0000,
        bus = RecordingBus
    )]
    struct Locked;

    type Mode = Rw<Locked, Field<7, 4, u8>>;

    #[derive(Register)]
    #[register(address = 0x4000_0054, read_or = 0x8000_0000, bus = RecordingBus)]
    struct Sticky;

    type Ready = Ro<Sticky, Bit<31>>;
    type Level = Ro<Sticky, Field<7, 0, u8>>;

    const DOORBELL: usize = 0x4000_0060;

    #[derive(Register)]
    #[register(address = 0x4000_0060, readable = false, bus = RecordingBus)]
    struct Doorbell;

    type Ring = Wo<Doorbell, Value<u32>>;
    type Channel = Wo<Doorbell, Field<31, 24, u8>>;
    type Payload = Wo<Doorbell, Field<23, 0>>;

    const STATUS: usize = 0x4000_0070;

    #[derive(Register)]
    #[register(address = 0x4000_0070, writable = false, bus = RecordingBus)]
    struct Status;

    type Count = Ro<Status, Field<7, 0, u8>>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
    enum Only {
        Enabled,
    }

    #[derive(Register)]
    #[register(address = 0x4000_0080, word = u8, bus = RecordingBus)]
    struct Switch;

    type Always = Rw<Switch, Bit<0, Only>>;

    #[test]
    fn masks_apply_to_field_access() {
        RecordingBus::reset();
        RecordingBus::poke(LOCKED, 0xFFFF_FFF1);

        Mode::set(2);
        assert_eq!(
            RecordingBus::take_accesses(),
            [
                Access::Load(LOCKED, 0xFFFF_FFF1),
                Access::Store(LOCKED, 0x5A5A_FF20)
            ]
        );
        assert_eq!(Mode::get(), 2);
        assert_eq!(Reg::<Locked>::new().load(), 0xFF20);
    }

    #[test]
    fn masks_apply_to_whole_register_access() {
        RecordingBus::reset();
        let locked = Reg::<Locked>::new();

        locked.store(0x0000_0001);
        assert_eq!(RecordingBus::peek(LOCKED), 0x5A5A_0000);
        locked.modify(|value| value | 0x3);
        assert_eq!(RecordingBus::peek(LOCKED), 0x5A5A_0002);
        locked.write::<Mode>(0xF);
        assert_eq!(RecordingBus::peek(LOCKED), 0x5A5A_00F2);
    }

    #[test]
    fn masks_apply_at_checkout_and_commit() {
        RecordingBus::reset();
        RecordingBus::poke(LOCKED, 0xFFFF_FFFF);

        {
            let mut locked = Cached::<Locked>::new();
            assert_eq!(locked.value(), 0xFFFF);
            locked.set::<Mode>(0);
        }
        assert_eq!(RecordingBus::peek(LOCKED), 0x5A5A_FF0E);
    }

    #[test]
    fn read_or_forces_bits() {
        RecordingBus::reset();
        RecordingBus::poke(0x4000_0054, 0x0000_0007);

        assert!(Ready::get());
        assert_eq!(Level::get(), 7);
        assert!(Reg::<Sticky>::new().is_equal::<(Ready, Level)>((true, 7)));
    }

    #[test]
    fn unreadable_register_is_only_stored() {
        RecordingBus::reset();
        let doorbell = Reg::<Doorbell>::new();

        Ring::set(0x42);
        doorbell.write::<(Channel, Payload)>((3, 0x1234));
        doorbell.store(0x0100_0000);
        assert_eq!(
            RecordingBus::take_accesses(),
            [
                Access::Store(DOORBELL, 0x42),
                Access::Store(DOORBELL, 0x0300_1234),
                Access::Store(DOORBELL, 0x0100_0000)
            ]
        );
    }

    #[test]
    fn unwritable_register_is_only_loaded() {
        RecordingBus::reset();
        RecordingBus::poke(STATUS, 0x0000_0110);

        assert_eq!(Count::get(), 0x10);
        assert_eq!(Reg::<Status>::new().load(), 0x110);
        assert!(Reg::<Status>::new().is_equal::<Count>(0x10));
        assert_eq!(
            RecordingBus::take_accesses(),
            [
                Access::Load(STATUS, 0x110),
                Access::Load(STATUS, 0x110),
                Access::Load(STATUS, 0x110)
            ]
        );
    }

    #[test]
    fn single_variant_enum_takes_one_bit() {
        RecordingBus::reset();
        RecordingBus::poke(0x4000_0080, 0xFF);

        assert_eq!(<Only as FieldValue>::BITS, 1);
        Always::set(Only::Enabled);
        assert_eq!(RecordingBus::peek(0x4000_0080), 0xFE);
        assert_eq!(Always::get(), Only::Enabled);
    }
}

mod mmio {
    use reg_field::{Bit, Field, Reg, Register, Rw};

    #[derive(Register)]
    #[register(address = 0x4000_0000)]
    struct Host;

    type Ready = Rw<Host, Bit<31>>;
    type Count = Rw<Host, Field<15, 0, u16>>;

    #[test]
    fn host_memory() {
        let mut words = [0u32; 4];
        let base = words.as_mut_ptr() as usize;

        // SAFETY: `words` outlives the handle and is aligned for u32
        let reg = unsafe { Reg::<Host>::at_index(base, 2) };
        reg.set::<Count>(0x1234);
        reg.set::<Ready>(true);
        assert_eq!(reg.get::<Count>(), 0x1234);
        assert!(reg.get::<Ready>());
        reg.write::<(Ready, Count)>((false, 7));

        assert_eq!(words, [0, 0, 7, 0]);
    }
}
