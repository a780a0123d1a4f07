//! Part of the clock and reset generator (PERI_CRG) of the HiSilicon Hi3516EV200.

use reg_field::{Bit, Field, FieldValue, Register, Ro, Rs, Rw};

use super::RecordingBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
pub enum BypassCtl {
    NoBypass,
    Bypass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
pub enum DacCtl {
    PowerDown,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
pub enum FracCtl {
    Decimal,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
pub enum PowerCtl {
    Normal,
    PowerDown,
}

macro_rules! pll {
    ($(#[$doc:meta])* $name:ident, $cfg0:literal, $cfg1:literal) => {
        $(#[$doc])*
        pub mod $name {
            use super::*;

            #[derive(Register)]
            #[register(address = $cfg0, reserved = Reserved0, bus = RecordingBus)]
            pub struct Config0;

            /// [30:28] second stage output divider
            pub type Postdiv2 = Rw<Config0, Field<30, 28, u8>>;
            /// [26:24] first stage output divider
            pub type Postdiv1 = Rw<Config0, Field<26, 24, u8>>;
            /// [23:0] fractional part of the multiplier
            pub type Frac = Rw<Config0, Field<23, 0>>;
            pub type Reserved0 = Rs<Config0, Bit<27>, Rs<Config0, Bit<31>>>;

            #[derive(Register)]
            #[register(address = $cfg1, reserved = Reserved1, bus = RecordingBus)]
            pub struct Config1;

            pub type Bypass = Rw<Config1, Bit<26, BypassCtl>>;
            pub type DacPowerDown = Rw<Config1, Bit<25, DacCtl>>;
            pub type FracMode = Rw<Config1, Bit<24, FracCtl>>;
            pub type PowerDown = Rw<Config1, Bit<23, PowerCtl>>;
            pub type VcoOutPowerDown = Rw<Config1, Bit<22, PowerCtl>>;
            pub type PostdivPowerDown = Rw<Config1, Bit<21, PowerCtl>>;
            pub type FoutPowerDown = Rw<Config1, Bit<20, PowerCtl>>;
            /// [17:12] reference clock divider
            pub type Refdiv = Rw<Config1, Field<17, 12, u8>>;
            /// [11:0] integer part of the multiplier
            pub type FBdiv = Rw<Config1, Field<11, 0, u16>>;
            pub type Reserved1 = Rs<Config1, Field<19, 18>, Rs<Config1, Field<31, 27>>>;
        }
    };
}

pll!(
    /// CPU PLL, PERI_CRG_PLL0 and PERI_CRG_PLL1.
    apll,
    0x1201_0000,
    0x1201_0004
);
pll!(
    /// Video PLL, PERI_CRG_PLL6 and PERI_CRG_PLL7.
    vpll,
    0x1201_0018,
    0x1201_001C
);

pub mod soc_clk_sel {
    use super::*;

    #[derive(Register)]
    #[register(address = 0x1201_0080, reserved = Reserved, bus = RecordingBus)]
    pub struct SocClkSel;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
    pub enum ApbClock {
        Freq24MHz,
        Freq50MHz,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
    pub enum CfgClock {
        Freq24MHz,
        Freq100MHz,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
    pub enum AxiClock {
        Freq24MHz,
        Freq200MHz,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
    #[repr(u8)]
    pub enum DdrClock {
        Freq24MHz = 0b000,
        Freq300MHz = 0b011,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
    #[repr(u8)]
    pub enum A7Clock {
        Freq24MHz = 0b00,
        Freq900MHz = 0b01,
        Freq600MHz = 0b11,
        #[field_value(other)]
        Reserved = 0b10,
    }

    pub type SysApbClock = Rw<SocClkSel, Bit<10, ApbClock>>;
    pub type SysCfgClk = Rw<SocClkSel, Bit<8, CfgClock>>;
    pub type SysAxiClk = Rw<SocClkSel, Bit<6, AxiClock>>;
    pub type DdrClkSel = Rw<SocClkSel, Field<5, 3, DdrClock>>;
    pub type CoreA7ClkSel = Rw<SocClkSel, Field<1, 0, A7Clock>>;
    pub type Reserved = Rs<
        SocClkSel,
        Bit<2>,
        Rs<SocClkSel, Bit<7>, Rs<SocClkSel, Bit<9>, Rs<SocClkSel, Field<31, 11>>>>,
    >;
}

pub mod pll_lock_status {
    use super::*;

    #[derive(Register)]
    #[register(address = 0x1201_01E8, reserved = Reserved, bus = RecordingBus)]
    pub struct PllLockStatus;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, FieldValue)]
    pub enum LockState {
        Unlocked,
        Locked,
    }

    pub type VPll = Ro<PllLockStatus, Bit<2, LockState>>;
    pub type APll = Ro<PllLockStatus, Bit<0, LockState>>;
    pub type Reserved = Rs<PllLockStatus, Bit<1>, Rs<PllLockStatus, Field<31, 3>>>;
}
