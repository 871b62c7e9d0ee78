use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

/// Predefined RAM symbols of the Hack platform. The discriminant is the RAM
/// address the symbol resolves to: SP..THAT live at 0..4, the temp block at
/// 5..12, the scratch registers at 13..15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Display)]
#[repr(u8)]
pub enum Reg {
    SP,
    LCL,
    ARG,
    THIS,
    THAT,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl Reg {
    /// RAM address of the first temp slot.
    pub const TEMP_BASE: u8 = 5;

    /// Register backing temp slot `slot`. The block has eight cells; `None`
    /// past the end.
    pub fn temp(slot: u16) -> Option<Reg> {
        if slot > 7 {
            return None;
        }
        Reg::try_from(Self::TEMP_BASE + slot as u8).ok()
    }
}

#[test]
fn test() {
    assert_eq!(Reg::try_from(0u8), Ok(Reg::SP));
    assert_eq!(u8::from(Reg::R13), 13);
    assert_eq!(Reg::temp(0), Some(Reg::R5));
    assert_eq!(Reg::temp(7), Some(Reg::R12));
    assert_eq!(Reg::temp(8), None);
    assert_eq!(Reg::THAT.to_string(), "THAT");
}
