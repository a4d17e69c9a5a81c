// ABOUTME: Defines SMPP v3.4 priority_flag field values (Section 5.2.14)
// ABOUTME: Carried by submit_sm, submit_multi and deliver_sm

use num_enum::TryFromPrimitive;

/// Priority level assigned by the originating SME.
///
/// Level 0 is the lowest. How each level maps onto GSM, ANSI-136 or IS-95
/// priority handling is up to the SMSC. Values 4-255 are reserved.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PriorityFlag {
    #[default]
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
}
