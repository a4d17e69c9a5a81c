use num_enum::TryFromPrimitive;

/// Type of Number (TON) used in SME addresses (SMPP v3.4 Section 5.2.5).
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TypeOfNumber {
    #[default]
    Unknown = 0x00,
    International = 0x01,
    National = 0x02,
    NetworkSpecific = 0x03,
    SubscriberNumber = 0x04,
    Alphanumeric = 0x05,
    Abbreviated = 0x06,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values() {
        assert_eq!(TypeOfNumber::National as u8, 2);
        assert_eq!(TypeOfNumber::try_from(6u8).unwrap(), TypeOfNumber::Abbreviated);
        assert!(TypeOfNumber::try_from(7u8).is_err());
    }
}
