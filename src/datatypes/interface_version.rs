use num_enum::TryFromPrimitive;

/// Version of the SMPP protocol announced in bind requests.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InterfaceVersion {
    SmppV33 = 0x33,
    #[default]
    SmppV34 = 0x34,
}
