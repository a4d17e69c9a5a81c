// ABOUTME: Closed set of operation kinds the facade can carry out against an SMSC
// ABOUTME: Each kind has a stable numeric id and a short description

use num_enum::TryFromPrimitive;
use std::fmt;

/// What an `Operation` asks the SMSC to do.
///
/// Every kind except `Receive` goes through `OperationFacade::execute`;
/// `Receive` goes through `OperationFacade::receive`.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Submit = 1,
    SubmitMulti = 2,
    Data = 3,
    Query = 4,
    Replace = 5,
    Cancel = 6,
    Enquire = 7,
    Receive = 8,
}

impl OperationKind {
    pub const ALL: [OperationKind; 8] = [
        OperationKind::Submit,
        OperationKind::SubmitMulti,
        OperationKind::Data,
        OperationKind::Query,
        OperationKind::Replace,
        OperationKind::Cancel,
        OperationKind::Enquire,
        OperationKind::Receive,
    ];

    /// Stable numeric identifier, 1 through 8
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn description(&self) -> &'static str {
        match self {
            OperationKind::Submit => "send a short message to one device",
            OperationKind::SubmitMulti => "send a short message to several devices",
            OperationKind::Data => "send a data message to a device",
            OperationKind::Query => "fetch the status of a submitted message",
            OperationKind::Replace => "replace attributes of a submitted message",
            OperationKind::Cancel => "cancel a submitted message",
            OperationKind::Enquire => "check that the SMSC is alive",
            OperationKind::Receive => "receive one PDU from the SMSC",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_through_eight() {
        for (index, kind) in OperationKind::ALL.iter().enumerate() {
            assert_eq!(kind.id() as usize, index + 1);
            assert_eq!(OperationKind::try_from(kind.id()).unwrap(), *kind);
        }
        assert!(OperationKind::try_from(0u8).is_err());
        assert!(OperationKind::try_from(9u8).is_err());
    }

    #[test]
    fn every_kind_is_described() {
        assert!(OperationKind::ALL.iter().all(|kind| !kind.description().is_empty()));
        assert_eq!(OperationKind::SubmitMulti.to_string(), "SubmitMulti");
    }
}
