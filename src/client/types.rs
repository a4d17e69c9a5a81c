// ABOUTME: Supporting types for SMPP session setup, chiefly the bind credentials
// ABOUTME: Credentials are a value type built with with_* setters and turned into bind PDUs

use crate::datatypes::{BindRequest, BindType, InterfaceVersion, NumericPlanIndicator, TypeOfNumber};
use crate::macros::builder_setters;

/// SMPP bind operation credentials
///
/// Contains the authentication and addressing information sent with every
/// bind. The bind type comes from the operation being executed, not from the
/// credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct BindCredentials {
    /// System identifier for authentication
    pub system_id: String,
    /// Password for authentication
    pub password: String,
    /// ESME category, empty by default
    pub system_type: String,
    /// SMPP interface version to announce
    pub interface_version: InterfaceVersion,
    /// TON of the served address range
    pub addr_ton: TypeOfNumber,
    /// NPI of the served address range
    pub addr_npi: NumericPlanIndicator,
    /// Served address range, empty by default
    pub address_range: String,
}

impl BindCredentials {
    /// Credentials with SMPP v3.4 and empty system type and address range
    pub fn new(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            password: password.into(),
            system_type: String::new(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: String::new(),
        }
    }

    builder_setters! {
        with_system_type => system_type: String,
        with_version => interface_version: InterfaceVersion,
    }

    /// Set the served address range along with its numbering
    pub fn with_address_range(
        mut self,
        ton: TypeOfNumber,
        npi: NumericPlanIndicator,
        range: impl Into<String>,
    ) -> Self {
        self.addr_ton = ton;
        self.addr_npi = npi;
        self.address_range = range.into();
        self
    }

    /// Build the bind PDU for the requested role. The session assigns the
    /// sequence number.
    pub fn bind_request(&self, bind_type: BindType) -> BindRequest {
        BindRequest {
            bind_type,
            sequence_number: 0,
            system_id: self.system_id.clone(),
            password: self.password.clone(),
            system_type: self.system_type.clone(),
            interface_version: self.interface_version,
            addr_ton: self.addr_ton,
            addr_npi: self.addr_npi,
            address_range: self.address_range.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_defaults() {
        let credentials = BindCredentials::new("esme", "pw");
        assert_eq!(credentials.interface_version, InterfaceVersion::SmppV34);
        assert!(credentials.system_type.is_empty());
        assert!(credentials.address_range.is_empty());
    }

    #[test]
    fn bind_request_carries_credentials_and_role() {
        let credentials = BindCredentials::new("esme", "pw")
            .with_system_type("VMS")
            .with_address_range(TypeOfNumber::International, NumericPlanIndicator::Isdn, "^55");

        let request = credentials.bind_request(BindType::Receiver);
        assert_eq!(request.bind_type, BindType::Receiver);
        assert_eq!(request.system_id, "esme");
        assert_eq!(request.system_type, "VMS");
        assert_eq!(request.addr_ton, TypeOfNumber::International);
        assert_eq!(request.address_range, "^55");
    }
}
