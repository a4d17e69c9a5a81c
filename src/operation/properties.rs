// ABOUTME: Addressing and delivery attributes of an operation, built with a fluent builder
// ABOUTME: Defaults are the SMPP protocol defaults: empty strings, zero flags, priority level 0

use crate::datatypes::{NumericPlanIndicator, PriorityFlag, SmeAddress, TypeOfNumber};
use crate::macros::builder_setters;
use std::time::Duration;

/// A short message entity address: numbering plus digits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub ton: TypeOfNumber,
    pub npi: NumericPlanIndicator,
    pub digits: String,
}

impl Address {
    /// Address with unknown TON and NPI
    pub fn new(digits: impl Into<String>) -> Self {
        Self {
            ton: TypeOfNumber::Unknown,
            npi: NumericPlanIndicator::Unknown,
            digits: digits.into(),
        }
    }

    pub fn with_numbering(
        ton: TypeOfNumber,
        npi: NumericPlanIndicator,
        digits: impl Into<String>,
    ) -> Self {
        Self {
            ton,
            npi,
            digits: digits.into(),
        }
    }

    pub(crate) fn to_sme(&self) -> SmeAddress {
        SmeAddress::new(self.ton, self.npi, self.digits.clone())
    }
}

impl From<&str> for Address {
    fn from(digits: &str) -> Self {
        Address::new(digits)
    }
}

impl From<String> for Address {
    fn from(digits: String) -> Self {
        Address::new(digits)
    }
}

/// Attributes shared by every operation kind. Each kind reads only the
/// fields its PDU carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationProperties {
    pub service_type: String,
    pub source_address: Option<Address>,
    pub destination_addresses: Vec<Address>,
    /// Absolute or relative SMPP time string, empty for the SMSC default
    pub validity_period: String,
    /// Absolute or relative SMPP time string, empty for immediate delivery
    pub schedule_delivery_time: String,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: PriorityFlag,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    /// Not sent with operation PDUs; binds take the system type from the
    /// credentials.
    pub system_type: String,
    /// Wait limit for synchronous receive when no listener interval applies.
    /// `None` blocks until a PDU arrives.
    pub receive_timeout: Option<Duration>,
}

impl OperationProperties {
    pub fn builder() -> OperationPropertiesBuilder {
        OperationPropertiesBuilder::default()
    }

    /// The destination a single-recipient PDU is addressed to. With several
    /// destinations configured the last one wins.
    pub fn destination_address(&self) -> Option<&Address> {
        self.destination_addresses.last()
    }

    pub(crate) fn has_source_address(&self) -> bool {
        self.source_address
            .as_ref()
            .is_some_and(|address| !address.digits.is_empty())
    }

    pub(crate) fn has_destination_addresses(&self) -> bool {
        !self.destination_addresses.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationPropertiesBuilder {
    service_type: String,
    source_address: Option<Address>,
    destination_addresses: Vec<Address>,
    validity_period: String,
    schedule_delivery_time: String,
    esm_class: u8,
    protocol_id: u8,
    priority_flag: PriorityFlag,
    registered_delivery: u8,
    replace_if_present_flag: u8,
    data_coding: u8,
    sm_default_msg_id: u8,
    system_type: String,
    receive_timeout: Option<Duration>,
}

impl OperationPropertiesBuilder {
    builder_setters! {
        service_type => service_type: String,
        validity_period => validity_period: String,
        schedule_delivery_time => schedule_delivery_time: String,
        esm_class => esm_class: u8,
        protocol_id => protocol_id: u8,
        priority_flag => priority_flag: PriorityFlag,
        registered_delivery => registered_delivery: u8,
        replace_if_present_flag => replace_if_present_flag: u8,
        data_coding => data_coding: u8,
        sm_default_msg_id => sm_default_msg_id: u8,
        system_type => system_type: String,
    }

    pub fn source_address(mut self, address: impl Into<Address>) -> Self {
        self.source_address = Some(address.into());
        self
    }

    /// Append one destination
    pub fn destination_address(mut self, address: impl Into<Address>) -> Self {
        self.destination_addresses.push(address.into());
        self
    }

    /// Replace the destination list
    pub fn destination_addresses<A: Into<Address>>(
        mut self,
        addresses: impl IntoIterator<Item = A>,
    ) -> Self {
        self.destination_addresses = addresses.into_iter().map(Into::into).collect();
        self
    }

    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> OperationProperties {
        OperationProperties {
            service_type: self.service_type,
            source_address: self.source_address,
            destination_addresses: self.destination_addresses,
            validity_period: self.validity_period,
            schedule_delivery_time: self.schedule_delivery_time,
            esm_class: self.esm_class,
            protocol_id: self.protocol_id,
            priority_flag: self.priority_flag,
            registered_delivery: self.registered_delivery,
            replace_if_present_flag: self.replace_if_present_flag,
            data_coding: self.data_coding,
            sm_default_msg_id: self.sm_default_msg_id,
            system_type: self.system_type,
            receive_timeout: self.receive_timeout,
        }
    }
}
