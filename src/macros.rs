// ABOUTME: This module provides macros to reduce boilerplate in SMPP PDU implementations
// ABOUTME: Includes macros for header-only PDUs and fluent builder setters

/// Macro for implementing codec traits on header-only PDUs (no body)
///
/// # Arguments
/// * `$pdu_type` - The PDU struct name (e.g., EnquireLink)
/// * `$command_id` - The CommandId variant (e.g., CommandId::EnquireLink)
///
/// # Generated code
/// - Decodable implementation with header validation and an empty body check
/// - Encodable implementation writing the 16 octet header only
macro_rules! impl_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        impl $crate::codec::Decodable for $pdu_type {
            fn command_ids() -> &'static [$crate::datatypes::CommandId] {
                &[$command_id]
            }

            fn decode(
                header: $crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                use bytes::Buf;

                Self::validate_header(&header)?;

                if buf.has_remaining() {
                    return Err($crate::codec::CodecError::FieldValidation {
                        field: concat!(stringify!($pdu_type), "_body"),
                        reason: concat!(stringify!($pdu_type), " PDU should have no body")
                            .to_string(),
                    });
                }

                Ok($pdu_type {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                })
            }
        }

        impl $crate::codec::Encodable for $pdu_type {
            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                $crate::codec::encode_header(
                    buf,
                    $command_id,
                    self.command_status,
                    self.sequence_number,
                );
                Ok(())
            }
        }
    };
}

/// Macro for generating constructor methods for header-only PDUs
///
/// # Generated code
/// - `new(sequence_number: u32)` - Creates PDU with Ok status
/// - `error(sequence_number: u32, status: CommandStatus)` - Creates PDU with error status
macro_rules! impl_header_only_constructors {
    ($pdu_type:ident) => {
        impl $pdu_type {
            /// Create a new PDU with Ok status
            pub fn new(sequence_number: u32) -> Self {
                Self {
                    command_status: $crate::datatypes::CommandStatus::Ok,
                    sequence_number,
                }
            }

            /// Create a PDU with error status
            pub fn error(sequence_number: u32, status: $crate::datatypes::CommandStatus) -> Self {
                Self {
                    command_status: status,
                    sequence_number,
                }
            }
        }
    };
}

/// Convenience macro combining codec and constructor generation for
/// header-only PDUs.
macro_rules! impl_complete_header_only_pdu {
    ($pdu_type:ident, $command_id:expr) => {
        $crate::macros::impl_header_only_pdu!($pdu_type, $command_id);
        $crate::macros::impl_header_only_constructors!($pdu_type);
    };
}

/// Macro for responses whose body is a single message_id C-Octet String
/// (submit_sm_resp, deliver_sm_resp).
///
/// Error responses may omit the body; they decode with an empty message_id.
macro_rules! impl_message_id_response {
    ($pdu_type:ident, $command_id:expr) => {
        impl $pdu_type {
            pub fn error(sequence_number: u32, status: $crate::datatypes::CommandStatus) -> Self {
                Self {
                    command_status: status,
                    sequence_number,
                    message_id: String::new(),
                }
            }
        }

        impl $crate::codec::Decodable for $pdu_type {
            fn command_ids() -> &'static [$crate::datatypes::CommandId] {
                &[$command_id]
            }

            fn decode(
                header: $crate::codec::PduHeader,
                buf: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                use bytes::Buf;

                Self::validate_header(&header)?;

                let message_id = if buf.has_remaining() {
                    $crate::codec::decode_cstring(
                        buf,
                        $crate::datatypes::MAX_MESSAGE_ID_LENGTH,
                        "message_id",
                    )?
                } else {
                    String::new()
                };

                Ok($pdu_type {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                    message_id,
                })
            }
        }

        impl $crate::codec::Encodable for $pdu_type {
            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                $crate::codec::encode_header(
                    buf,
                    $command_id,
                    self.command_status,
                    self.sequence_number,
                );
                $crate::codec::encode_cstring(
                    buf,
                    &self.message_id,
                    $crate::datatypes::MAX_MESSAGE_ID_LENGTH,
                    "message_id",
                )
            }
        }
    };
}

/// Macro for generating fluent `with_*` setters on builders.
///
/// ```ignore
/// builder_setters!(with_system_type => system_type: String);
/// ```
/// expands to
/// ```ignore
/// pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self { .. }
/// ```
macro_rules! builder_setters {
    ($($setter:ident => $field:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $setter(mut self, $field: impl Into<$type>) -> Self {
                self.$field = $field.into();
                self
            }
        )*
    };
}

// Make macros available to the rest of the crate
pub(crate) use {
    builder_setters, impl_complete_header_only_pdu, impl_header_only_constructors,
    impl_header_only_pdu, impl_message_id_response,
};
