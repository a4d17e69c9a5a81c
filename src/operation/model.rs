// ABOUTME: The Operation value handed to the facade and its builder
// ABOUTME: Fields are fixed at build time except the shared message, which callers may update

use super::kind::OperationKind;
use super::message::Message;
use super::properties::OperationProperties;
use crate::datatypes::BindType;
use crate::listener::EventListener;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One request for the facade: what to do, how to address it, which bind
/// role it needs and whether to wait for the answer.
///
/// Missing parts are allowed at build time and reported by validation.
#[derive(Debug, Clone, Default)]
pub struct Operation {
    kind: Option<OperationKind>,
    properties: Option<OperationProperties>,
    bind_type: Option<BindType>,
    message: Option<Arc<Mutex<Message>>>,
    asynchronous: bool,
    listener: Option<Arc<EventListener>>,
}

impl Operation {
    pub fn builder() -> OperationBuilder {
        OperationBuilder::default()
    }

    /// Builder preloaded with every field of `operation`. The message stays
    /// shared, so an id set through either operation is seen by both.
    pub fn builder_from(operation: &Operation) -> OperationBuilder {
        OperationBuilder {
            kind: operation.kind,
            properties: operation.properties.clone(),
            bind_type: operation.bind_type,
            message: operation.message.clone(),
            asynchronous: operation.asynchronous,
            listener: operation.listener.clone(),
        }
    }

    pub fn kind(&self) -> Option<OperationKind> {
        self.kind
    }

    pub fn properties(&self) -> Option<&OperationProperties> {
        self.properties.as_ref()
    }

    pub fn bind_type(&self) -> Option<BindType> {
        self.bind_type
    }

    /// Snapshot of the current message
    pub fn message(&self) -> Option<Message> {
        self.message.as_ref().map(|shared| lock(shared).clone())
    }

    pub fn shared_message(&self) -> Option<&Arc<Mutex<Message>>> {
        self.message.as_ref()
    }

    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }

    /// Attach the SMSC message id. Returns `false` when the operation has no
    /// message to attach it to.
    pub fn set_message_id(&self, id: impl Into<String>) -> bool {
        match &self.message {
            Some(shared) => {
                lock(shared).set_id(id);
                true
            }
            None => false,
        }
    }

    pub fn is_asynchronous(&self) -> bool {
        self.asynchronous
    }

    pub fn listener(&self) -> Option<&Arc<EventListener>> {
        self.listener.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationBuilder {
    kind: Option<OperationKind>,
    properties: Option<OperationProperties>,
    bind_type: Option<BindType>,
    message: Option<Arc<Mutex<Message>>>,
    asynchronous: bool,
    listener: Option<Arc<EventListener>>,
}

impl OperationBuilder {
    pub fn kind(mut self, kind: OperationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn properties(mut self, properties: OperationProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn bind_type(mut self, bind_type: BindType) -> Self {
        self.bind_type = Some(bind_type);
        self
    }

    /// Give the operation its own copy of `message`
    pub fn message(mut self, message: Message) -> Self {
        self.message = Some(Arc::new(Mutex::new(message)));
        self
    }

    /// Share a message with other operations
    pub fn shared_message(mut self, message: Arc<Mutex<Message>>) -> Self {
        self.message = Some(message);
        self
    }

    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    pub fn listener(mut self, listener: Arc<EventListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn build(self) -> Operation {
        Operation {
            kind: self.kind,
            properties: self.properties,
            bind_type: self.bind_type,
            message: self.message,
            asynchronous: self.asynchronous,
            listener: self.listener,
        }
    }
}

fn lock(message: &Mutex<Message>) -> MutexGuard<'_, Message> {
    message.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_from_shares_the_message() {
        let submit = Operation::builder()
            .kind(OperationKind::Submit)
            .bind_type(BindType::Transmitter)
            .message(Message::new("test"))
            .build();

        let query = Operation::builder_from(&submit)
            .kind(OperationKind::Query)
            .build();

        assert!(submit.set_message_id("abc"));
        assert_eq!(query.message().unwrap().id(), Some("abc"));
        assert_eq!(query.kind(), Some(OperationKind::Query));
        assert_eq!(query.bind_type(), Some(BindType::Transmitter));
    }

    #[test]
    fn unset_fields_stay_absent() {
        let operation = Operation::builder().build();

        assert!(operation.kind().is_none());
        assert!(operation.properties().is_none());
        assert!(operation.message().is_none());
        assert!(!operation.is_asynchronous());
        assert!(!operation.set_message_id("abc"));
    }
}
