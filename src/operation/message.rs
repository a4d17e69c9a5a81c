// ABOUTME: Message text and SMSC-assigned identifier carried by an operation
// ABOUTME: Shared between operations so a submit id can feed a later query or cancel

/// Text carried by an operation plus the SMSC identifier once one is known.
///
/// The identifier is absent until a submit returns one; callers attach it to
/// follow up with query, replace or cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    id: Option<String>,
    body: Option<String>,
}

impl Message {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            id: None,
            body: Some(body.into()),
        }
    }

    pub fn with_id(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            body: Some(body.into()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    pub(crate) fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub(crate) fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|body| !body.is_empty())
    }
}
