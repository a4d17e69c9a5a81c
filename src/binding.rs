// ABOUTME: Bind state machine for one SMSC session shared by every operation
// ABOUTME: Serializes bind and unbind so a session is bound at most once at a time

use crate::client::{BindCredentials, SmppError, SmppSession};
use crate::datatypes::{BindRequest, BindType};
use crate::error::{WrapperError, WrapperResult};
use crate::listener::EventListener;
use crate::operation::Operation;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindState {
    #[default]
    Unbound,
    Bound,
}

#[derive(Debug, Default)]
struct Inner {
    state: BindState,
    last_bind_request: Option<BindRequest>,
    // Listener handed to the session by the last asynchronous bind
    listener: Option<Arc<EventListener>>,
}

/// Owns the session and its bind state.
///
/// The state lock is held across the transport call, so concurrent callers
/// of `bind` wait for the first one and then find the session bound.
pub struct BindingManager<S> {
    credentials: BindCredentials,
    session: Arc<S>,
    inner: Mutex<Inner>,
}

impl<S: SmppSession> BindingManager<S> {
    pub fn new(credentials: BindCredentials, session: S) -> Self {
        Self::with_shared_session(credentials, Arc::new(session))
    }

    pub fn with_shared_session(credentials: BindCredentials, session: Arc<S>) -> Self {
        Self {
            credentials,
            session,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Make sure the session is bound in the role `operation` asks for and
    /// return it.
    ///
    /// An already bound session is returned as is, whatever role it was bound
    /// with. Asynchronous operations bind with their listener so later
    /// responses reach it.
    pub async fn bind(&self, operation: &Operation) -> WrapperResult<Arc<S>> {
        let mut inner = self.inner.lock().await;

        if inner.state == BindState::Bound {
            warn!(system_id = %self.credentials.system_id, "session already bound");
            return Ok(Arc::clone(&self.session));
        }

        let bind_type = operation.bind_type().unwrap_or_default();
        let request = self.credentials.bind_request(bind_type);
        inner.last_bind_request = Some(request.clone());

        let result = if operation.is_asynchronous() {
            let listener = operation.listener().cloned();
            if listener.is_none() {
                warn!(?bind_type, "asynchronous bind without a listener");
            }
            inner.listener = listener.clone();
            self.session.bind_async(request, listener).await
        } else {
            self.session.bind(request).await
        };

        let response = result.map_err(|e| {
            error!(?bind_type, error = %e, "bind failed");
            WrapperError::Bind(e)
        })?;

        if !response.command_status.is_ok() {
            error!(?bind_type, status = %response.command_status, "bind rejected");
            return Err(WrapperError::Bind(SmppError::Protocol(
                response.command_status,
            )));
        }

        inner.state = BindState::Bound;
        info!(
            ?bind_type,
            system_id = %self.credentials.system_id,
            smsc = %response.system_id,
            "bound"
        );
        Ok(Arc::clone(&self.session))
    }

    /// Unbind if bound. A failed unbind leaves the session bound.
    pub async fn unbind(&self) -> WrapperResult<()> {
        let mut inner = self.inner.lock().await;

        if inner.state == BindState::Unbound {
            warn!(system_id = %self.credentials.system_id, "session not bound, nothing to unbind");
            return Ok(());
        }

        let response = self.session.unbind().await.map_err(|e| {
            error!(error = %e, "unbind failed");
            WrapperError::Unbind(e)
        })?;

        if !response.command_status.is_ok() {
            error!(status = %response.command_status, "unbind rejected");
            return Err(WrapperError::Unbind(SmppError::Protocol(
                response.command_status,
            )));
        }

        inner.state = BindState::Unbound;
        info!(system_id = %self.credentials.system_id, "unbound");
        Ok(())
    }

    /// Record that the SMSC ended the bind with its own unbind, which has
    /// already been acknowledged. The next `bind` goes to the transport again.
    pub(crate) async fn release(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == BindState::Bound {
            inner.state = BindState::Unbound;
            info!(system_id = %self.credentials.system_id, "unbound by SMSC");
        }
    }

    /// Whether unsolicited requests are routed to `listener`, i.e. it was
    /// registered by an asynchronous bind.
    pub async fn routes_to(&self, listener: &Arc<EventListener>) -> bool {
        self.inner
            .lock()
            .await
            .listener
            .as_ref()
            .is_some_and(|registered| Arc::ptr_eq(registered, listener))
    }

    pub async fn state(&self) -> BindState {
        self.inner.lock().await.state
    }

    pub async fn is_bound(&self) -> bool {
        self.state().await == BindState::Bound
    }

    /// The most recent bind request sent, successful or not
    pub async fn last_bind_request(&self) -> Option<BindRequest> {
        self.inner.lock().await.last_bind_request.clone()
    }

    /// Role of the most recent bind request
    pub async fn last_bind_type(&self) -> Option<BindType> {
        self.inner
            .lock()
            .await
            .last_bind_request
            .as_ref()
            .map(|request| request.bind_type)
    }

    pub fn credentials(&self) -> &BindCredentials {
        &self.credentials
    }

    pub fn session(&self) -> &Arc<S> {
        &self.session
    }
}

impl<S> std::fmt::Debug for BindingManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingManager")
            .field("system_id", &self.credentials.system_id)
            .finish_non_exhaustive()
    }
}
