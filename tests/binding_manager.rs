mod common;

use common::{MockSession, async_operation, init_tracing, operation};
use smpp_wrapper::datatypes::{BindType, CommandStatus};
use smpp_wrapper::{
    BindCredentials, BindState, BindingManager, EventListener, OperationKind, SmppError,
    WrapperError,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn manager() -> BindingManager<MockSession> {
    init_tracing();
    BindingManager::new(
        BindCredentials::new("esme", "secret").with_system_type("VMA"),
        MockSession::new(),
    )
}

#[tokio::test]
async fn starts_unbound() {
    let manager = manager();
    assert_eq!(manager.state().await, BindState::Unbound);
    assert!(manager.last_bind_request().await.is_none());
}

#[tokio::test]
async fn bind_uses_operation_role_and_credentials() {
    let manager = manager();

    manager
        .bind(&operation(OperationKind::Submit, BindType::Transmitter))
        .await
        .unwrap();

    assert!(manager.is_bound().await);
    let request = manager.last_bind_request().await.unwrap();
    assert_eq!(request.bind_type, BindType::Transmitter);
    assert_eq!(request.system_id, "esme");
    assert_eq!(request.password, "secret");
    assert_eq!(request.system_type, "VMA");
    assert_eq!(manager.session().bind_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn second_bind_is_a_no_op_returning_same_session() {
    let manager = manager();
    let op = operation(OperationKind::Submit, BindType::Transceiver);

    let first = manager.bind(&op).await.unwrap();
    let second = manager.bind(&op).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(manager.session().bind_calls.load(Ordering::Relaxed), 1);
    assert!(manager.is_bound().await);
}

#[tokio::test(start_paused = true)]
async fn concurrent_binds_reach_the_transport_once() {
    let manager = Arc::new(manager());
    manager.session().delay_binds(Duration::from_millis(50));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                manager
                    .bind(&operation(OperationKind::Submit, BindType::Transmitter))
                    .await
                    .map(|_| ())
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(manager.session().bind_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn asynchronous_bind_registers_the_listener() {
    let manager = manager();
    let listener = Arc::new(EventListener::new());

    manager
        .bind(&async_operation(OperationKind::Submit, &listener))
        .await
        .unwrap();

    let session = manager.session();
    assert_eq!(session.bind_async_calls.load(Ordering::Relaxed), 1);
    assert_eq!(session.bind_calls.load(Ordering::Relaxed), 0);
    assert!(Arc::ptr_eq(&session.registered_listener().unwrap(), &listener));
}

#[tokio::test]
async fn rejected_bind_stays_unbound() {
    let manager = manager();
    manager.session().reject_binds(CommandStatus::InvalidPassword);

    let err = manager
        .bind(&operation(OperationKind::Submit, BindType::Transmitter))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WrapperError::Bind(SmppError::Protocol(CommandStatus::InvalidPassword))
    ));
    assert_eq!(manager.state().await, BindState::Unbound);
    // The attempt is still recorded
    assert!(manager.last_bind_request().await.is_some());
}

#[tokio::test]
async fn unbind_when_unbound_skips_transport() {
    let manager = manager();

    manager.unbind().await.unwrap();

    assert_eq!(manager.session().unbind_calls.load(Ordering::Relaxed), 0);
    assert_eq!(manager.state().await, BindState::Unbound);
}

#[tokio::test]
async fn unbind_returns_to_unbound() {
    let manager = manager();
    manager
        .bind(&operation(OperationKind::Query, BindType::Transmitter))
        .await
        .unwrap();

    manager.unbind().await.unwrap();

    assert_eq!(manager.session().unbind_calls.load(Ordering::Relaxed), 1);
    assert!(!manager.is_bound().await);

    // A later bind goes to the transport again
    manager
        .bind(&operation(OperationKind::Query, BindType::Receiver))
        .await
        .unwrap();
    assert_eq!(manager.session().bind_calls.load(Ordering::Relaxed), 2);
    assert_eq!(manager.last_bind_type().await, Some(BindType::Receiver));
}

#[tokio::test]
async fn failed_unbind_keeps_session_bound() {
    let manager = manager();
    manager
        .bind(&operation(OperationKind::Submit, BindType::Transmitter))
        .await
        .unwrap();
    manager.session().fail_unbinds();

    let err = manager.unbind().await.unwrap_err();

    assert!(matches!(err, WrapperError::Unbind(SmppError::ConnectionClosed)));
    assert_eq!(manager.state().await, BindState::Bound);
}

#[tokio::test]
async fn only_an_asynchronous_bind_routes_requests_to_its_listener() {
    let listener = Arc::new(EventListener::new());

    let sync_first = manager();
    sync_first
        .bind(&operation(OperationKind::Submit, BindType::Transceiver))
        .await
        .unwrap();
    // Already bound, so this listener never reaches the session
    sync_first
        .bind(&async_operation(OperationKind::Receive, &listener))
        .await
        .unwrap();
    assert!(!sync_first.routes_to(&listener).await);

    let async_first = manager();
    async_first
        .bind(&async_operation(OperationKind::Receive, &listener))
        .await
        .unwrap();
    assert!(async_first.routes_to(&listener).await);
    assert!(!async_first.routes_to(&Arc::new(EventListener::new())).await);
}
