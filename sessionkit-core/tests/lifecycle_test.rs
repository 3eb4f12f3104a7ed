//! Lifecycle tests that assert the exact calls a session makes on its backend

use mockall::{mock, Sequence};
use sessionkit_core::{
    json, CookieParams, Session, SessionBackend, SessionConfig, SessionData, SessionError,
    SessionResult, StateViolation,
};

mock! {
    pub Backend {}

    impl SessionBackend for Backend {
        fn start_session(&mut self, params: &CookieParams) -> SessionResult<()>;
        fn session_id(&self) -> Option<String>;
        fn regenerate_session_id(&mut self) -> SessionResult<()>;
        fn read(&self) -> SessionResult<SessionData>;
        fn write(&mut self, data: &SessionData) -> SessionResult<()>;
        fn destroy(&mut self) -> SessionResult<()>;
        fn name(&self) -> &'static str;
    }
}

const SESSION_NAME: &str = "a-session-name";

fn backend_expecting_start() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_name().return_const("mock");
    backend
        .expect_start_session()
        .withf(|params: &CookieParams| params.name == SESSION_NAME)
        .times(1)
        .returning(|_| Ok(()));
    backend
        .expect_read()
        .times(1)
        .returning(|| Ok(SessionData::new()));
    backend
}

fn configured(backend: MockBackend) -> Session<MockBackend> {
    let mut session = Session::new(backend);
    session
        .configure(SessionConfig::new(SESSION_NAME, "example.com"))
        .unwrap();
    session
}

#[test]
fn test_start_starts_session_in_backend() {
    let mut session = configured(backend_expecting_start());
    session.start().unwrap();
    assert!(session.is_started());
}

#[test]
fn test_start_reads_data_from_backend() {
    let mut backend = MockBackend::new();
    backend.expect_name().return_const("mock");
    backend.expect_start_session().returning(|_| Ok(()));
    backend.expect_read().times(1).returning(|| {
        let mut data = SessionData::new();
        data.insert("foo".to_string(), json!("a-value"));
        Ok(data)
    });

    let mut session = configured(backend);
    session.start().unwrap();

    assert_eq!(session.get("foo").unwrap(), &json!("a-value"));
}

#[test]
fn test_start_twice_does_not_restart_backend() {
    let mut session = configured(backend_expecting_start());
    session.start().unwrap();

    let err = session.start().unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidState {
            violation: StateViolation::AlreadyStarted,
            ..
        }
    ));
}

#[test]
fn test_empty_name_or_domain_is_rejected() {
    let mut session = Session::new(MockBackend::new());

    let err = session
        .configure(SessionConfig::new("", "example.com"))
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidArgument { .. }));

    let err = session
        .configure(SessionConfig::new(SESSION_NAME, ""))
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidArgument { .. }));
    assert!(!session.is_configured());
}

#[test]
fn test_get_id_retrieves_id_from_backend() {
    let mut backend = backend_expecting_start();
    backend
        .expect_session_id()
        .times(1)
        .return_const(Some("a-session-id".to_string()));

    let mut session = configured(backend);
    session.start().unwrap();

    assert_eq!(session.id().unwrap(), "a-session-id");
}

#[test]
fn test_regenerate_id_returns_new_id() {
    let mut seq = Sequence::new();
    let mut backend = backend_expecting_start();
    backend
        .expect_regenerate_session_id()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    backend
        .expect_session_id()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(Some("a-new-session-id".to_string()));

    let mut session = configured(backend);
    session.start().unwrap();

    assert_eq!(session.regenerate_id().unwrap(), "a-new-session-id");
}

#[test]
fn test_commit_then_destroy() {
    let mut seq = Sequence::new();
    let mut backend = backend_expecting_start();
    backend
        .expect_write()
        .withf(|data: &SessionData| data.len() == 1 && data.get("user") == Some(&json!("alice")))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    backend
        .expect_destroy()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let mut session = Session::new(backend);
    session
        .configure(SessionConfig::new(SESSION_NAME, "example.com"))
        .unwrap();
    session.start().unwrap();
    session.set("user", "alice").unwrap();
    session.commit().unwrap();
    session.destroy().unwrap();
}

#[test]
fn test_operations_before_start_never_reach_backend() {
    // No expectations: any backend call panics.
    let mut session = configured(MockBackend::new());

    for err in [
        session.id().unwrap_err(),
        session.regenerate_id().unwrap_err(),
        session.commit().unwrap_err(),
        session.destroy().unwrap_err(),
    ] {
        assert_eq!(err.violation(), Some(StateViolation::NotStarted));
    }
}

#[test]
fn test_failed_backend_start_leaves_session_unstarted() {
    let mut backend = MockBackend::new();
    backend
        .expect_start_session()
        .times(1)
        .returning(|_| Err(SessionError::backend("mock", "store unavailable")));

    let mut session = configured(backend);
    let err = session.start().unwrap_err();

    assert!(matches!(err, SessionError::Backend { .. }));
    assert!(!session.is_started());
}

#[test]
fn test_failed_read_discards_backend_session() {
    let mut seq = Sequence::new();
    let mut backend = MockBackend::new();
    backend
        .expect_start_session()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    backend
        .expect_read()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(SessionError::backend("mock", "entry unreadable")));
    backend
        .expect_destroy()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let mut session = configured(backend);
    let err = session.start().unwrap_err();

    assert!(matches!(err, SessionError::Backend { .. }));
    assert!(!session.is_started());
}
