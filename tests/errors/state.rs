//! Operations called outside the state that permits them

use crate::common::*;
use kiln::{OutputMode, SessionState};

#[test]
fn run_before_compile_is_invalid_state() {
    let session = memory_session(TestBackend::new());
    let err = session.run().unwrap_err();
    assert!(err.is_invalid_state());
    assert_eq!(session.state(), SessionState::Configuring);
}

#[test]
fn run_after_failed_compile_is_invalid_state() {
    let mut session = memory_session(TestBackend::new());
    let err = session.compile_source(INVALID_SOURCE).unwrap_err();
    assert!(err.is_compilation());
    assert_eq!(session.state(), SessionState::Failed);

    let err = session.run().unwrap_err();
    assert!(err.is_invalid_state());
}

#[test]
fn run_before_compile_reports_invalid_state_even_with_bad_argv() {
    let session = memory_session(TestBackend::new());
    let args = vec!["x"; 257];
    // The state check wins over the argv cap
    let err = session.run_with_args(&args).unwrap_err();
    assert!(err.is_invalid_state());
}

#[test]
fn run_requires_memory_output() {
    let mut session = kiln::Session::new(TestBackend::new());
    session.set_output_mode(OutputMode::Object).unwrap();
    session.compile_source(RETURNS_314).unwrap();
    assert_eq!(session.state(), SessionState::Compiled);

    assert!(session.run().unwrap_err().is_invalid_state());
}

#[test]
fn write_output_rejected_in_memory_mode() {
    let session = compiled_session(RETURNS_314);
    let err = session.write_output("out.o").unwrap_err();
    assert!(err.is_invalid_state());
}

#[test]
fn write_output_before_compile_is_invalid_state() {
    let mut session = kiln::Session::new(TestBackend::new());
    session.set_output_mode(OutputMode::Object).unwrap();
    assert!(session.write_output("out.o").unwrap_err().is_invalid_state());
}

#[test]
fn symbol_before_compile_is_invalid_state() {
    let session = memory_session(TestBackend::new());
    assert!(session.symbol("main").unwrap_err().is_invalid_state());
}

#[test]
fn symbol_requires_memory_output() {
    let mut session = kiln::Session::new(TestBackend::new());
    session.set_output_mode(OutputMode::SharedLibrary).unwrap();
    session.compile_source(RETURNS_314).unwrap();
    assert!(session.symbol("main").unwrap_err().is_invalid_state());
}
