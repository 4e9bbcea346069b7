//! Custom assertion macros and utilities
//!
//! Provides assertion macros for board events with more descriptive
//! failure output.

/// Assert that a server event is of the given variant and return its payload
///
/// ```ignore
/// let note = assert_event!(client.recv().await, ServerEvent::NoteCreated(note) => note);
/// ```
#[macro_export]
macro_rules! assert_event {
    ($event:expr, $pattern:pat => $value:expr) => {
        match $event {
            $pattern => $value,
            other => panic!("Unexpected event: {:?}", other),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
