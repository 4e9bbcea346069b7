//! Integration tests against a real server on an ephemeral port

mod client_sync_test;
mod gateway_test;
mod health_test;
mod persistence_test;
