#![allow(dead_code)]

#[path = "../../src/test_support.rs"]
mod fakes;

pub use fakes::{FakeDriver, FakeElement};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("action_locator=debug")),
        )
        .with_test_writer()
        .try_init();
}
