//! Test doubles for the backend seams
//!
//! Available with the `test-util` feature. The fakes hold their state in
//! memory, count calls and can be told to fail the next operation, so source
//! and sink behaviour can be exercised without any network.

mod logs;
mod mocks;

pub use logs::{CapturedEvent, LogCapture};
pub use mocks::{FakeIdentityService, FakeParameterStore};
