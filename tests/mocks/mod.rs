//! Test doubles shared by the integration tests.

pub mod mock_upstream;

#[allow(unused_imports)]
pub use mock_upstream::{MockReply, MockUpstream, RecordedCall};
