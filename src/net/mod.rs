//! Network collaborator
//!
//! A generic JSON GET that never fails: transport errors come back as
//! status 0 with no body, and the clients decide what each reply means.

pub mod fetcher;
pub mod mock;

pub use fetcher::{HttpReply, JsonFetcher, ReqwestFetcher};
pub use mock::MockFetcher;
