//! Built-in search providers.

mod bing;
mod google;

pub use bing::Bing;
pub use google::Google;
