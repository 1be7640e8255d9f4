//! Cookie storage and governance.
//!
//! The SDK does not delegate cookies to the HTTP layer: it owns an explicit
//! [`CookieJar`] so the [`CookieGovernor`] can inspect, prune and compress
//! entries before they are replayed on the wire. Each entry records the
//! exact path/domain attributes it was written with, so deletion works by
//! identity instead of guessing attribute combinations.

mod codec;
mod governor;
mod jar;

pub use codec::{decode_value, encode_value, CookieCodecError, COMPRESSED_MARKER};
pub use governor::CookieGovernor;
pub use jar::{CookieEntry, CookieJar};
