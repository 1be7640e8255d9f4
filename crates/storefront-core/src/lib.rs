//! # Storefront Core
//!
//! Pure resilience machinery for the storefront SDK, kept free of HTTP so
//! every piece is testable in isolation:
//!
//! - [`cookies`] — an explicit cookie jar plus the governor that keeps it
//!   under the backend's header-size limits
//! - [`session`] — the locally persisted session cache (token fallback,
//!   current user, cart)
//! - [`carousel`] — the loop-wrapping carousel positioner

pub mod carousel;
pub mod cookies;
pub mod session;

pub use carousel::CarouselPositioner;
pub use cookies::{CookieEntry, CookieGovernor, CookieJar};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
