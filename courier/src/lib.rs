//! Courier route session: stop lifecycle and map geometry for one delivery route.
//!
//! A courier works a single route: an origin plus ordered delivery stops. This
//! crate keeps the route snapshot in sync with the routes API and derives what
//! a map renderer needs from it. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (polyline decoding, bounds, stop
//!   status cycling, auto-completion, renderer inputs). No I/O.
//! - **[`io`]**: Side-effecting operations (config files, the HTTP gateway).
//!   Behind the [`io::gateway::SyncGateway`] trait so tests can script it.
//!
//! [`session::RouteSession`] coordinates the two: every mutation goes to the
//! remote first and the snapshot is only ever replaced by a fresh fetch.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod route;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
