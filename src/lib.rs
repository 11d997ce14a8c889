//! FitBook: client library for the FitWithJack class booking service.
//!
//! DESIGN
//! ======
//! The remote API owns users, classes, sessions, and enrollments. This crate
//! holds the client side: a session controller that keeps auth state in step
//! with a persisted key-value store, the sign-up flow, booking actions, and
//! the pure helpers front ends use for filtering, validation, and display.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api::BookingApi` is the transport seam (`api::http::HttpApi` in
//! production) and `store::SessionStore` is the persistence seam. The `cli`
//! crate in this workspace is the reference front end.

pub mod api;
pub mod booking;
pub mod config;
pub mod filter;
pub mod format;
pub mod session;
pub mod store;
pub mod validate;

#[cfg(test)]
pub mod test_helpers;
