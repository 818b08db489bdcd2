//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on request decoding and auth plumbing. Every
//! service function takes the caller's identity explicitly — there is no
//! ambient "current user" anywhere below the route layer.

pub mod account;
pub mod history;
pub mod house;
pub mod invitation;
pub mod scoring;
pub mod session;
pub mod task;
