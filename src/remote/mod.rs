// src/remote/mod.rs

//! Remote-session layer.
//!
//! - [`session`] defines the [`RemoteSession`] / [`SessionFactory`] traits
//!   the pool is built against, so tests can substitute fake sessions.
//! - [`ssh`] is the production implementation, driving the OpenSSH client
//!   with one ControlMaster connection per pooled session.
//! - [`pool`] provides the bounded, self-healing [`ConnectionPool`].

pub mod pool;
pub mod session;
pub mod ssh;

pub use pool::ConnectionPool;
pub use session::{RemoteSession, SessionFactory};
pub use ssh::{SshMasterFactory, SshMasterSession};
