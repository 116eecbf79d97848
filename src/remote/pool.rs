// src/remote/pool.rs

//! Bounded, self-healing pool of remote sessions.
//!
//! The pool opens `pool_size` sessions eagerly; a partially constructed
//! pool is rejected outright. Afterward, sessions are handed out one caller
//! at a time: `acquire` waits (up to the configured timeout) for a free
//! session, `release` returns it, replacing it with a fresh connection when
//! the transport has died. [`ConnectionPool::with_session`] is the only
//! sanctioned way to use a session: it guarantees the release on every exit
//! path.
//!
//! Availability is tracked with a semaphore whose permits mirror the vector
//! of idle sessions: `acquire` forgets the permit it takes, `release` adds
//! one back once a session (original or replacement) has been returned. If
//! replacing a dead session fails, no permit is restored and the pool
//! shrinks by one instead of blocking the releasing caller.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::errors::{BeamlineError, Result};
use crate::remote::session::{RemoteSession, SessionFactory};
use crate::types::BoxFuture;

/// Concurrency-safe pool of live remote sessions.
pub struct ConnectionPool {
    factory: Box<dyn SessionFactory>,
    idle: Mutex<Vec<Box<dyn RemoteSession>>>,
    permits: Semaphore,
    acquire_timeout: Duration,
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("available_permits", &self.permits.available_permits())
            .field("acquire_timeout", &self.acquire_timeout)
            .finish_non_exhaustive()
    }
}

impl ConnectionPool {
    /// Eagerly open `pool_size` sessions.
    ///
    /// Any establishment failure aborts construction; the low-level cause is
    /// wrapped into a single [`BeamlineError::Connection`] that preserves its
    /// message.
    pub async fn connect(
        factory: Box<dyn SessionFactory>,
        pool_size: usize,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let session = factory.connect().await.map_err(|e| {
                BeamlineError::Connection(format!("Failed to create initial sessions: {e}"))
            })?;
            sessions.push(session);
        }

        debug!(pool_size, "connection pool initialised");
        Ok(Self {
            factory,
            idle: Mutex::new(sessions),
            permits: Semaphore::new(pool_size),
            acquire_timeout,
        })
    }

    /// Take a session out of the pool, waiting up to the acquire timeout.
    ///
    /// Fails with [`BeamlineError::AcquireTimeout`] (distinct from
    /// connection-establishment errors) when no session frees up in time.
    pub async fn acquire(&self) -> Result<Box<dyn RemoteSession>> {
        let permit = timeout(self.acquire_timeout, self.permits.acquire())
            .await
            .map_err(|_| BeamlineError::AcquireTimeout)?
            .map_err(|_| BeamlineError::Connection("connection pool is closed".to_string()))?;

        // The permit now stands for the session we are about to remove; it
        // is restored in `release` once a session is back in the pool.
        permit.forget();

        let session = self
            .idle
            .lock()
            .expect("connection pool lock poisoned")
            .pop()
            .expect("permit held but no idle session");
        Ok(session)
    }

    /// Return a session to the pool.
    ///
    /// Dead sessions are discarded and replaced best-effort; if the
    /// replacement attempt fails the pool's effective size shrinks by one
    /// rather than blocking the releasing caller.
    pub async fn release(&self, mut session: Box<dyn RemoteSession>) {
        if session.is_active().await {
            self.put_back(session);
            return;
        }

        debug!("released session is dead; attempting replacement");
        session.close().await;

        match self.factory.connect().await {
            Ok(replacement) => self.put_back(replacement),
            Err(err) => {
                warn!(
                    error = %err,
                    "failed to replace dead session; pool size shrinks by one"
                );
            }
        }
    }

    /// Scoped acquisition: acquire, run `f` with the session, release on
    /// every exit path. This is the only sanctioned way to use a session.
    pub async fn with_session<T, F>(&self, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(&'a mut dyn RemoteSession) -> BoxFuture<'a, Result<T>>,
    {
        let mut session = self.acquire().await?;
        let result = f(session.as_mut()).await;
        self.release(session).await;
        result
    }

    /// Number of sessions currently idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.permits.available_permits()
    }

    fn put_back(&self, session: Box<dyn RemoteSession>) {
        self.idle
            .lock()
            .expect("connection pool lock poisoned")
            .push(session);
        self.permits.add_permits(1);
    }
}
