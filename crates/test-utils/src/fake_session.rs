use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use beamline::errors::{BeamlineError, Result};
use beamline::remote::{RemoteSession, SessionFactory};
use beamline::types::{BoxFuture, CommandOutput};

/// Shared liveness/accounting state between a [`FakeSessionFactory`] and the
/// sessions it produced.
#[derive(Debug, Default)]
struct FactoryState {
    constructed: AtomicUsize,
    closed: AtomicUsize,
    /// When set, the next `connect` calls fail with this message.
    connect_failure: Mutex<Option<String>>,
}

/// An in-memory session: `exec` succeeds with empty output and records the
/// command; liveness can be flipped per-session to exercise pool
/// replacement.
#[derive(Debug)]
pub struct FakeSession {
    state: Arc<FactoryState>,
    alive: Arc<AtomicBool>,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FakeSession {
    /// Handle to flip this session's liveness from the test.
    pub fn liveness_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.alive)
    }
}

impl RemoteSession for FakeSession {
    fn exec<'a>(&'a mut self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(CommandOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
        })
    }

    fn is_active(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move { self.alive.load(Ordering::SeqCst) })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.state.closed.fetch_add(1, Ordering::SeqCst);
        })
    }
}

/// Produces [`FakeSession`]s and counts them.
#[derive(Clone, Default)]
pub struct FakeSessionFactory {
    state: Arc<FactoryState>,
    /// Liveness handles of every session produced, in construction order.
    handles: Arc<Mutex<Vec<Arc<AtomicBool>>>>,
}

impl FakeSessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of sessions ever constructed.
    pub fn constructed_count(&self) -> usize {
        self.state.constructed.load(Ordering::SeqCst)
    }

    /// Total number of sessions closed.
    pub fn closed_count(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Make subsequent `connect` calls fail with `message`.
    pub fn fail_connects(&self, message: &str) {
        *self.state.connect_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Make subsequent `connect` calls succeed again.
    pub fn allow_connects(&self) {
        *self.state.connect_failure.lock().unwrap() = None;
    }

    /// Kill the `index`-th constructed session (0-based).
    pub fn kill_session(&self, index: usize) {
        let handles = self.handles.lock().unwrap();
        handles[index].store(false, Ordering::SeqCst);
    }
}

impl SessionFactory for FakeSessionFactory {
    fn connect(&self) -> BoxFuture<'_, Result<Box<dyn RemoteSession>>> {
        Box::pin(async move {
            if let Some(msg) = self.state.connect_failure.lock().unwrap().clone() {
                return Err(BeamlineError::Connection(msg));
            }

            self.state.constructed.fetch_add(1, Ordering::SeqCst);
            let alive = Arc::new(AtomicBool::new(true));
            self.handles.lock().unwrap().push(Arc::clone(&alive));

            Ok(Box::new(FakeSession {
                state: Arc::clone(&self.state),
                alive,
                commands: Arc::new(Mutex::new(Vec::new())),
            }) as Box<dyn RemoteSession>)
        })
    }
}
