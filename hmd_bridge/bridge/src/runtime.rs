use hmd_bridge_common::*;
use log::*;
use parking_lot::Mutex;
use std::sync::Arc;

const TRACE_CONTEXT: &str = "Runtime loader";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RuntimeStatus {
    Unloaded,
    Failed,
    Initialized,
}

impl RuntimeStatus {
    // Failed and Initialized are terminal: a runtime is never initialized twice.
    pub fn next(self, initialize_succeeded: bool) -> Self {
        match self {
            Self::Unloaded if initialize_succeeded => Self::Initialized,
            Self::Unloaded => Self::Failed,
            terminal => terminal,
        }
    }
}

/// Process level entry points of a vendor runtime.
pub trait RuntimeApi {
    fn name(&self) -> &'static str;

    fn initialize(&self) -> StrResult;

    fn shutdown(&self);
}

struct LoaderState {
    status: RuntimeStatus,
    live_sessions: usize,
    shut_down: bool,
}

/// Owns a vendor runtime and decides when it gets initialized and shut down. One context
/// should exist per backend per process; sessions share it through an `Arc`.
pub struct RuntimeContext<A: RuntimeApi> {
    api: A,
    state: Mutex<LoaderState>,
}

impl<A: RuntimeApi> RuntimeContext<A> {
    pub fn new(api: A) -> Arc<Self> {
        Arc::new(Self {
            api,
            state: Mutex::new(LoaderState {
                status: RuntimeStatus::Unloaded,
                live_sessions: 0,
                shut_down: false,
            }),
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Outcome of the one initialization attempt. It stays `Initialized` after the last session
    /// shut the runtime down; check `is_shut_down`, or use `initialize_library`, to know whether
    /// the runtime is still usable.
    pub fn status(&self) -> RuntimeStatus {
        self.state.lock().status
    }

    pub fn live_sessions(&self) -> usize {
        self.state.lock().live_sessions
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().shut_down
    }

    /// Initializes the runtime on the first call only. Later calls return the cached outcome.
    pub fn initialize_library(&self) -> bool {
        let mut state = self.state.lock();

        if state.status == RuntimeStatus::Unloaded {
            let result = self.api.initialize();
            match &result {
                Ok(()) => info!("{} runtime initialized", self.api.name()),
                Err(e) => error!("Unable to init {} runtime: {}", self.api.name(), e),
            }
            state.status = state.status.next(result.is_ok());
        }

        state.status == RuntimeStatus::Initialized && !state.shut_down
    }

    fn release_session(&self) {
        let mut state = self.state.lock();
        state.live_sessions = state.live_sessions.saturating_sub(1);

        if state.live_sessions == 0 && !state.shut_down {
            self.api.shutdown();
            state.shut_down = true;
            info!("{} runtime shut down", self.api.name());
        }
    }
}

impl<A: RuntimeApi> Drop for RuntimeContext<A> {
    // Covers probe-only usage: the runtime was initialized but no session ever released it.
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.status == RuntimeStatus::Initialized && !state.shut_down {
            self.api.shutdown();
            state.shut_down = true;
        }
    }
}

/// Keeps the runtime alive for one device session. The runtime is shut down when the last
/// lease is dropped, so a session must drop its vendor resources before its lease.
pub struct SessionLease<A: RuntimeApi> {
    context: Arc<RuntimeContext<A>>,
}

impl<A: RuntimeApi> SessionLease<A> {
    pub fn acquire(context: &Arc<RuntimeContext<A>>) -> BridgeResult<Self> {
        if !context.initialize_library() {
            return trace_kind!(
                RuntimeUnavailable,
                "{} runtime could not initialize",
                context.api.name()
            );
        }

        context.state.lock().live_sessions += 1;

        Ok(Self {
            context: context.clone(),
        })
    }

    pub fn api(&self) -> &A {
        &self.context.api
    }
}

impl<A: RuntimeApi> Drop for SessionLease<A> {
    fn drop(&mut self) {
        self.context.release_session();
    }
}
