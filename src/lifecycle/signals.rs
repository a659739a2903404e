//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGQUIT, SIGHUP)
//! - Translate signals to internal events
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown

use std::io;

/// What the process should do in response to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Shutdown,
    Reload,
}

#[cfg(unix)]
mod imp {
    use super::SignalEvent;
    use std::io;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    pub struct Signals {
        terminate: Signal,
        interrupt: Signal,
        quit: Signal,
        hangup: Signal,
    }

    impl Signals {
        pub fn register() -> io::Result<Self> {
            Ok(Self {
                terminate: signal(SignalKind::terminate())?,
                interrupt: signal(SignalKind::interrupt())?,
                quit: signal(SignalKind::quit())?,
                hangup: signal(SignalKind::hangup())?,
            })
        }

        pub async fn recv(&mut self) -> SignalEvent {
            tokio::select! {
                _ = self.terminate.recv() => SignalEvent::Shutdown,
                _ = self.interrupt.recv() => SignalEvent::Shutdown,
                _ = self.quit.recv() => SignalEvent::Shutdown,
                _ = self.hangup.recv() => SignalEvent::Reload,
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::SignalEvent;
    use std::io;

    pub struct Signals;

    impl Signals {
        pub fn register() -> io::Result<Self> {
            Ok(Self)
        }

        pub async fn recv(&mut self) -> SignalEvent {
            let _ = tokio::signal::ctrl_c().await;
            SignalEvent::Shutdown
        }
    }
}

/// Registered process signal handlers.
pub struct Signals(imp::Signals);

impl Signals {
    /// Install the handlers. Must be called from within a Tokio runtime.
    pub fn register() -> io::Result<Self> {
        imp::Signals::register().map(Self)
    }

    /// Wait for the next signal of interest.
    pub async fn recv(&mut self) -> SignalEvent {
        self.0.recv().await
    }
}
