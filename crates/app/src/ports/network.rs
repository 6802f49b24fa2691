//! Network ports: session teardown, WiFi disconnect and addressing mode.
//!
//! Teardown is started by the engine and then driven to completion by
//! polling the returned [`Teardown`] token.

/// Progress reported by a [`Teardown`] token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStatus {
    InProgress,
    Complete,
}

/// Completion token for a teardown that is already under way.
pub trait Teardown: Send {
    /// Advance the teardown by one step and report whether it has finished.
    fn poll(&mut self) -> TeardownStatus;
}

/// Closes the transport session to the backend (server or multicast socket).
pub trait SessionTeardown: Send + Sync {
    fn close_session(&self) -> Box<dyn Teardown>;
}

/// Drops the WiFi association so it is re-established with new parameters.
pub trait WifiTeardown: Send + Sync {
    fn disconnect(&self) -> Box<dyn Teardown>;
}

/// Reports whether static addressing is the active addressing mode.
pub trait AddressingMode: Send + Sync {
    fn is_static_active(&self) -> bool;
}
