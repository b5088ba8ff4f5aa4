use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    /// The map never signalled readiness within the configured window.
    #[error("map was not ready after {}ms", waited.as_millis())]
    MapReadyTimeout { waited: Duration },

    /// The readiness signal was dropped before the map became ready.
    #[error("map readiness signal closed before the map became ready")]
    MapReadySignalClosed,
}
