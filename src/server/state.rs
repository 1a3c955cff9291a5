use crate::area::AreaResolver;

/// Shared server state. The resolver is read-only, so no lock is needed.
pub struct AppState {
    pub resolver: AreaResolver,
}
