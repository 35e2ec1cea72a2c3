//! Token secrets and the per-client token lifecycle state.

pub mod secret;
pub mod state;
