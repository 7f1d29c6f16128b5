pub mod client;
pub mod gate;
pub mod jwt;
pub mod session;
pub mod store;

pub use client::{AuthClient, SignUpOutcome};
pub use gate::AuthGate;
pub use session::{AuthUser, Session};
pub use store::SessionStore;
