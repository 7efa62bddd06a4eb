//! Application Services
//!
//! - `CredentialService`: cached-or-issued credential pair
//! - `TickDispatcher`: fire-and-forget tick batch processing
//! - `StreamSession`: reactions to ticker lifecycle events

mod credentials;
mod dispatch;
mod session;

pub use credentials::{AcquireError, AcquiredCredentials, CredentialService, CredentialSource};
pub use dispatch::{DispatchStats, TickDispatcher};
pub use session::{CloseInfo, SessionSummary, StreamSession};
