//! Personalized advice for a retirement plan
//!
//! The advice service is an external collaborator: it receives the validated
//! plan (never the projection) and answers with free text or a failure.
//! Nothing in the validator or the engine depends on it.

mod client;
mod error;
mod http;
mod prompt;
mod session;

pub use client::AdviceProvider;
pub use error::AdviceError;
pub use http::HttpAdviceClient;
pub use prompt::{AdvicePrompt, ADVISOR_PROMPT};
pub use session::{AdviceOutcome, AdviceSession, PendingAdvice};
