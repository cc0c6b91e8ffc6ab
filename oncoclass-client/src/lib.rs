//! Oncoclass Job Client
//!
//! Runs long-running analyses (bulk classification, t-SNE, confidence
//! intervals) on the Oncoclass backend. The backend executes work out of
//! band: a submission returns a `resultURL`, which is polled until it stops
//! answering "processing" (status 201 by default).
//!
//! Every run resolves to a `JobOutcome`. Failures never propagate as errors;
//! they are reported once through a `Notifier` and reflected in the
//! outcome's `reason`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use oncoclass_client::{AsyncJobRunner, CancellationToken, JobPayload, LogNotifier, PollConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let runner = AsyncJobRunner::http(PollConfig::default(), Arc::new(LogNotifier));
//!     let token = CancellationToken::new();
//!
//!     let outcome = runner
//!         .run(
//!             "http://localhost:5000/confidence",
//!             JobPayload::Json(serde_json::json!({ "samples": [], "interval": 95 })),
//!             &token,
//!         )
//!         .await;
//!
//!     if outcome.success {
//!         println!("{:?}", outcome.results);
//!     }
//! }
//! ```

pub mod analysis;
pub mod cancel;
pub mod config;
pub mod error;
pub mod notify;
pub mod poller;
pub mod runner;
pub mod submit;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use analysis::AnalysisClient;
pub use cancel::{CancelOnDrop, CancellationToken};
pub use config::PollConfig;
pub use error::{ClientError, JobError, Result};
pub use notify::{LogNotifier, Notifier, WarningModal};
pub use oncoclass_core::domain::job::{FailureReason, JobOutcome};
pub use poller::{PollOutcome, ResultPoller};
pub use runner::AsyncJobRunner;
pub use submit::{JobHandle, JobSubmitter};
pub use transport::{HttpTransport, JobPayload, JobTransport, TransportResponse};
