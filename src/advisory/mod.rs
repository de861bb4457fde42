pub mod controller;
pub mod fetcher;
pub mod gemini;
pub mod provider;

pub use controller::{AdvisoryController, AdvisoryInputs, AdvisoryState};
pub use fetcher::{AdvisoryFetcher, OBSERVATION_WINDOW};
pub use gemini::GeminiProvider;
pub use provider::{AdvisoryProvider, ReadingSummary, SummaryValue};
