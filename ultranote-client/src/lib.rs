#![deny(missing_docs)]
//! HTTP client and generation orchestrator for ultranote.
//!
//! [`NotesClient`] posts a prompt to a Stream Source and decodes the SSE
//! response body. [`Orchestrator`] runs at most one generation at a time and
//! forwards increments into a [`Sink`](ultranote_types::Sink).
//!
//! ```no_run
//! use std::sync::Arc;
//! use ultranote_client::{NotesClient, Orchestrator};
//! use ultranote_types::{Mode, OutputAccumulator};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let output = Arc::new(OutputAccumulator::new());
//! let client = NotesClient::new("https://example.supabase.co/functions/v1/generate-notes")
//!     .api_key("public-anon-key");
//! let orchestrator = Orchestrator::new(client, output.clone());
//!
//! let generation = orchestrator.submit("Photosynthesis", Mode::Summarise)?;
//! generation.wait().await?;
//! println!("{}", output.text());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub(crate) mod error;
pub mod orchestrator;

pub use client::NotesClient;
pub use config::{ClientConfig, ConfigError};
pub use orchestrator::{Generation, GenerationOutcome, Orchestrator};
