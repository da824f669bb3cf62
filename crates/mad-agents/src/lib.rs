//! Multi-agent debate benchmark.
//!
//! Runs LLM collaboration strategies against a multiple-choice benchmark
//! through an OpenAI-compatible chat endpoint and scores them with the
//! [`scoring`] crate.
//!
//! # Modules
//!
//! - [`gateway`]: chat backend trait, HTTP backend, counting client
//! - [`strategies`]: Single-Agent, Society of Minds, Angel & Demon, ChatEval
//! - [`dataset`]: local snapshots and the datasets-server hub client
//! - [`evaluator`]: the per-question evaluation loop
//! - [`config`]: TOML/env configuration
//! - [`errors`]: typed error enums per subsystem

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod dataset;
pub mod errors;
pub mod evaluator;
pub mod gateway;
pub mod strategies;

pub use config::{BenchConfig, DatasetSettings, DatasetSource, EvaluationSettings, GatewaySettings};
pub use dataset::{Dataset, HubClient};
pub use errors::{ConfigError, DatasetError, EvalError, GatewayError};
pub use evaluator::{EvaluationRun, Evaluator};
pub use gateway::{ChatBackend, ChatRequest, GatewayClient, Message, OpenAiCompatBackend, Role};
pub use strategies::{build_strategy, Sampling, Strategy, StrategyKind};
