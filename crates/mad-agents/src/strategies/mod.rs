//! Debate strategies.
//!
//! Every strategy is a fixed protocol of chained gateway calls behind the
//! [`Strategy`] trait. A failed call aborts the protocol for that question
//! with a `"<stage> failed"` log; nothing is retried.
//!
//! | Strategy       | Module         | Calls / question |
//! |----------------|----------------|------------------|
//! | `single_agent` | `single_agent` | 1 |
//! | `som`          | `society`      | 5 |
//! | `angel_demon`  | `angel_demon`  | 7 |
//! | `chateval`     | `chateval`     | 7 |

pub mod angel_demon;
pub mod chateval;
pub mod prompts;
pub mod single_agent;
pub mod society;

use std::sync::Arc;

use async_trait::async_trait;
use scoring::{extract_with_rule, QuestionRecord, StrategyResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EvaluationSettings;
use crate::gateway::{GatewayClient, Message};

pub use angel_demon::AngelDemonStrategy;
pub use chateval::ChatEvalStrategy;
pub use prompts::Persona;
pub use single_agent::SingleAgentStrategy;
pub use society::SocietyOfMindsStrategy;

/// A multi-agent protocol that answers one question.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Run the protocol. Never fails: gateway failures surface as a
    /// `"<stage> failed"` result with no answer.
    async fn decide(&self, question: &QuestionRecord) -> StrategyResult;
}

/// Strategy selection, from the CLI or the config file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum StrategyKind {
    /// One direct call.
    #[serde(rename = "single_agent")]
    #[value(name = "single_agent")]
    SingleAgent,
    /// Decomposer → Expert → Reasoner → Critic → Integrator.
    #[serde(rename = "som")]
    #[value(name = "som")]
    Som,
    /// Three-round adversarial debate plus synthesis.
    #[serde(rename = "angel_demon")]
    #[value(name = "angel_demon")]
    AngelDemon,
    /// Three judges, two rounds, one moderator.
    #[serde(rename = "chateval")]
    #[value(name = "chateval")]
    ChatEval,
}

impl StrategyKind {
    pub fn all() -> [Self; 4] {
        [Self::SingleAgent, Self::Som, Self::AngelDemon, Self::ChatEval]
    }

    /// Name used in logs and run-log file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleAgent => "single_agent",
            Self::Som => "som",
            Self::AngelDemon => "angel_demon",
            Self::ChatEval => "chateval",
        }
    }

    /// Gateway calls per question when nothing fails.
    pub fn calls_per_question(&self) -> u64 {
        match self {
            Self::SingleAgent => 1,
            Self::Som => 5,
            Self::AngelDemon | Self::ChatEval => 7,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SingleAgent => "Single agent answering directly (baseline)",
            Self::Som => "Society of Minds: five specialists in a linear pipeline",
            Self::AngelDemon => "Angel & Demon: three-round adversarial debate with synthesis",
            Self::ChatEval => "ChatEval: three judges, peer exchange, moderator decision",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sampling parameters for non-final calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Sampling {
    /// Same temperature, different token cap.
    pub fn with_max_tokens(self, max_tokens: u32) -> Self {
        Self { max_tokens, ..self }
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 500,
        }
    }
}

impl From<&EvaluationSettings> for Sampling {
    fn from(settings: &EvaluationSettings) -> Self {
        Self {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Build the strategy selected by `kind`.
pub fn build_strategy(
    kind: StrategyKind,
    client: Arc<GatewayClient>,
    settings: &EvaluationSettings,
) -> Box<dyn Strategy> {
    let sampling = Sampling::from(settings);
    match kind {
        StrategyKind::SingleAgent => {
            let strategy = if settings.single_agent_step_by_step {
                SingleAgentStrategy::step_by_step(client, sampling)
            } else {
                SingleAgentStrategy::direct(client)
            };
            Box::new(strategy)
        }
        StrategyKind::Som => Box::new(SocietyOfMindsStrategy::new(client, sampling)),
        StrategyKind::AngelDemon => Box::new(AngelDemonStrategy::new(client, sampling)),
        StrategyKind::ChatEval => Box::new(
            ChatEvalStrategy::new(client, sampling).with_parallel_fanout(settings.parallel_fanout),
        ),
    }
}

/// One persona call: its system prompt plus `user_content`.
pub(crate) async fn consult(
    client: &GatewayClient,
    persona: Persona,
    user_content: String,
    sampling: Sampling,
) -> Option<String> {
    let messages = vec![
        Message::system(persona.system_prompt()),
        Message::user(user_content),
    ];
    client
        .call(messages, sampling.temperature, sampling.max_tokens)
        .await
}

/// Parse the deciding persona's response for the chosen option.
pub(crate) fn final_answer(persona: Persona, response: &str) -> Option<u8> {
    debug_assert!(persona.decides(), "{} has no decision authority", persona);
    match extract_with_rule(Some(response)) {
        Some((answer, rule)) => {
            debug!(persona = %persona, answer, rule = ?rule, "Final answer extracted");
            Some(answer)
        }
        None => {
            debug!(persona = %persona, "No final answer in response");
            None
        }
    }
}
