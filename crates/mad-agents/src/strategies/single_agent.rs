//! Single-agent baseline: one call, one answer.

use std::sync::Arc;

use async_trait::async_trait;
use scoring::{QuestionRecord, StrategyResult, Transcript};
use tracing::debug;

use super::prompts::{self, Persona};
use super::{consult, final_answer, Sampling, Strategy, StrategyKind};
use crate::gateway::GatewayClient;

/// Direct mode asks for the tag line only, so it runs cool and short.
const DIRECT_SAMPLING: Sampling = Sampling {
    temperature: 0.1,
    max_tokens: 50,
};

pub struct SingleAgentStrategy {
    client: Arc<GatewayClient>,
    persona: Persona,
    sampling: Sampling,
}

impl SingleAgentStrategy {
    /// Answer-only mode (the default baseline).
    pub fn direct(client: Arc<GatewayClient>) -> Self {
        Self {
            client,
            persona: Persona::DirectAnswerer,
            sampling: DIRECT_SAMPLING,
        }
    }

    /// Reason step by step before the tag line. Takes the configured
    /// `max_tokens`, not the direct mode's cap of 50.
    pub fn step_by_step(client: Arc<GatewayClient>, sampling: Sampling) -> Self {
        Self {
            client,
            persona: Persona::StepByStepSolver,
            sampling: DIRECT_SAMPLING.with_max_tokens(sampling.max_tokens),
        }
    }
}

#[async_trait]
impl Strategy for SingleAgentStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SingleAgent
    }

    async fn decide(&self, question: &QuestionRecord) -> StrategyResult {
        let user = prompts::single_agent_user(&question.formatted());

        let Some(response) = consult(&self.client, self.persona, user, self.sampling).await else {
            return StrategyResult::failed("API call");
        };
        debug!(persona = %self.persona, "Single agent responded");

        // debate_log is the response as one `AGENT:` turn, not the bare text.
        let mut transcript = Transcript::new();
        transcript.turn("AGENT", response.as_str());
        StrategyResult::decided(final_answer(self.persona, &response), &transcript)
    }
}
