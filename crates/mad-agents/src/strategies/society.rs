//! Society of Minds: a five-stage linear pipeline of specialists.
//!
//! Each stage sees the question plus every earlier stage's output, in order.
//! Only the Integrator's output is parsed for the answer.

use std::sync::Arc;

use async_trait::async_trait;
use scoring::{QuestionRecord, StrategyResult, Transcript};
use tracing::debug;

use super::prompts::{self, Persona, SomStageParams};
use super::{consult, final_answer, Sampling, Strategy, StrategyKind};
use crate::gateway::GatewayClient;

/// Token cap of the Integrator, which answers with the tag line only.
pub const INTEGRATOR_MAX_TOKENS: u32 = 50;

/// Pipeline order.
pub const STAGES: [Persona; 5] = [
    Persona::Decomposer,
    Persona::Expert,
    Persona::Reasoner,
    Persona::Critic,
    Persona::Integrator,
];

pub struct SocietyOfMindsStrategy {
    client: Arc<GatewayClient>,
    sampling: Sampling,
}

impl SocietyOfMindsStrategy {
    pub fn new(client: Arc<GatewayClient>, sampling: Sampling) -> Self {
        Self { client, sampling }
    }

    fn sampling_for(&self, stage: Persona) -> Sampling {
        if stage == Persona::Integrator {
            self.sampling.with_max_tokens(INTEGRATOR_MAX_TOKENS)
        } else {
            self.sampling
        }
    }
}

#[async_trait]
impl Strategy for SocietyOfMindsStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Som
    }

    async fn decide(&self, question: &QuestionRecord) -> StrategyResult {
        let question_text = question.formatted();
        let mut outputs: Vec<String> = Vec::with_capacity(STAGES.len());

        for stage in STAGES {
            let input = prompts::som_stage_input(&SomStageParams {
                question_text: &question_text,
                prior_outputs: &outputs,
            });
            match consult(&self.client, stage, input, self.sampling_for(stage)).await {
                Some(output) => {
                    debug!(stage = %stage, chars = output.len(), "SoM stage complete");
                    outputs.push(output);
                }
                None => return StrategyResult::failed(stage.display_name()),
            }
        }

        let mut transcript = Transcript::new();
        transcript.turn("QUESTION", question_text.as_str());
        for (stage, output) in STAGES.iter().zip(&outputs) {
            transcript.turn(stage.display_name().to_uppercase(), output.as_str());
        }

        let answer = outputs
            .last()
            .and_then(|integrated| final_answer(Persona::Integrator, integrated));
        StrategyResult::decided(answer, &transcript)
    }
}
