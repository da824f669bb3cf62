//! Angel & Demon: three rounds of defense and critique, then the Angel
//! alone commits to an answer.
//!
//! ```text
//! Round 1: Angel analysis  → Demon critique
//! Round 2: Angel defense   → Demon deeper critique
//! Round 3: Angel consolidation → Demon final challenge
//! Final:   Angel synthesis (only output parsed)
//! ```
//!
//! Every prompt carries the question and the full prior history. The Demon
//! is consulted but never decides.

use std::sync::Arc;

use async_trait::async_trait;
use scoring::{QuestionRecord, StrategyResult, Transcript};
use tracing::debug;

use super::prompts::{
    self, AngelRound1Params, AngelRound2Params, AngelRound3Params, AngelSynthesisParams,
    DemonRound1Params, DemonRound2Params, DemonRound3Params, Persona,
};
use super::{consult, final_answer, Sampling, Strategy, StrategyKind};
use crate::gateway::GatewayClient;

/// Token cap of the synthesis call, which leads with the tag line.
pub const SYNTHESIS_MAX_TOKENS: u32 = 100;

pub struct AngelDemonStrategy {
    client: Arc<GatewayClient>,
    sampling: Sampling,
}

impl AngelDemonStrategy {
    pub fn new(client: Arc<GatewayClient>, sampling: Sampling) -> Self {
        Self { client, sampling }
    }

    /// One debate call; the error names the failed stage.
    async fn turn(
        &self,
        persona: Persona,
        prompt: String,
        stage: &'static str,
    ) -> Result<String, &'static str> {
        match consult(&self.client, persona, prompt, self.sampling).await {
            Some(text) => {
                debug!(stage, chars = text.len(), "Debate turn complete");
                Ok(text)
            }
            None => Err(stage),
        }
    }

    async fn debate(&self, question_text: &str) -> Result<DebateRecord, &'static str> {
        let angel_1 = self
            .turn(
                Persona::Angel,
                prompts::angel_round_1(&AngelRound1Params { question_text }),
                "Angel Round 1",
            )
            .await?;

        let demon_1 = self
            .turn(
                Persona::Demon,
                prompts::demon_round_1(&DemonRound1Params {
                    question_text,
                    angel_1: &angel_1,
                }),
                "Demon Round 1",
            )
            .await?;

        let angel_2 = self
            .turn(
                Persona::Angel,
                prompts::angel_round_2(&AngelRound2Params {
                    question_text,
                    angel_1: &angel_1,
                    demon_1: &demon_1,
                }),
                "Angel Round 2",
            )
            .await?;

        let demon_2 = self
            .turn(
                Persona::Demon,
                prompts::demon_round_2(&DemonRound2Params {
                    question_text,
                    angel_1: &angel_1,
                    demon_1: &demon_1,
                    angel_2: &angel_2,
                }),
                "Demon Round 2",
            )
            .await?;

        let angel_3 = self
            .turn(
                Persona::Angel,
                prompts::angel_round_3(&AngelRound3Params {
                    question_text,
                    angel_1: &angel_1,
                    demon_1: &demon_1,
                    angel_2: &angel_2,
                    demon_2: &demon_2,
                }),
                "Angel Round 3",
            )
            .await?;

        let demon_3 = self
            .turn(
                Persona::Demon,
                prompts::demon_round_3(&DemonRound3Params {
                    question_text,
                    angel_1: &angel_1,
                    demon_1: &demon_1,
                    angel_2: &angel_2,
                    demon_2: &demon_2,
                    angel_3: &angel_3,
                }),
                "Demon Round 3",
            )
            .await?;

        let synthesis_prompt = prompts::angel_synthesis(&AngelSynthesisParams {
            question_text,
            angel_1: &angel_1,
            demon_1: &demon_1,
            angel_2: &angel_2,
            demon_2: &demon_2,
            angel_3: &angel_3,
            demon_3: &demon_3,
        });
        let synthesis = consult(
            &self.client,
            Persona::Angel,
            synthesis_prompt,
            self.sampling.with_max_tokens(SYNTHESIS_MAX_TOKENS),
        )
        .await
        .ok_or("Final synthesis")?;

        Ok(DebateRecord {
            angel: [angel_1, angel_2, angel_3],
            demon: [demon_1, demon_2, demon_3],
            synthesis,
        })
    }
}

/// All seven turns of a completed debate.
struct DebateRecord {
    angel: [String; 3],
    demon: [String; 3],
    synthesis: String,
}

impl DebateRecord {
    fn transcript(&self, question_text: &str) -> Transcript {
        let [angel_1, angel_2, angel_3] = &self.angel;
        let [demon_1, demon_2, demon_3] = &self.demon;

        let mut t = Transcript::new();
        t.turn("ORIGINAL QUESTION", question_text)
            .heading("ROUND 1: INITIAL POSITIONS")
            .turn("ANGEL (Initial Analysis)", angel_1.as_str())
            .turn("DEMON (First Critique)", demon_1.as_str())
            .heading("ROUND 2: DEFENSE & COUNTER")
            .turn("ANGEL (Defense)", angel_2.as_str())
            .turn("DEMON (Deeper Critique)", demon_2.as_str())
            .heading("ROUND 3: FINAL ARGUMENTS")
            .turn("ANGEL (Consolidation)", angel_3.as_str())
            .turn("DEMON (Final Challenge)", demon_3.as_str())
            .heading("FINAL SYNTHESIS")
            .turn("ANGEL (Final Decision)", self.synthesis.as_str());
        t
    }
}

#[async_trait]
impl Strategy for AngelDemonStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AngelDemon
    }

    async fn decide(&self, question: &QuestionRecord) -> StrategyResult {
        let question_text = question.formatted();
        match self.debate(&question_text).await {
            Ok(record) => StrategyResult::decided(
                final_answer(Persona::Angel, &record.synthesis),
                &record.transcript(&question_text),
            ),
            Err(stage) => StrategyResult::failed(stage),
        }
    }
}
