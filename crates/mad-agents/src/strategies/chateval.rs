//! ChatEval: three judges analyse independently, re-evaluate after reading
//! each other, and a moderator makes the call.
//!
//! Judges within a round share no data, so a round may fan out
//! concurrently. Round 2 and the moderator always wait for the full
//! previous round.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use scoring::{QuestionRecord, StrategyResult, Transcript};
use tracing::debug;

use super::prompts::{self, JudgeRound1Params, JudgeRound2Params, ModeratorParams, Persona};
use super::{consult, final_answer, Sampling, Strategy, StrategyKind};
use crate::gateway::GatewayClient;

pub const JUDGE_COUNT: usize = 3;

/// Token cap of the moderator's decision.
pub const MODERATOR_MAX_TOKENS: u32 = 200;

/// Judges (0-based) whose round-1 analyses judge `judge` reads in round 2,
/// in ascending order. Never includes `judge` itself.
pub fn peer_indices(judge: usize) -> [usize; 2] {
    match judge {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    }
}

pub struct ChatEvalStrategy {
    client: Arc<GatewayClient>,
    sampling: Sampling,
    parallel_fanout: bool,
}

impl ChatEvalStrategy {
    pub fn new(client: Arc<GatewayClient>, sampling: Sampling) -> Self {
        Self {
            client,
            sampling,
            parallel_fanout: false,
        }
    }

    /// Issue each judge round's calls concurrently.
    pub fn with_parallel_fanout(mut self, enabled: bool) -> Self {
        self.parallel_fanout = enabled;
        self
    }

    /// Run one judge round. On failure returns the stage name of the
    /// lowest-numbered failing judge.
    async fn judge_round(&self, round: usize, prompts: Vec<String>) -> Result<Vec<String>, String> {
        let stage = |judge: usize| format!("Judge {} Round {}", judge + 1, round);

        if self.parallel_fanout {
            let calls = prompts
                .into_iter()
                .map(|prompt| consult(&self.client, Persona::Judge, prompt, self.sampling));
            let replies = join_all(calls).await;
            debug!(round, "Judge round joined");

            replies
                .into_iter()
                .enumerate()
                .map(|(judge, reply)| reply.ok_or_else(|| stage(judge)))
                .collect()
        } else {
            let mut replies = Vec::with_capacity(prompts.len());
            for (judge, prompt) in prompts.into_iter().enumerate() {
                let reply = consult(&self.client, Persona::Judge, prompt, self.sampling)
                    .await
                    .ok_or_else(|| stage(judge))?;
                debug!(judge = judge + 1, round, "Judge responded");
                replies.push(reply);
            }
            Ok(replies)
        }
    }

    async fn evaluate(&self, question_text: &str) -> Result<Evaluation, String> {
        let opening = prompts::judge_round_1(&JudgeRound1Params { question_text });
        let round_1 = self
            .judge_round(1, vec![opening; JUDGE_COUNT])
            .await?;

        let exchange = (0..JUDGE_COUNT)
            .map(|judge| {
                let [a, b] = peer_indices(judge);
                prompts::judge_round_2(&JudgeRound2Params {
                    question_text,
                    own_round_1: &round_1[judge],
                    peers: [&round_1[a], &round_1[b]],
                })
            })
            .collect();
        let round_2 = self.judge_round(2, exchange).await?;

        let moderator_prompt = prompts::moderator(&ModeratorParams {
            question_text,
            round_1: [&round_1[0], &round_1[1], &round_1[2]],
            round_2: [&round_2[0], &round_2[1], &round_2[2]],
        });
        let decision = consult(
            &self.client,
            Persona::Moderator,
            moderator_prompt,
            self.sampling.with_max_tokens(MODERATOR_MAX_TOKENS),
        )
        .await
        .ok_or_else(|| "Moderator synthesis".to_string())?;

        Ok(Evaluation {
            round_1,
            round_2,
            decision,
        })
    }
}

struct Evaluation {
    round_1: Vec<String>,
    round_2: Vec<String>,
    decision: String,
}

impl Evaluation {
    fn transcript(&self, question_text: &str) -> Transcript {
        let mut t = Transcript::new();
        t.turn("ORIGINAL QUESTION", question_text)
            .heading("ROUND 1: INDEPENDENT EVALUATIONS");
        for (i, text) in self.round_1.iter().enumerate() {
            t.turn(format!("JUDGE {} (Initial)", i + 1), text.as_str());
        }
        t.heading("ROUND 2: RE-EVALUATION AFTER EXCHANGE");
        for (i, text) in self.round_2.iter().enumerate() {
            t.turn(format!("JUDGE {} (Revised)", i + 1), text.as_str());
        }
        t.heading("FINAL SYNTHESIS")
            .turn("MODERATOR (Final Decision)", self.decision.as_str());
        t
    }
}

#[async_trait]
impl Strategy for ChatEvalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ChatEval
    }

    async fn decide(&self, question: &QuestionRecord) -> StrategyResult {
        let question_text = question.formatted();
        match self.evaluate(&question_text).await {
            Ok(evaluation) => StrategyResult::decided(
                final_answer(Persona::Moderator, &evaluation.decision),
                &evaluation.transcript(&question_text),
            ),
            Err(stage) => StrategyResult::failed(&stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peers_exclude_self_and_ascend() {
        for judge in 0..JUDGE_COUNT {
            let peers = peer_indices(judge);
            assert!(!peers.contains(&judge));
            assert!(peers[0] < peers[1]);
        }
        assert_eq!(peer_indices(1), [0, 2]);
    }
}
