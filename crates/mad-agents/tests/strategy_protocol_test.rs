//! Protocol-level tests for every strategy against a scripted backend.
//!
//! Checks call counts, what each stage sees, token caps of the deciding
//! calls and the `"<stage> failed"` abort path.

mod common;

use common::{client_for, question, ScriptedBackend};
use mad_agents::strategies::angel_demon::SYNTHESIS_MAX_TOKENS;
use mad_agents::strategies::chateval::MODERATOR_MAX_TOKENS;
use mad_agents::strategies::society::INTEGRATOR_MAX_TOKENS;
use mad_agents::strategies::{
    AngelDemonStrategy, ChatEvalStrategy, Persona, SingleAgentStrategy, SocietyOfMindsStrategy,
};
use mad_agents::{Role, Sampling, Strategy, StrategyKind};

// ── Single agent ───────────────────────────────────────────────────

#[tokio::test]
async fn test_single_agent_direct_is_one_short_call() {
    let backend = ScriptedBackend::replying("FINAL_ANSWER: 4");
    let client = client_for(&backend);
    let strategy = SingleAgentStrategy::direct(client.clone());
    let q = question("astronomy", 4);

    let result = strategy.decide(&q).await;

    assert_eq!(result.final_answer, Some(4));
    assert_eq!(client.api_calls(), 1);

    let request = &backend.requests()[0];
    assert_eq!(request.max_tokens, 50);
    assert_eq!(
        request.content_of(Role::System),
        Some(Persona::DirectAnswerer.system_prompt())
    );
    let user = request.content_of(Role::User).unwrap();
    assert!(user.starts_with(&q.formatted()));
    assert!(user.ends_with("Your answer (format: FINAL_ANSWER: [0-9]):"));
    assert_eq!(result.debate_log, "AGENT:\nFINAL_ANSWER: 4");
}

#[tokio::test]
async fn test_single_agent_step_by_step_uses_configured_budget() {
    let backend = ScriptedBackend::replying("Jupiter is the largest. FINAL_ANSWER: 4");
    let client = client_for(&backend);
    let strategy = SingleAgentStrategy::step_by_step(client, Sampling::default());

    let result = strategy.decide(&question("astronomy", 4)).await;

    assert_eq!(result.final_answer, Some(4));
    let request = &backend.requests()[0];
    assert_eq!(request.max_tokens, Sampling::default().max_tokens);
    assert_ne!(request.max_tokens, 50);
    assert_eq!(
        request.content_of(Role::System),
        Some(Persona::StepByStepSolver.system_prompt())
    );
    assert_eq!(
        result.debate_log,
        "AGENT:\nJupiter is the largest. FINAL_ANSWER: 4"
    );
}

// ── Society of Minds ───────────────────────────────────────────────

#[tokio::test]
async fn test_society_stage_sees_question_and_all_prior_outputs() {
    let backend = ScriptedBackend::new(|i, _| {
        Ok(if i < 4 {
            format!("stage {} output", i + 1)
        } else {
            "FINAL_ANSWER: 4".to_string()
        })
    });
    let client = client_for(&backend);
    let strategy = SocietyOfMindsStrategy::new(client.clone(), Sampling::default());
    let q = question("astronomy", 4);
    let question_text = q.formatted();

    let result = strategy.decide(&q).await;

    assert_eq!(result.final_answer, Some(4));
    assert_eq!(client.api_calls(), 5);

    let requests = backend.requests();
    let personas = [
        Persona::Decomposer,
        Persona::Expert,
        Persona::Reasoner,
        Persona::Critic,
        Persona::Integrator,
    ];
    for (k, request) in requests.iter().enumerate() {
        let mut expected = vec![question_text.clone()];
        expected.extend((1..=k).map(|n| format!("stage {} output", n)));
        assert_eq!(request.content_of(Role::User), Some(expected.join("\n\n").as_str()));
        assert_eq!(request.content_of(Role::System), Some(personas[k].system_prompt()));
    }
    assert_eq!(requests[4].max_tokens, INTEGRATOR_MAX_TOKENS);
    assert_eq!(requests[0].max_tokens, Sampling::default().max_tokens);

    assert!(result.debate_log.starts_with("QUESTION:"));
    assert!(result.debate_log.contains("INTEGRATOR:\nFINAL_ANSWER: 4"));
}

#[tokio::test]
async fn test_society_aborts_at_failed_stage() {
    let backend = ScriptedBackend::failing_at(2, "analysis");
    let strategy = SocietyOfMindsStrategy::new(client_for(&backend), Sampling::default());

    let result = strategy.decide(&question("astronomy", 4)).await;

    assert_eq!(result.debate_log, "Reasoner failed");
    assert_eq!(result.final_answer, None);
    assert_eq!(backend.call_count(), 3);
}

// ── Angel & Demon ──────────────────────────────────────────────────

#[tokio::test]
async fn test_demon_round_one_failure_aborts_after_two_calls() {
    let backend = ScriptedBackend::failing_at(1, "I think the answer is 4.");
    let strategy = AngelDemonStrategy::new(client_for(&backend), Sampling::default());

    let result = strategy.decide(&question("astronomy", 4)).await;

    assert_eq!(result.debate_log, "Demon Round 1 failed");
    assert_eq!(result.final_answer, None);
    assert_eq!(backend.call_count(), 2);
}

fn debate_reply(i: usize) -> String {
    match i {
        6 => "FINAL_ANSWER: 4\nJupiter survives every challenge.".to_string(),
        // the demon cites another digit; only the synthesis is parsed
        1 | 3 | 5 => format!("critique {} suggests option 3", i),
        _ => format!("argument {} for Jupiter", i),
    }
}

#[tokio::test]
async fn test_angel_demon_full_debate() {
    let backend = ScriptedBackend::new(|i, _| Ok(debate_reply(i)));
    let client = client_for(&backend);
    let strategy = AngelDemonStrategy::new(client.clone(), Sampling::default());
    let q = question("astronomy", 4);

    let result = strategy.decide(&q).await;

    assert_eq!(result.final_answer, Some(4));
    assert_eq!(client.api_calls(), StrategyKind::AngelDemon.calls_per_question());

    let requests = backend.requests();
    let expected_personas = [
        Persona::Angel,
        Persona::Demon,
        Persona::Angel,
        Persona::Demon,
        Persona::Angel,
        Persona::Demon,
        Persona::Angel,
    ];
    for (request, persona) in requests.iter().zip(expected_personas) {
        assert_eq!(request.content_of(Role::System), Some(persona.system_prompt()));
        assert!(request.content_of(Role::User).unwrap().contains(&q.formatted()));
    }

    let synthesis = &requests[6];
    assert_eq!(synthesis.max_tokens, SYNTHESIS_MAX_TOKENS);
    let synthesis_prompt = synthesis.content_of(Role::User).unwrap();
    for i in 0..6 {
        assert!(synthesis_prompt.contains(&debate_reply(i)), "turn {} missing", i);
    }

    for label in [
        "ROUND 1: INITIAL POSITIONS",
        "DEMON (First Critique)",
        "ROUND 3: FINAL ARGUMENTS",
        "ANGEL (Final Decision)",
    ] {
        assert!(result.debate_log.contains(label), "missing {}", label);
    }
}

#[tokio::test]
async fn test_synthesis_failure_is_named() {
    let backend = ScriptedBackend::failing_at(6, "argument");
    let strategy = AngelDemonStrategy::new(client_for(&backend), Sampling::default());

    let result = strategy.decide(&question("astronomy", 4)).await;

    assert_eq!(result.debate_log, "Final synthesis failed");
    assert_eq!(backend.call_count(), 7);
}

// ── ChatEval ───────────────────────────────────────────────────────

fn judge_replies(i: usize) -> String {
    match i {
        0..=2 => format!("JUDGE-{} INITIAL VIEW", i + 1),
        3..=5 => format!("judge {} revised: FINAL_ANSWER: 4", i - 2),
        _ => "FINAL_ANSWER: 4".to_string(),
    }
}

async fn assert_chateval_exchange(strategy: ChatEvalStrategy, backend: &ScriptedBackend) {
    let result = strategy.decide(&question("astronomy", 4)).await;
    assert_eq!(result.final_answer, Some(4));

    let requests = backend.requests();
    assert_eq!(requests.len(), 7);

    let opening = requests[0].content_of(Role::User).unwrap();
    for request in &requests[..3] {
        assert_eq!(request.content_of(Role::System), Some(Persona::Judge.system_prompt()));
        assert_eq!(request.content_of(Role::User), Some(opening));
    }

    // (request index, own judge, the two peers in order)
    for (index, own, peers) in [(3, 1, [2, 3]), (4, 2, [1, 3]), (5, 3, [1, 2])] {
        let prompt = requests[index].content_of(Role::User).unwrap();
        assert!(prompt.contains(&format!(
            "You previously provided this analysis:\nJUDGE-{} INITIAL VIEW",
            own
        )));
        let (_, peer_sections) = prompt
            .split_once("ALTERNATIVE PERSPECTIVE 1:")
            .expect("peer sections present");
        assert!(
            peer_sections.starts_with(&format!("\nJUDGE-{} INITIAL VIEW", peers[0])),
            "judge {} first peer",
            own
        );
        assert!(peer_sections.contains(&format!(
            "ALTERNATIVE PERSPECTIVE 2:\nJUDGE-{} INITIAL VIEW",
            peers[1]
        )));
        assert!(
            !peer_sections.contains(&format!("JUDGE-{} INITIAL VIEW", own)),
            "judge {} saw its own analysis",
            own
        );
    }

    let moderator = &requests[6];
    assert_eq!(moderator.max_tokens, MODERATOR_MAX_TOKENS);
    assert_eq!(
        moderator.content_of(Role::System),
        Some(Persona::Moderator.system_prompt())
    );
    let moderator_prompt = moderator.content_of(Role::User).unwrap();
    assert!(moderator_prompt.contains("JUDGE 1: JUDGE-1 INITIAL VIEW"));
    assert!(moderator_prompt.contains("JUDGE 3: judge 3 revised: FINAL_ANSWER: 4"));

    for label in [
        "ROUND 1: INDEPENDENT EVALUATIONS",
        "JUDGE 2 (Initial)",
        "ROUND 2: RE-EVALUATION AFTER EXCHANGE",
        "JUDGE 3 (Revised)",
        "MODERATOR (Final Decision)",
    ] {
        assert!(result.debate_log.contains(label), "missing {}", label);
    }
}

#[tokio::test]
async fn test_chateval_peers_exclude_own_analysis() {
    let backend = ScriptedBackend::new(|i, _| Ok(judge_replies(i)));
    let client = client_for(&backend);
    let strategy = ChatEvalStrategy::new(client.clone(), Sampling::default());

    assert_chateval_exchange(strategy, &backend).await;
    assert_eq!(client.api_calls(), 7);
}

#[tokio::test]
async fn test_chateval_parallel_fanout_matches_sequential() {
    let backend = ScriptedBackend::new(|i, _| Ok(judge_replies(i)));
    let client = client_for(&backend);
    let strategy =
        ChatEvalStrategy::new(client.clone(), Sampling::default()).with_parallel_fanout(true);

    assert_chateval_exchange(strategy, &backend).await;
    assert_eq!(client.api_calls(), 7);
}

#[tokio::test]
async fn test_chateval_round_two_failure_names_judge() {
    let backend = ScriptedBackend::failing_at(4, "analysis");
    let strategy = ChatEvalStrategy::new(client_for(&backend), Sampling::default());

    let result = strategy.decide(&question("astronomy", 4)).await;

    assert_eq!(result.debate_log, "Judge 2 Round 2 failed");
    assert_eq!(result.final_answer, None);
    assert_eq!(backend.call_count(), 5);
}

#[tokio::test]
async fn test_chateval_fanout_failure_stops_before_next_round() {
    let backend = ScriptedBackend::failing_at(1, "analysis");
    let strategy = ChatEvalStrategy::new(client_for(&backend), Sampling::default())
        .with_parallel_fanout(true);

    let result = strategy.decide(&question("astronomy", 4)).await;

    assert_eq!(result.debate_log, "Judge 2 Round 1 failed");
    // the whole round was in flight; round 2 never starts
    assert_eq!(backend.call_count(), 3);
}
