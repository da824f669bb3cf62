//! Personas and prompt templates for every strategy.
//!
//! Each persona has one fixed system prompt. Each round of a protocol has a
//! template function taking an explicit parameter struct, so a missing or
//! misnamed input is a compile error rather than a runtime formatting bug.

use serde::{Deserialize, Serialize};

/// Suffix appended to the single-agent user message.
pub const SINGLE_AGENT_ANSWER_CUE: &str = "\n\nYour answer (format: FINAL_ANSWER: [0-9]):";

// ============================================================================
// Personas
// ============================================================================

/// A named role with its own fixed system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Single agent answering with only the tag line.
    DirectAnswerer,
    /// Single agent reasoning before the tag line.
    StepByStepSolver,
    Decomposer,
    Expert,
    Reasoner,
    Critic,
    Integrator,
    Angel,
    Demon,
    Judge,
    Moderator,
}

impl Persona {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DirectAnswerer => "Direct Answerer",
            Self::StepByStepSolver => "Step-by-Step Solver",
            Self::Decomposer => "Decomposer",
            Self::Expert => "Expert",
            Self::Reasoner => "Reasoner",
            Self::Critic => "Critic",
            Self::Integrator => "Integrator",
            Self::Angel => "Angel",
            Self::Demon => "Demon",
            Self::Judge => "Judge",
            Self::Moderator => "Moderator",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::DirectAnswerer => DIRECT_ANSWER_SYSTEM_PROMPT,
            Self::StepByStepSolver => STEP_BY_STEP_SYSTEM_PROMPT,
            Self::Decomposer => DECOMPOSER_SYSTEM_PROMPT,
            Self::Expert => EXPERT_SYSTEM_PROMPT,
            Self::Reasoner => REASONER_SYSTEM_PROMPT,
            Self::Critic => CRITIC_SYSTEM_PROMPT,
            Self::Integrator => INTEGRATOR_SYSTEM_PROMPT,
            Self::Angel => ANGEL_SYSTEM_PROMPT,
            Self::Demon => DEMON_SYSTEM_PROMPT,
            Self::Judge => JUDGE_SYSTEM_PROMPT,
            Self::Moderator => MODERATOR_SYSTEM_PROMPT,
        }
    }

    /// Whether this persona's output is ever parsed for the final answer.
    pub fn decides(&self) -> bool {
        matches!(
            self,
            Self::DirectAnswerer
                | Self::StepByStepSolver
                | Self::Integrator
                | Self::Angel
                | Self::Moderator
        )
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Single agent
// ============================================================================

const DIRECT_ANSWER_SYSTEM_PROMPT: &str = "\
You are an expert problem solver. Carefully read the following multiple-choice question and select the correct answer from options 0 to 9.

YOUR TASK:
- Determine the correct answer.
- Output **only** your final choice in the following format:
  FINAL_ANSWER: [X]
  (Replace [X] with a single digit: 0, 1, 2, 3, 4, 5, 6, 7, 8, or 9)

Do not provide any reasoning, analysis, or additional text. Only the final answer line is allowed.

Example of a valid response:
FINAL_ANSWER: 2
";

const STEP_BY_STEP_SYSTEM_PROMPT: &str = "\
You are an expert problem solver. For the following multiple-choice question, please think step by step.

REQUIREMENTS:
1. First, analyze the question carefully and reason through each option.
2. Explain your reasoning process in detail.
3. At the VERY END of your response, output your final answer in the format:
   FINAL_ANSWER: [X]
   where [X] is a single digit between 0 and 9.

Example:
... [your reasoning] ...
Therefore, the correct option is 3.
FINAL_ANSWER: 3";

/// User message for the single agent.
pub fn single_agent_user(question_text: &str) -> String {
    format!("{}{}", question_text, SINGLE_AGENT_ANSWER_CUE)
}

// ============================================================================
// Society of Minds
// ============================================================================

const DECOMPOSER_SYSTEM_PROMPT: &str = "\
You are a Problem Decomposer. Your ONLY task is to break down complex multiple-choice questions into simpler, more manageable sub-questions.
Keep your response UNDER 500 tokens.
INSTRUCTIONS:
1. Read the multiple-choice question carefully.
2. Identify the core concepts and what is being asked.
3. Break it down into 2-4 logical sub-questions that would help in solving the main question.
4. Output ONLY the sub-questions in a numbered list.

DO NOT:
- Answer the question
- Evaluate options
- Provide any reasoning beyond decomposition

Example:
Input: \"What is the derivative of f(x) = 3x² + 2x?\"
Output:
1. What is the power rule for derivatives?
2. How do you apply the power rule to 3x²?
3. How do you apply the power rule to 2x?
4. How do you combine derivative results?";

const EXPERT_SYSTEM_PROMPT: &str = "\
You are a Domain Expert. Your ONLY task is to provide factual knowledge and concepts relevant to the sub-questions.
Keep your response UNDER 500 tokens.
INSTRUCTIONS:
1. Review the original question and the decomposed sub-questions.
2. For each sub-question, provide concise, factual information that would help answer it.
3. Focus on domain-specific knowledge, definitions, formulas, or established facts.
4. Output your knowledge in the same numbered format as the sub-questions.

DO NOT:
- Draw conclusions
- Solve the main question
- Speculate beyond established knowledge

Example:
Input sub-questions: [\"1. What is the power rule for derivatives?\"]
Output:
1. The power rule states: d/dx[xⁿ] = n·xⁿ⁻¹
2. ...";

const REASONER_SYSTEM_PROMPT: &str = "\
You are a Logical Reasoner. Your ONLY task is to apply logical reasoning to connect knowledge to potential answers.
Keep your response UNDER 500 tokens.
INSTRUCTIONS:
1. Review the original question, its options, the sub-questions, and the expert knowledge.
2. For each option (0-9), analyze whether it could be correct based on the provided information.
3. Use logical deduction, inference, and step-by-step reasoning.
4. Output a brief analysis for EACH option (0-9) in this format:
   Option X: [Brief reasoning why it could be correct/incorrect]

DO NOT:
- Make final decisions
- Output a single answer
- Skip analyzing any option

Example:
Option 0: This seems incorrect because it contradicts the power rule...
Option 1: This could be correct based on the formula...
...";

const CRITIC_SYSTEM_PROMPT: &str = "\
You are a Critical Examiner. Your ONLY task is to find flaws, inconsistencies, or weaknesses in the reasoning.
Keep your response UNDER 500 tokens.
INSTRUCTIONS:
1. Review ALL previous steps: decomposition, expert knowledge, and reasoning analysis.
2. Identify potential:
   - Logical fallacies in the reasoning
   - Missing considerations
   - Overlooked alternatives
   - Weak assumptions
3. Output 2-4 critical points that should be considered before final decision.

DO NOT:
- Provide new solutions
- Make the final decision
- Repeat previous analyses

Example:
Critical Points:
1. The reasoning for Option 3 assumes linearity, but the function might be nonlinear.
2. Option 5 was dismissed too quickly; it actually satisfies boundary conditions.
3. The expert knowledge didn't consider special case when x=0.
4. ...";

const INTEGRATOR_SYSTEM_PROMPT: &str = "\
You are the Final Integrator. Your task is to synthesize ALL information and choose the correct answer.

INSTRUCTIONS:
1. CAREFULLY review EVERYTHING:
   - Original question and all 10 options (0-9)
   - Decomposed sub-questions
   - Expert knowledge provided
   - Reasoning analysis for each option
   - Critical examination points
2. Weigh all evidence, giving consideration to the critical points.
3. Choose the SINGLE BEST option (0-9).
4. Output your final answer in this EXACT format:
   FINAL_ANSWER: [X]
   where [X] is a single digit from 0 to 9.

DO NOT:
- Include any explanation
- List multiple options
- Deviate from the output format

Example:
FINAL_ANSWER: 3";

/// Inputs of one Society-of-Minds stage.
pub struct SomStageParams<'a> {
    pub question_text: &'a str,
    /// Outputs of every earlier stage, in pipeline order.
    pub prior_outputs: &'a [String],
}

/// The question followed by all earlier stage outputs, blank-line separated.
pub fn som_stage_input(params: &SomStageParams<'_>) -> String {
    std::iter::once(params.question_text)
        .chain(params.prior_outputs.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// Angel & Demon
// ============================================================================

const ANGEL_SYSTEM_PROMPT: &str = "\
You are the ANGEL, a constructive, analytical problem solver. Your goal is to find and defend the correct answer through rigorous reasoning.

CORE PRINCIPLES:
1. You start by carefully analyzing the question to identify the most likely correct answer.
2. When the Demon attacks your reasoning, you must defend it with stronger evidence, clarify misunderstandings, or refine your position if needed.
3. Always maintain a constructive, truth-seeking attitude.
4. After 3 rounds of debate, synthesize all insights to produce the most robust final answer.
5. Keep your response UNDER 500 tokens.
DEBATE STRATEGY:
- Round 1: Present your initial reasoned analysis.
- Round 2: Defend against the Demon's strongest counterarguments.
- Round 3: Consolidate your position, incorporating valid points from the debate.
- Final: Deliver your conclusive judgment.

CRITICAL: For your FINAL answer (after Round 3), output in this exact format:
FINAL_ANSWER: [X]
where [X] is a single digit from 0 to 9.

For intermediate rounds, provide analysis without this final line.";

const DEMON_SYSTEM_PROMPT: &str = "\
You are the DEMON, a critical, skeptical challenger. Your goal is to find flaws, counterexamples, and weaknesses in the Angel's reasoning.

CORE PRINCIPLES:
1. You do NOT need to propose a correct answer. Your role is purely critical.
2. Attack the Angel's reasoning by:
   - Identifying logical fallacies or leaps
   - Proposing alternative interpretations
   - Finding edge cases or counterexamples
   - Pointing out unstated assumptions
   - Suggesting overlooked possibilities
3. Be sharp but substantive - aim to improve the reasoning through pressure-testing.
4. Push the Angel to defend their position more rigorously.
5. Keep your response UNDER 500 tokens.
DEBATE STRATEGY:
- Round 1: Attack the Angel's initial analysis.
- Round 2: Counter the Angel's defense with deeper criticism.
- Round 3: Deliver your strongest, most comprehensive critique.
- Never output a FINAL_ANSWER yourself.";

/// One side of the Angel-Demon debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Angel,
    Demon,
}

impl Side {
    fn possessive(&self) -> &'static str {
        match self {
            Self::Angel => "Angel's",
            Self::Demon => "Demon's",
        }
    }
}

/// A completed debate turn: who spoke, what it was, what they said.
#[derive(Debug, Clone, Copy)]
pub struct DebateTurn<'a> {
    pub side: Side,
    /// Lower-case description, e.g. `"initial analysis"`.
    pub kind: &'static str,
    pub text: &'a str,
}

impl<'a> DebateTurn<'a> {
    pub fn angel(kind: &'static str, text: &'a str) -> Self {
        Self {
            side: Side::Angel,
            kind,
            text,
        }
    }

    pub fn demon(kind: &'static str, text: &'a str) -> Self {
        Self {
            side: Side::Demon,
            kind,
            text,
        }
    }
}

/// Numbered debate history as read by `reader`: its own turns are "Your …",
/// the opponent's carry the opponent's name.
pub fn debate_history(reader: Side, turns: &[DebateTurn<'_>]) -> String {
    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            let owner = if turn.side == reader {
                "Your"
            } else {
                turn.side.possessive()
            };
            format!("{}. {} {}: {}", i + 1, owner, turn.kind, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct AngelRound1Params<'a> {
    pub question_text: &'a str,
}

pub fn angel_round_1(p: &AngelRound1Params<'_>) -> String {
    format!(
        "ROUND 1: ANGEL'S INITIAL ANALYSIS

Analyze the following multiple-choice question independently. Provide your reasoned choice and justification.

{question_text}

Your analysis:",
        question_text = p.question_text
    )
}

pub struct DemonRound1Params<'a> {
    pub question_text: &'a str,
    pub angel_1: &'a str,
}

pub fn demon_round_1(p: &DemonRound1Params<'_>) -> String {
    format!(
        "ROUND 1: DEMON'S INITIAL CRITIQUE

ORIGINAL QUESTION:
{question_text}

DEBATE HISTORY:
{history}

Your task: Critically analyze the Angel's reasoning. Identify weaknesses, assumptions, or alternative possibilities they may have missed.

Your critique:",
        question_text = p.question_text,
        history = debate_history(Side::Demon, &[DebateTurn::angel("initial analysis", p.angel_1)]),
    )
}

pub struct AngelRound2Params<'a> {
    pub question_text: &'a str,
    pub angel_1: &'a str,
    pub demon_1: &'a str,
}

pub fn angel_round_2(p: &AngelRound2Params<'_>) -> String {
    format!(
        "ROUND 2: ANGEL'S DEFENSE

ORIGINAL QUESTION:
{question_text}

DEBATE HISTORY:
{history}

Respond to the Demon's critique. Defend your position, address valid points, and refine your reasoning if necessary.

Your defense:",
        question_text = p.question_text,
        history = debate_history(
            Side::Angel,
            &[
                DebateTurn::angel("initial analysis", p.angel_1),
                DebateTurn::demon("first critique", p.demon_1),
            ]
        ),
    )
}

pub struct DemonRound2Params<'a> {
    pub question_text: &'a str,
    pub angel_1: &'a str,
    pub demon_1: &'a str,
    pub angel_2: &'a str,
}

pub fn demon_round_2(p: &DemonRound2Params<'_>) -> String {
    format!(
        "ROUND 2: DEMON'S DEEPER CRITIQUE

ORIGINAL QUESTION:
{question_text}

DEBATE HISTORY:
{history}

Your task: Analyze the Angel's defense. Has it adequately addressed your criticisms? Find new weaknesses or reinforce your previous points.

Your critique:",
        question_text = p.question_text,
        history = debate_history(
            Side::Demon,
            &[
                DebateTurn::angel("initial analysis", p.angel_1),
                DebateTurn::demon("first critique", p.demon_1),
                DebateTurn::angel("defense", p.angel_2),
            ]
        ),
    )
}

pub struct AngelRound3Params<'a> {
    pub question_text: &'a str,
    pub angel_1: &'a str,
    pub demon_1: &'a str,
    pub angel_2: &'a str,
    pub demon_2: &'a str,
}

pub fn angel_round_3(p: &AngelRound3Params<'_>) -> String {
    format!(
        "ROUND 3: ANGEL'S CONSOLIDATION

ORIGINAL QUESTION:
{question_text}

DEBATE HISTORY:
{history}

Your task: After this debate, what is your final position? Synthesize the insights gained. Consider:
- Which of Demon's points were valid?
- How has your reasoning strengthened or changed?
- What is now the most defensible answer?

Provide your final analysis.",
        question_text = p.question_text,
        history = debate_history(
            Side::Angel,
            &[
                DebateTurn::angel("initial analysis", p.angel_1),
                DebateTurn::demon("first critique", p.demon_1),
                DebateTurn::angel("defense", p.angel_2),
                DebateTurn::demon("second critique", p.demon_2),
            ]
        ),
    )
}

pub struct DemonRound3Params<'a> {
    pub question_text: &'a str,
    pub angel_1: &'a str,
    pub demon_1: &'a str,
    pub angel_2: &'a str,
    pub demon_2: &'a str,
    pub angel_3: &'a str,
}

pub fn demon_round_3(p: &DemonRound3Params<'_>) -> String {
    format!(
        "ROUND 3: DEMON'S FINAL CHALLENGE

ORIGINAL QUESTION:
{question_text}

DEBATE HISTORY:
{history}

Your task: Deliver your strongest, most comprehensive critique of the Angel's final position. Leave no stone unturned.

Your final critique:",
        question_text = p.question_text,
        history = debate_history(
            Side::Demon,
            &[
                DebateTurn::angel("initial analysis", p.angel_1),
                DebateTurn::demon("first critique", p.demon_1),
                DebateTurn::angel("defense", p.angel_2),
                DebateTurn::demon("second critique", p.demon_2),
                DebateTurn::angel("consolidation", p.angel_3),
            ]
        ),
    )
}

/// The whole six-turn debate, handed to the Angel for the final decision.
pub struct AngelSynthesisParams<'a> {
    pub question_text: &'a str,
    pub angel_1: &'a str,
    pub demon_1: &'a str,
    pub angel_2: &'a str,
    pub demon_2: &'a str,
    pub angel_3: &'a str,
    pub demon_3: &'a str,
}

pub fn angel_synthesis(p: &AngelSynthesisParams<'_>) -> String {
    format!(
        "FINAL SYNTHESIS: ANGEL'S DECISION

ORIGINAL QUESTION: {question_text}

DEBATE CORE EVOLUTION:
- My Initial Answer: {angel_1}
- Demon's Key Challenge: {demon_1}
- My Refined View: {angel_2}
- Demon's Deeper Critique: {demon_2}
- My Settled Position: {angel_3}
- Demon's Final Push: {demon_3}

FINAL TASK:
After this adversarial debate, review the exchange. Identify the Demon's most valid point and how it refined your thinking. Then, based on the entire process, commit to the single most defensible answer.

**CRITICAL: You MUST output first and foremost in this exact format:**
FINAL_ANSWER: [X]
**where [X] is a single digit from 0 to 9.**

**After this line, you may optionally provide a brief rationale.**",
        question_text = p.question_text,
        angel_1 = p.angel_1,
        demon_1 = p.demon_1,
        angel_2 = p.angel_2,
        demon_2 = p.demon_2,
        angel_3 = p.angel_3,
        demon_3 = p.demon_3,
    )
}

// ============================================================================
// ChatEval
// ============================================================================

const JUDGE_SYSTEM_PROMPT: &str = "\
You are an expert evaluator for multiple-choice questions. Your task is to provide structured, rigorous analysis with clear justification.
Keep your response UNDER 500 tokens.

ANALYTICAL FRAMEWORK:
1. PROBLEM INTERPRETATION: Restate the core problem in your own words to ensure understanding.
2. OPTION ANALYSIS: For each option (0-9), assess its plausibility:
   - Identify options that are clearly incorrect with brief reasoning
   - Flag options that require deeper consideration
3. REASONING PROCESS: Apply systematic reasoning:
   - Use domain knowledge or logical principles as appropriate
   - Consider edge cases and potential misunderstandings
   - Identify the key discriminating factor among plausible options
4. CONFIDENCE ASSESSMENT: Note your confidence level and any remaining uncertainties.

DECISION CRITERIA:
- Prioritize evidence-based reasoning over intuition
- Favor options with strongest logical support
- Consider question context and typical testing patterns

OUTPUT FORMAT:
[Your structured reasoning...]
Based on this analysis, the most justified answer is option [X].
FINAL_ANSWER: [X]
where [X] is a single digit from 0 to 9.

Example structure:
The question asks about [concept]. Options 0, 2, 5 can be eliminated because [reason]. Between options 3 and 7, option 3 is stronger because [evidence]. FINAL_ANSWER: 3";

const MODERATOR_SYSTEM_PROMPT: &str = "\
You are the Synthesis Moderator. Your task is to evaluate multiple analytical perspectives and determine the most logically sound answer.

SYNTHESIS FRAMEWORK:
1. ASSESS REASONING QUALITY: For each judge's analysis, evaluate:
   - Logical coherence and step-by-step reasoning
   - Evidence quality and relevance
   - Consideration of alternatives
   - Identification of key discriminating factors
2. IDENTIFY CONVERGENCE: Note where analyses agree on specific points.
3. EVALUATE DISAGREEMENTS: For conflicting conclusions, assess which reasoning is more robust.
4. DECISION INTEGRATION: Weigh arguments by their analytical strength, not by simple majority.

PRIORITIZATION CRITERIA:
1. Analyses with clear logical chains > those relying on assertion
2. Arguments addressing specific evidence > general statements
3. Considerations of edge cases > overlooking potential issues
4. Transparent uncertainty handling > overconfident assertions

OUTPUT REQUIREMENT:
After comprehensive evaluation, the most analytically sound conclusion is option [X].
FINAL_ANSWER: [X]
where [X] is a single digit from 0 to 9.";

pub struct JudgeRound1Params<'a> {
    pub question_text: &'a str,
}

/// Identical for every judge.
pub fn judge_round_1(p: &JudgeRound1Params<'_>) -> String {
    format!(
        "ROUND 1: STRUCTURED INDEPENDENT ANALYSIS

Analyze the following multiple-choice question using a systematic approach:

{question_text}

APPLY THIS ANALYTICAL STRUCTURE:
1. Clarify what the question is fundamentally asking.
2. Identify and eliminate clearly incorrect options with brief justification.
3. Compare the remaining plausible options in depth.
4. Determine which option has the strongest evidentiary support.
5. Note any assumptions or uncertainties in your reasoning.

Provide your structured analysis and final answer in the required format.",
        question_text = p.question_text
    )
}

pub struct JudgeRound2Params<'a> {
    pub question_text: &'a str,
    /// This judge's own round-1 analysis.
    pub own_round_1: &'a str,
    /// The other two judges' round-1 analyses, in ascending judge order.
    pub peers: [&'a str; 2],
}

pub fn judge_round_2(p: &JudgeRound2Params<'_>) -> String {
    format!(
        "ROUND 2: CRITICAL RE-EVALUATION

ORIGINAL QUESTION:
{question_text}

You previously provided this analysis:
{own}

Now critically examine two alternative perspectives from other expert judges:

ALTERNATIVE PERSPECTIVE 1:
{peer_1}

ALTERNATIVE PERSPECTIVE 2:
{peer_2}

RE-EVALUATION TASKS:
1. COMPARE REASONING APPROACHES: How do the alternative analyses differ from yours in method or focus?
2. IDENTIFY STRENGTHS: What valid points or considerations do the other analyses raise?
3. ASSESS WEAKNESSES: Are there logical gaps or questionable assumptions in the alternative views?
4. INTEGRATE INSIGHTS: How should your analysis be refined based on this examination?

DECISION POINT:
- If other analyses present stronger reasoning, explain why you're revising your position.
- If your original analysis remains strongest, explain why it withstands critical examination.
- Either way, provide enhanced reasoning incorporating this comparative analysis.

Provide your updated, more robust analysis and final answer.",
        question_text = p.question_text,
        own = p.own_round_1,
        peer_1 = p.peers[0],
        peer_2 = p.peers[1],
    )
}

pub struct ModeratorParams<'a> {
    pub question_text: &'a str,
    pub round_1: [&'a str; 3],
    pub round_2: [&'a str; 3],
}

pub fn moderator(p: &ModeratorParams<'_>) -> String {
    format!(
        "FINAL SYNTHESIS: EVIDENCE-BASED DECISION INTEGRATION

ORIGINAL QUESTION:
{question_text}

ANALYTICAL MATERIALS FOR SYNTHESIS:

INITIAL INDEPENDENT ANALYSES:
JUDGE 1: {r1_1}
JUDGE 2: {r1_2}
JUDGE 3: {r1_3}

REVISED ANALYSES AFTER PEER EXAMINATION:
JUDGE 1: {r2_1}
JUDGE 2: {r2_2}
JUDGE 3: {r2_3}

SYNTHESIS FRAMEWORK:

1. REASONING QUALITY ASSESSMENT:
   - Which analyses demonstrate the clearest logical progression?
   - Which arguments are best supported by evidence or principles?
   - Which analyses most thoroughly consider alternatives?

2. CONVERGENCE ANALYSIS:
   - Where do multiple analyses independently reach similar conclusions?
   - What specific reasoning points receive consistent support?
   - Do the revised analyses show meaningful convergence?

3. DECISION FACTOR IDENTIFICATION:
   - What are the 2-3 most critical factors determining the correct answer?
   - Which analysis best addresses these key factors?
   - Are there important considerations that any analysis overlooks?

4. ROBUSTNESS EVALUATION:
   - Which conclusion best withstands critical examination from multiple perspectives?
   - Which reasoning chain has the fewest logical vulnerabilities?
   - Considering all perspectives, what is the most defensible conclusion?

INTEGRATED DECISION:
Based on comprehensive evaluation of reasoning quality, evidence support, and analytical robustness across all six evaluations, state the most justified option.

Provide your final decision in the required FINAL_ANSWER format with brief justification of why this conclusion emerges from the full analytical exchange.",
        question_text = p.question_text,
        r1_1 = p.round_1[0],
        r1_2 = p.round_1[1],
        r1_3 = p.round_1[2],
        r2_1 = p.round_2[0],
        r2_2 = p.round_2[1],
        r2_3 = p.round_2[2],
    )
}
