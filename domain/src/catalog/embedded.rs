//! Built-in reasoning modes shipped with the binary.

use super::mode::{ModeCategory, ModeTier, ReasoningMode};
use super::mode_catalog::ModeCatalog;
use crate::core::error::DomainError;

/// Version label of the embedded catalog.
pub const CATALOG_VERSION: &str = "2026.10";

#[allow(clippy::too_many_arguments)]
fn mode(
    id: &str,
    code: &str,
    name: &str,
    category: ModeCategory,
    tier: ModeTier,
    short_desc: &str,
    description: &str,
    outputs: &str,
    best_for: &[&str],
    failure_modes: &[&str],
) -> ReasoningMode {
    ReasoningMode::new(id, code, name, category, tier)
        .with_short_desc(short_desc)
        .with_description(description)
        .with_outputs(outputs)
        .with_best_for(best_for)
        .with_failure_modes(failure_modes)
}

/// The embedded mode list, in canonical (code) order.
pub fn embedded_modes() -> Vec<ReasoningMode> {
    use ModeCategory::*;
    use ModeTier::*;

    vec![
        // A: Formal
        mode(
            "deductive", "A1", "Deductive", Formal, Core,
            "Derive conclusions that follow necessarily from stated premises",
            "Make every premise explicit, then chain only valid inferences. Flag any step that relies on an unstated assumption and separate what is proven from what is merely plausible.",
            "Premise list, inference chain, proven vs. assumed conclusions",
            &["Checking invariants", "Validating specifications", "Spotting contradictions"],
            &["Garbage-in premises", "Overconfidence in formal-looking arguments"],
        ),
        mode(
            "formal-verification", "A2", "Formal Verification", Formal, Advanced,
            "Specify properties precisely and argue they hold for all inputs",
            "State pre- and post-conditions, loop invariants and state-machine properties. Attempt a proof sketch for each and report counterexamples where the proof breaks down.",
            "Property list, proof sketches, counterexamples",
            &["Concurrency protocols", "Safety-critical logic"],
            &["Spec does not match real requirements", "Proof effort explodes"],
        ),
        mode(
            "mathematical-modeling", "A3", "Mathematical Modeling", Formal, Advanced,
            "Model the problem quantitatively and reason over the model",
            "Choose variables and relations that capture the essential dynamics, solve or simulate the model, then map results back with explicit caveats about model fidelity.",
            "Model definition, parameters, results, sensitivity notes",
            &["Capacity planning", "Performance budgets"],
            &["Model omits the dominant effect", "False precision"],
        ),
        // B: Ampliative
        mode(
            "inductive", "B1", "Inductive", Ampliative, Core,
            "Generalize carefully from observed cases",
            "Collect the available observations, look for regularities and state generalizations with their support and known exceptions. Estimate how far the pattern can be trusted.",
            "Observed patterns, generalizations, confidence and exceptions",
            &["Log analysis", "Usage trends", "Flaky test triage"],
            &["Small samples", "Survivorship bias"],
        ),
        mode(
            "abductive", "B2", "Abductive", Ampliative, Core,
            "Infer the best explanation for the evidence",
            "Enumerate candidate explanations, score each on how well it accounts for all evidence and how simple it is, and propose the observation that would best discriminate between the leaders.",
            "Ranked hypotheses, discriminating tests",
            &["Debugging", "Incident analysis"],
            &["Premature closure", "Ignoring unexplained evidence"],
        ),
        mode(
            "analogical", "B3", "Analogical", Ampliative, Core,
            "Transfer insight from structurally similar problems",
            "Find problems from other systems or domains with the same structure, map their solutions onto this one and check where the analogy breaks.",
            "Analogies, mapped solutions, disanalogies",
            &["Design exploration", "Explaining unfamiliar systems"],
            &["Surface similarity mistaken for structure"],
        ),
        // C: Uncertainty
        mode(
            "probabilistic", "C1", "Probabilistic", Uncertainty, Core,
            "Reason explicitly with likelihoods and base rates",
            "Assign rough probabilities to the relevant outcomes, anchor on base rates and combine evidence consistently. Report expected values where decisions depend on them.",
            "Probability estimates, base rates, expected outcomes",
            &["Risk assessment", "Prioritization under uncertainty"],
            &["Made-up numbers treated as data"],
        ),
        mode(
            "bayesian-updating", "C2", "Bayesian Updating", Uncertainty, Advanced,
            "Revise beliefs incrementally as evidence arrives",
            "State priors, specify how each piece of evidence shifts them and track the posterior. Identify which future evidence would move the conclusion most.",
            "Priors, likelihood ratios, posteriors, value of information",
            &["Diagnosis over time", "Forecasting"],
            &["Anchoring on a bad prior"],
        ),
        // D: Vagueness
        mode(
            "fuzzy-boundaries", "D1", "Fuzzy Boundaries", Vagueness, Advanced,
            "Handle concepts without sharp edges",
            "Identify the vague terms the question relies on, propose operational definitions with graded membership and show how conclusions shift across the borderline cases.",
            "Term definitions, borderline cases, sensitivity of conclusions",
            &["Requirements with soft terms", "Policy wording"],
            &["Endless definitional debate"],
        ),
        // E: Change
        mode(
            "belief-revision", "E1", "Belief Revision", Change, Core,
            "Update a body of beliefs minimally when new facts conflict",
            "List current working assumptions, identify which conflict with new information and choose the smallest consistent revision, noting what else must change as a consequence.",
            "Conflicting assumptions, minimal revision, knock-on effects",
            &["Post-incident learning", "Changing requirements"],
            &["Over-revision", "Clinging to sunk assumptions"],
        ),
        mode(
            "counterfactual", "E2", "Counterfactual", Change, Core,
            "Ask what would have happened under different choices",
            "Construct nearby alternative histories by changing one decision at a time and trace consequences to separate causes that mattered from incidental ones.",
            "Alternative scenarios, pivotal decisions",
            &["Retrospectives", "Evaluating past decisions"],
            &["Implausible alternatives", "Hindsight bias"],
        ),
        // F: Causal
        mode(
            "root-cause", "F1", "Root Cause Analysis", Causal, Core,
            "Trace symptoms back to their originating causes",
            "Start from the observed failure and repeatedly ask why, branching where several causes contribute. Stop at causes that are actionable and verify each link with evidence.",
            "Causal chain, root causes, supporting evidence, fixes",
            &["Incidents", "Recurring bugs"],
            &["Stopping at the first plausible cause", "Blaming people instead of systems"],
        ),
        mode(
            "causal-graph", "F2", "Causal Graph", Causal, Advanced,
            "Map causes and effects as an explicit graph",
            "Draw the variables and directed causal links, mark confounders and feedback loops, and use the graph to predict the effect of interventions.",
            "Causal graph, confounders, intervention predictions",
            &["Complex system behavior", "Metric movements"],
            &["Missing hidden variables"],
        ),
        mode(
            "failure-mode-analysis", "F3", "Failure Mode Analysis", Causal, Core,
            "Enumerate how each component can fail and the effects",
            "Walk through every component and interface, list its failure modes, their effects, likelihood and detectability, and rank them by risk priority.",
            "Failure mode table, risk ranking, mitigations",
            &["Reliability reviews", "Launch readiness"],
            &["Checklist fatigue", "Ignoring correlated failures"],
        ),
        // G: Practical
        mode(
            "decision-analysis", "G1", "Decision Analysis", Practical, Core,
            "Structure a choice into options, criteria and tradeoffs",
            "Enumerate viable options, define weighted criteria, score each option and test how robust the ranking is to changes in weights and estimates.",
            "Options, criteria, scored matrix, recommendation",
            &["Technology choices", "Roadmap decisions"],
            &["Criteria chosen to fit a preferred answer"],
        ),
        mode(
            "cost-benefit", "G2", "Cost-Benefit", Practical, Core,
            "Weigh costs against benefits over time",
            "Quantify direct and indirect costs and benefits, including maintenance and opportunity costs, over a stated horizon and report the net value with uncertainty bands.",
            "Cost and benefit inventory, net value, break-even",
            &["Build vs. buy", "Refactoring proposals"],
            &["Unquantifiable benefits ignored"],
        ),
        mode(
            "worst-case", "G3", "Worst Case", Practical, Core,
            "Assume things go wrong and plan for the bad tail",
            "Identify the most damaging plausible outcomes, estimate their impact and propose mitigations or tripwires that bound the downside.",
            "Worst-case scenarios, impact, mitigations",
            &["Security", "Operations", "Migrations"],
            &["Paralysis by pessimism"],
        ),
        // H: Strategic
        mode(
            "game-theoretic", "H1", "Game Theoretic", Strategic, Advanced,
            "Model other actors' incentives and best responses",
            "Identify the players, their goals and available moves, look for equilibria and predict how each actor responds to the proposed action.",
            "Players, incentives, equilibria, predicted responses",
            &["Pricing", "Platform policy", "Abuse prevention"],
            &["Assuming perfect rationality"],
        ),
        mode(
            "scenario-planning", "H2", "Scenario Planning", Strategic, Core,
            "Explore several plausible futures and robust strategies",
            "Pick the key uncertainties, combine them into a few distinct scenarios and find actions that perform acceptably across all of them.",
            "Scenarios, signposts, robust actions",
            &["Long-term planning", "Architecture evolution"],
            &["Scenarios that are too similar"],
        ),
        mode(
            "adversarial-review", "H3", "Adversarial Review", Strategic, Core,
            "Attack the proposal as a motivated opponent would",
            "Adopt the stance of an attacker or critic, search for the weakest points of the proposal and describe concrete exploits or failure stories.",
            "Attack list, exploit stories, hardening suggestions",
            &["Security review", "Stress-testing plans"],
            &["Nitpicking instead of finding real weaknesses"],
        ),
        // I: Dialectical
        mode(
            "dialectical", "I1", "Dialectical", Dialectical, Core,
            "Develop thesis and antithesis toward a synthesis",
            "State the strongest position, the strongest opposing position, and work out a higher-level view that preserves what is right in each.",
            "Thesis, antithesis, synthesis",
            &["Contested decisions", "Conflicting stakeholder views"],
            &["False balance"],
        ),
        mode(
            "steelman", "I2", "Steelman", Dialectical, Core,
            "Reconstruct the strongest version of opposing views",
            "For each alternative to the favored answer, build its most charitable and compelling form, then evaluate the favored answer against those.",
            "Steelmanned alternatives, comparative evaluation",
            &["Design reviews", "Avoiding groupthink"],
            &["Strawmen disguised as steelmen"],
        ),
        mode(
            "argumentation", "I3", "Argumentation", Dialectical, Advanced,
            "Map claims with their support and attack relations",
            "Extract each claim, link supporting and attacking arguments and determine which claims survive once all attacks are considered.",
            "Argument map, surviving claims, defeated claims",
            &["Policy reasoning", "Debate analysis"],
            &["Map too large to be useful"],
        ),
        // J: Modal
        mode(
            "possibility-space", "J1", "Possibility Space", Modal, Advanced,
            "Separate what is necessary, possible and impossible",
            "Classify constraints by modality, explore the space of designs they allow and mark regions that are reachable only if a constraint is relaxed.",
            "Constraint classification, feasible region, relaxations",
            &["Early design", "Requirement negotiation"],
            &["Treating soft constraints as hard"],
        ),
        // K: Domain
        mode(
            "security-threat-model", "K1", "Threat Modeling", Domain, Core,
            "Identify assets, trust boundaries and threats",
            "Enumerate assets and entry points, draw trust boundaries, walk through spoofing, tampering, repudiation, disclosure, denial and elevation threats, and rank them.",
            "Assets, trust boundaries, threats, mitigations",
            &["Security review", "New integrations"],
            &["Missing out-of-band attack paths"],
        ),
        mode(
            "performance-profiling", "K2", "Performance Profiling", Domain, Advanced,
            "Reason about where time and memory actually go",
            "Form hypotheses about hot paths and resource contention, propose measurements that would confirm them and estimate gains of candidate optimizations.",
            "Hot path hypotheses, measurement plan, expected gains",
            &["Latency regressions", "Scaling limits"],
            &["Optimizing without measuring"],
        ),
        mode(
            "api-design-review", "K3", "API Design Review", Domain, Core,
            "Evaluate interfaces for clarity, safety and evolvability",
            "Check naming, error semantics, invariants, misuse resistance and versioning strategy of the interface, and propose concrete signature changes.",
            "Interface issues, misuse scenarios, proposed changes",
            &["Library design", "Service contracts"],
            &["Bikeshedding names"],
        ),
        // L: Meta
        mode(
            "systems-thinking", "L1", "Systems Thinking", Meta, Core,
            "See the whole system with its feedback loops",
            "Identify stocks, flows and feedback loops, look for delays and unintended consequences and locate leverage points where small changes have large effects.",
            "System map, feedback loops, leverage points",
            &["Organizational problems", "Architecture reviews"],
            &["Everything-is-connected vagueness"],
        ),
        mode(
            "meta-evaluation", "L2", "Meta Evaluation", Meta, Core,
            "Assess the quality of the reasoning itself",
            "Review how conclusions were reached, rate evidence quality and calibration, and point out where a different reasoning mode would be more reliable.",
            "Reasoning audit, calibration notes, confidence levels",
            &["High-stakes decisions", "Synthesis of multiple analyses"],
            &["Infinite regress"],
        ),
        mode(
            "conceptual-blending", "L3", "Conceptual Blending", Meta, Advanced,
            "Combine concepts from different spaces into new ideas",
            "Take two or more input concepts, project selected structure into a blended space and develop the emergent ideas that neither input contains alone.",
            "Input spaces, blends, emergent ideas",
            &["Ideation", "Product innovation"],
            &["Clever but useless combinations"],
        ),
        mode(
            "first-principles", "L4", "First Principles", Meta, Core,
            "Rebuild the answer from fundamental truths",
            "Strip away convention and analogy, list the fundamental facts and constraints and reason upward from them to a solution.",
            "Fundamental constraints, derived solution",
            &["Challenging assumptions", "Novel problems"],
            &["Reinventing well-understood wheels"],
        ),
    ]
}

/// Catalog built from the embedded modes only.
pub fn default_catalog() -> Result<ModeCatalog, DomainError> {
    ModeCatalog::new(embedded_modes(), CATALOG_VERSION)
}
