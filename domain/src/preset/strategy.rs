//! Synthesis strategies
//!
//! A strategy names how the outputs of all assignments are combined once the
//! session completes. The synthesis step itself belongs to the caller; the
//! domain only carries the choice and its metadata.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How mode outputs are combined into a final answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisStrategy {
    Manual,
    Adversarial,
    #[default]
    Consensus,
    Creative,
    Analytical,
    Deliberative,
    Prioritized,
    Dialectical,
    MetaReasoning,
    Voting,
    Argumentation,
}

impl SynthesisStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisStrategy::Manual => "manual",
            SynthesisStrategy::Adversarial => "adversarial",
            SynthesisStrategy::Consensus => "consensus",
            SynthesisStrategy::Creative => "creative",
            SynthesisStrategy::Analytical => "analytical",
            SynthesisStrategy::Deliberative => "deliberative",
            SynthesisStrategy::Prioritized => "prioritized",
            SynthesisStrategy::Dialectical => "dialectical",
            SynthesisStrategy::MetaReasoning => "meta-reasoning",
            SynthesisStrategy::Voting => "voting",
            SynthesisStrategy::Argumentation => "argumentation",
        }
    }

    /// Metadata for this strategy.
    pub fn config(&self) -> &'static StrategyConfig {
        STRATEGIES
            .iter()
            .find(|s| s.strategy == *self)
            .unwrap_or(&STRATEGIES[0])
    }

    /// Map a removed strategy name to its replacement.
    pub fn migrate(name: &str) -> Option<SynthesisStrategy> {
        DEPRECATED
            .iter()
            .find(|(old, _)| *old == name)
            .map(|(_, new)| *new)
    }
}

impl std::fmt::Display for SynthesisStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynthesisStrategy {
    type Err = DomainError;

    /// Parse a canonical name. Deprecated names are rejected with a pointer
    /// to their replacement.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if let Some(cfg) = STRATEGIES.iter().find(|c| c.strategy.as_str() == name) {
            return Ok(cfg.strategy);
        }
        if let Some(replacement) = Self::migrate(&name) {
            return Err(DomainError::DeprecatedStrategy {
                name,
                replacement: replacement.as_str().to_string(),
            });
        }
        Err(DomainError::UnknownStrategy(s.to_string()))
    }
}

/// Metadata describing a synthesis strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    pub strategy: SynthesisStrategy,
    pub description: &'static str,
    /// Whether a dedicated synthesizer agent is needed
    pub requires_agent: bool,
    /// Recommended mode for the synthesizer agent
    pub synthesizer_mode: Option<&'static str>,
    pub best_for: &'static [&'static str],
    pub template_key: &'static str,
}

/// Canonical strategy list, in display order.
pub static STRATEGIES: &[StrategyConfig] = &[
    StrategyConfig {
        strategy: SynthesisStrategy::Manual,
        description: "Mechanical merge of outputs without a synthesizer agent",
        requires_agent: false,
        synthesizer_mode: None,
        best_for: &["Simple aggregation", "Debugging"],
        template_key: "synthesis_manual",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Adversarial,
        description: "Challenge/defense synthesis where outputs are stress-tested",
        requires_agent: true,
        synthesizer_mode: Some("adversarial-review"),
        best_for: &["Security review", "Risk assessment"],
        template_key: "synthesis_adversarial",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Consensus,
        description: "Find agreement points across mode outputs",
        requires_agent: true,
        synthesizer_mode: Some("meta-evaluation"),
        best_for: &["Multi-perspective validation", "Reducing individual bias"],
        template_key: "synthesis_consensus",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Creative,
        description: "Recombine outputs into novel insights and unexpected connections",
        requires_agent: true,
        synthesizer_mode: Some("conceptual-blending"),
        best_for: &["Innovation", "Ideation"],
        template_key: "synthesis_creative",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Analytical,
        description: "Systematic decomposition and structured comparison of outputs",
        requires_agent: true,
        synthesizer_mode: Some("systems-thinking"),
        best_for: &["Architecture review", "Coverage verification"],
        template_key: "synthesis_analytical",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Deliberative,
        description: "Structured deliberation weighing tradeoffs between outputs",
        requires_agent: true,
        synthesizer_mode: Some("decision-analysis"),
        best_for: &["Decision making", "Tradeoff-heavy problems"],
        template_key: "synthesis_deliberative",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Prioritized,
        description: "Rank and select outputs by quality, confidence and relevance",
        requires_agent: true,
        synthesizer_mode: Some("meta-evaluation"),
        best_for: &["Information triage", "Time-constrained reviews"],
        template_key: "synthesis_prioritized",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Dialectical,
        description: "Agent-led thesis/antithesis debate driving toward synthesis",
        requires_agent: true,
        synthesizer_mode: Some("dialectical"),
        best_for: &["Controversial topics", "Resolving contradictions"],
        template_key: "synthesis_dialectical",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::MetaReasoning,
        description: "Meta-cognitive synthesizer that reasons about the reasoning itself",
        requires_agent: true,
        synthesizer_mode: Some("meta-evaluation"),
        best_for: &["High-stakes decisions", "Calibration checks"],
        template_key: "synthesis_meta",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Voting,
        description: "Structured score/vote aggregation across mode outputs",
        requires_agent: false,
        synthesizer_mode: None,
        best_for: &["Quick polls", "Majority/minority positions"],
        template_key: "synthesis_voting",
    },
    StrategyConfig {
        strategy: SynthesisStrategy::Argumentation,
        description: "Build a support/attack graph mapping relationships between claims",
        requires_agent: true,
        synthesizer_mode: Some("argumentation"),
        best_for: &["Argument mapping", "Policy reasoning"],
        template_key: "synthesis_argumentation",
    },
];

const DEPRECATED: &[(&str, SynthesisStrategy)] = &[
    ("debate", SynthesisStrategy::Dialectical),
    ("weighted", SynthesisStrategy::Prioritized),
    ("sequential", SynthesisStrategy::Manual),
    ("best-of", SynthesisStrategy::Prioritized),
];

/// Synthesis settings carried by a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub strategy: SynthesisStrategy,
    /// Findings below this confidence are dropped during synthesis
    pub min_confidence: f64,
    pub max_findings: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            strategy: SynthesisStrategy::default(),
            min_confidence: 0.3,
            max_findings: 10,
        }
    }
}

impl SynthesisConfig {
    pub fn with_strategy(strategy: SynthesisStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}
