//! Prompt templates for ensemble assignments

use crate::catalog::ReasoningMode;
use crate::preset::StrategyConfig;

/// Templates for the text injected into agent panes
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt injected into the pane of one assignment
    pub fn mode_prompt(mode: &ReasoningMode, question: &str, token_budget: u64) -> String {
        let mut prompt = format!(
            r#"You are taking part in a reasoning ensemble as the {name} ({code}) perspective.

{description}
"#,
            name = mode.name,
            code = mode.code,
            description = if mode.description.is_empty() {
                &mode.short_desc
            } else {
                &mode.description
            },
        );

        if !mode.outputs.is_empty() {
            prompt.push_str(&format!("\nExpected outputs: {}\n", mode.outputs));
        }

        if !mode.failure_modes.is_empty() {
            prompt.push_str("\nAvoid these failure modes:\n");
            for failure in &mode.failure_modes {
                prompt.push_str(&format!("- {}\n", failure));
            }
        }

        prompt.push_str(&format!(
            r#"
Question:
{question}

Reason strictly from the {name} perspective. Keep your answer under {token_budget} tokens.
End with a short list of findings, each with a confidence between 0 and 1."#,
            name = mode.name,
        ));

        prompt
    }

    /// Prompt for combining finished assignment outputs
    pub fn synthesis_prompt(
        strategy: &StrategyConfig,
        question: &str,
        outputs: &[(String, String)],
    ) -> String {
        let mut prompt = format!(
            r#"Original question: {}

Synthesis strategy: {} ({})

Mode outputs:
"#,
            question,
            strategy.strategy.as_str(),
            strategy.description
        );

        for (mode, content) in outputs {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", mode, content));
        }

        prompt.push_str(
            r#"
Combine the outputs above into one answer. Keep findings that several modes
support, call out contradictions and say which side is better supported."#,
        );

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::preset::SynthesisStrategy;

    #[test]
    fn test_mode_prompt_contains_persona_and_question() {
        let catalog = default_catalog().unwrap();
        let mode = catalog.get_mode("deductive").unwrap();
        let prompt = PromptTemplate::mode_prompt(mode, "Is the cache coherent?", 4_000);
        assert!(prompt.contains("Deductive (A1)"));
        assert!(prompt.contains("Is the cache coherent?"));
        assert!(prompt.contains("under 4000 tokens"));
    }

    #[test]
    fn test_synthesis_prompt_lists_outputs() {
        let prompt = PromptTemplate::synthesis_prompt(
            SynthesisStrategy::Consensus.config(),
            "q",
            &[("deductive".to_string(), "answer one".to_string())],
        );
        assert!(prompt.contains("--- deductive ---"));
        assert!(prompt.contains("consensus"));
    }
}
