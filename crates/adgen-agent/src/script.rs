//! Ad script drafting.

use adgen_models::{AdScript, ProductMetadata};
use serde::Deserialize;

use crate::error::AgentResult;
use crate::llm::LlmClient;

/// Video generation APIs degrade on very long prompts.
const MAX_PROMPT_CHARS: usize = 500;

const SYSTEM_PROMPT: &str = "\
You are an expert advertising copywriter and video director specializing \
in short-form video ads for e-commerce products.

Create a compelling video advertisement by:
1. Analyzing the product information to understand its key selling points
2. Crafting a persuasive video script optimized for short attention spans
3. Writing an effective video generation prompt that captures the essence of the ad

Guidelines for the video prompt:
- Keep the ad under 8 seconds total
- Start with a hook that grabs attention in the first 2 seconds
- Highlight the product's main benefit or unique value proposition
- End with a clear call-to-action
- Use vivid, cinematic descriptions for the video prompt
- Describe camera movements, lighting, and mood
- Show the product in an aspirational context
- Keep the prompt under 500 characters";

/// The structured answer requested from the model.
#[derive(Debug, Deserialize)]
pub struct ScriptDraft {
    pub script: AdScript,
    pub video_prompt: String,
}

/// Draft an ad script and video prompt for a product.
pub async fn draft_script(llm: &LlmClient, product: &ProductMetadata) -> AgentResult<ScriptDraft> {
    let prompt = build_prompt(product);
    let response = llm.generate_json(&prompt).await?;
    let mut draft: ScriptDraft = serde_json::from_str(&response)?;
    draft.video_prompt = clamp_prompt(&draft.video_prompt);
    Ok(draft)
}

fn build_prompt(product: &ProductMetadata) -> String {
    let product_json =
        serde_json::to_string_pretty(product).unwrap_or_else(|_| product.title.clone());

    format!(
        r#"{SYSTEM_PROMPT}

PRODUCT INFORMATION:
{product_json}

Return ONLY a single JSON object with this schema:
{{
  "script": {{
    "product_name": "Product name",
    "hook": "Attention-grabbing opening line",
    "scenes": [
      {{
        "description": "What happens in this scene",
        "duration_seconds": 2.0,
        "narration": "Optional voiceover line",
        "visual_notes": "Camera, lighting, mood"
      }}
    ],
    "call_to_action": "Closing line",
    "total_duration_seconds": 8.0
  }},
  "video_prompt": "Cinematic text-to-video prompt, under 500 characters"
}}"#
    )
}

/// Trim an overlong prompt on a character boundary.
fn clamp_prompt(prompt: &str) -> String {
    let prompt = prompt.trim();
    if prompt.chars().count() <= MAX_PROMPT_CHARS {
        return prompt.to_string();
    }
    prompt.chars().take(MAX_PROMPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_product_fields() {
        let mut product = ProductMetadata::empty("https://shop.example/p/1");
        product.title = "Espresso Maker".to_string();
        product.brand = Some("BrewCo".to_string());

        let prompt = build_prompt(&product);
        assert!(prompt.contains("Espresso Maker"));
        assert!(prompt.contains("BrewCo"));
        assert!(prompt.contains("Return ONLY a single JSON object"));
    }

    #[test]
    fn overlong_prompt_is_clamped() {
        let long = "x".repeat(800);
        assert_eq!(clamp_prompt(&long).len(), MAX_PROMPT_CHARS);
    }

    #[test]
    fn short_prompt_is_kept_verbatim() {
        assert_eq!(clamp_prompt("  steady dolly shot  "), "steady dolly shot");
    }

    #[test]
    fn draft_parses_schema() {
        let raw = r#"{
            "script": {
                "product_name": "Espresso Maker",
                "hook": "Wake up to perfection",
                "scenes": [
                    {"description": "Steam rises from a fresh cup"}
                ],
                "call_to_action": "Order yours today"
            },
            "video_prompt": "Slow dolly toward an espresso machine at dawn"
        }"#;
        let draft: ScriptDraft = serde_json::from_str(raw).unwrap();
        assert_eq!(draft.script.product_name, "Espresso Maker");
        assert_eq!(draft.script.scenes.len(), 1);
    }
}
