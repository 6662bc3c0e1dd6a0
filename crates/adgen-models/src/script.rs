//! Ad script drafted by the agent.

use serde::{Deserialize, Serialize};

/// A single scene in the ad script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdScene {
    /// What happens on screen
    pub description: String,
    /// Scene length in seconds
    #[serde(default = "default_scene_duration")]
    pub duration_seconds: f64,
    /// Voiceover line, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// Camera, lighting and mood notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_notes: Option<String>,
}

fn default_scene_duration() -> f64 {
    2.0
}

/// Complete ad script for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdScript {
    /// Product the script advertises
    pub product_name: String,
    /// Attention hook for the first two seconds
    pub hook: String,
    /// Ordered scenes
    pub scenes: Vec<AdScene>,
    /// Closing call to action
    pub call_to_action: String,
    /// Total runtime in seconds
    #[serde(default = "default_total_duration")]
    pub total_duration_seconds: f64,
}

fn default_total_duration() -> f64 {
    8.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_deserializes_with_defaults() {
        let json = r#"{
            "product_name": "Earbuds",
            "hook": "Silence the world",
            "scenes": [{"description": "Close-up of earbuds"}],
            "call_to_action": "Shop now"
        }"#;
        let script: AdScript = serde_json::from_str(json).unwrap();
        assert_eq!(script.total_duration_seconds, 8.0);
        assert_eq!(script.scenes[0].duration_seconds, 2.0);
        assert!(script.scenes[0].narration.is_none());
    }
}
