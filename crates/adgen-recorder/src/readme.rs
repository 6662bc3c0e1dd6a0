//! Run README and prompt writing.

use std::fs;
use std::path::Path;

use adgen_models::{GenerationOutput, ProviderKind, VideoOutcome};
use tracing::info;

use crate::error::RecorderResult;

const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// Human-readable provider name for run records.
pub fn provider_display_name(provider: ProviderKind, veo3_quality: bool) -> String {
    match provider {
        ProviderKind::Freepik => "FreePik WAN 2.6".to_string(),
        ProviderKind::Kie => {
            let mode = if veo3_quality { "Quality" } else { "Fast" };
            format!("Kie.ai Veo 3 {mode}")
        }
    }
}

/// Write the run's `README.md` summary.
pub fn write_readme(
    dir: &Path,
    output: &GenerationOutput,
    veo3_quality: bool,
) -> RecorderResult<()> {
    let mut lines = vec![
        format!("# Ad Generation: {}", output.product.title),
        String::new(),
        "## Input".to_string(),
        String::new(),
        format!("**Product URL:** {}", output.product.url),
        String::new(),
        format!("**Generated:** {}", output.generated_at.to_rfc3339()),
        String::new(),
        "## Product Information".to_string(),
        String::new(),
        format!("- **Title:** {}", output.product.title),
    ];

    if let Some(brand) = &output.product.brand {
        lines.push(format!("- **Brand:** {brand}"));
    }
    if let Some(price) = &output.product.price {
        lines.push(format!("- **Price:** {price}"));
    }
    if let Some(description) = &output.product.description {
        let mut preview: String =
            description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
            preview.push_str("...");
        }
        lines.push(format!("- **Description:** {preview}"));
    }

    lines.extend([
        String::new(),
        "## Video Prompt".to_string(),
        String::new(),
        "```".to_string(),
        output.video_prompt.clone(),
        "```".to_string(),
        String::new(),
        "## Generated Videos".to_string(),
        String::new(),
    ]);

    for video in &output.videos {
        lines.extend(video_section(video, veo3_quality));
    }

    let readme_path = dir.join("README.md");
    fs::write(&readme_path, lines.join("\n"))?;
    info!(path = %readme_path.display(), "Wrote run README");
    Ok(())
}

fn video_section(video: &VideoOutcome, veo3_quality: bool) -> Vec<String> {
    let mut lines = vec![
        format!("### {}", provider_display_name(video.provider, veo3_quality)),
        String::new(),
        format!("- **Task ID:** {}", video.job_id),
        format!("- **Status:** {}", video.status),
    ];
    if let Some(local_path) = &video.local_path {
        if let Some(name) = local_path.file_name().and_then(|n| n.to_str()) {
            lines.push(format!("- **File:** [{name}](./{name})"));
        }
    }
    lines.push(String::new());
    lines
}

/// Write the submitted video prompt to `prompt.md`.
pub fn write_prompt(dir: &Path, prompt: &str) -> RecorderResult<()> {
    fs::write(dir.join("prompt.md"), prompt)?;
    Ok(())
}
