//! Ad generation CLI.

use std::path::PathBuf;

use adgen_agent::{Orchestrator, RunOptions};
use adgen_models::{AspectRatio, GenerationOutput, VideoDuration, VideoResolution};
use adgen_recorder::{
    create_run_dir, decide_run, provider_display_name, write_prompt, write_readme, RecordedRun,
    RunDecision,
};
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "adgen",
    version,
    about = "Generate video advertisements from product pages"
)]
struct Cli {
    /// URL of the product detail page
    url: String,

    /// Base output directory for generated videos
    #[arg(short = 'o', long = "output", default_value = "./output")]
    output: PathBuf,

    /// Also generate video using Kie.ai Veo 3 (requires KIE_API_KEY)
    #[arg(long)]
    veo3: bool,

    /// Use Veo 3 Quality mode instead of Fast (slower, higher quality)
    #[arg(long = "veo3-quality")]
    veo3_quality: bool,

    /// Clip duration in seconds for the FreePik render
    #[arg(long, default_value = "5", value_parser = parse_duration)]
    duration: VideoDuration,

    /// Output resolution
    #[arg(long, default_value = "720p", value_parser = parse_resolution)]
    resolution: VideoResolution,

    /// Output aspect ratio
    #[arg(long = "aspect", default_value = "16:9", value_parser = parse_aspect)]
    aspect_ratio: AspectRatio,

    /// Force regeneration even if output already exists for this URL
    #[arg(long)]
    force: bool,
}

fn parse_duration(value: &str) -> Result<VideoDuration, String> {
    let secs: u32 = value.parse().map_err(|_| format!("not a number: {value}"))?;
    VideoDuration::try_from(secs).map_err(|e| e.to_string())
}

fn parse_resolution(value: &str) -> Result<VideoResolution, String> {
    match value {
        "720p" => Ok(VideoResolution::Hd720p),
        "1080p" => Ok(VideoResolution::Fhd1080p),
        other => Err(format!("unknown resolution {other} (use 720p or 1080p)")),
    }
}

fn parse_aspect(value: &str) -> Result<AspectRatio, String> {
    match value {
        "16:9" => Ok(AspectRatio::Landscape16x9),
        "9:16" => Ok(AspectRatio::Portrait9x16),
        other => Err(format!("unknown aspect ratio {other} (use 16:9 or 9:16)")),
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("adgen=info,warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match decide_run(&cli.output, &cli.url, cli.force) {
        RunDecision::Reuse(prior) => {
            print_prior_run(&prior);
            return Ok(());
        }
        RunDecision::Generate => {}
    }

    let run_dir = create_run_dir(&cli.output, &cli.url)
        .with_context(|| format!("creating run directory under {}", cli.output.display()))?;
    info!(url = %cli.url, dir = %run_dir.display(), "Starting ad generation run");

    let options = RunOptions {
        use_veo3: cli.veo3,
        veo3_quality: cli.veo3_quality,
        duration: cli.duration,
        resolution: cli.resolution,
        aspect_ratio: cli.aspect_ratio,
    };

    let orchestrator = Orchestrator::from_env()?;
    let output = orchestrator
        .generate(&cli.url, &run_dir, &options)
        .await
        .context("ad generation failed")?;

    write_readme(&run_dir, &output, cli.veo3_quality)?;
    write_prompt(&run_dir, &output.video_prompt)?;

    print_summary(&output, cli.veo3_quality);
    Ok(())
}

fn print_prior_run(run: &RecordedRun) {
    println!("Generation already exists for this URL.");
    println!("  Directory: {}", run.dir.display());
    if let Some(generated_at) = &run.generated_at {
        println!("  Generated: {generated_at}");
    }
    for video in &run.videos {
        match &video.filename {
            Some(name) => println!("  {}: {} ({})", video.provider, name, video.status),
            None => println!("  {}: {} ({})", video.provider, video.task_id, video.status),
        }
    }
    println!("Use --force to regenerate.");
}

fn print_summary(output: &GenerationOutput, veo3_quality: bool) {
    println!("\nGeneration complete.");
    println!("\nProduct: {}", output.product.title);
    if let Some(brand) = &output.product.brand {
        println!("Brand: {brand}");
    }
    if let Some(price) = &output.product.price {
        println!("Price: {price}");
    }

    println!("\nVideo prompt:\n{}", output.video_prompt);

    println!("\nGenerated videos:");
    for video in &output.videos {
        println!("\n{}:", provider_display_name(video.provider, veo3_quality));
        println!("  Task ID: {}", video.job_id);
        println!("  Status: {}", video.status);
        if let Some(path) = &video.local_path {
            println!("  File: {}", path.display());
        }
    }

    if let Some(dir) = &output.output_dir {
        println!("\nOutput directory: {}", dir.display());
    }
}
