use clap::Parser;
use procell_analysis::pipeline::services::image::overlay_service::export_annotated_png;
use procell_analysis::{
    AnalysisError, Capture, Configuration, OverlayRenderer, SkinAnalysis, SkinAnalysisFactory,
};
use std::path::PathBuf;
use tower::ServiceExt;
use tracing::{info, Level};

/// Skin analysis for PMU consultations: detects pigmentation, redness and
/// texture in a face photo and writes an annotated copy.
#[derive(Parser, Debug)]
#[command(name = "procell", version)]
struct Cli {
    /// Photo to analyse
    image: PathBuf,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overlay opacity, 0.1 to 0.9
    #[arg(short, long, value_parser = parse_opacity)]
    opacity: Option<f32>,

    /// Directory for the annotated PNG
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the full report as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn parse_opacity(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !(0.1..=0.9).contains(&value) {
        return Err("opacity must be between 0.1 and 0.9".to_string());
    }
    Ok(value)
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(analysis: &SkinAnalysis) {
    let summary = &analysis.summary;
    println!(
        "Overall: {} (confidence {})",
        summary.overall_severity, summary.overall_confidence
    );
    for assessment in &summary.assessments {
        println!(
            "  {:<20} {:>5.1}%  {:<12} priority {}",
            assessment.condition.label(),
            assessment.average_pct,
            assessment.severity.to_string(),
            assessment.priority
        );
    }
    println!();
    for region in &analysis.regions {
        println!(
            "  {:<12} pigment {:>3}%  redness {:>3}%  texture {:>3}%",
            region.name, region.pigmentation_pct, region.erythema_pct, region.texture_pct
        );
    }
    if let Some(area) = &summary.primary_concern {
        println!("\nPrimary concern: {}", area);
    }

    let recs = &summary.recommendations;
    for (title, items) in [
        ("Immediate", &recs.immediate),
        ("Short term", &recs.short_term),
        ("Long term", &recs.long_term),
    ] {
        for item in items {
            println!("[{}] {}", title, item);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AnalysisError> {
    let cli = Cli::parse();
    let mut configuration = Configuration::load(cli.config.as_deref())?;
    if let Some(opacity) = cli.opacity {
        configuration.overlay_opacity = opacity;
    }
    if let Some(out_dir) = cli.out_dir {
        configuration.output_dir = out_dir;
    }
    init_logging(configuration.log_level());

    let capture = Capture::open(&cli.image)?;
    info!(
        "Analysing {} ({}x{})",
        capture.source_name(),
        capture.dimensions().0,
        capture.dimensions().1
    );

    info!("Erythema and severity thresholds are provisional and not clinically validated");
    let orchestrator = SkinAnalysisFactory::create_custom(configuration.segmentation.clone())?;
    let analysis = orchestrator.oneshot(capture).await?;

    let renderer = OverlayRenderer::new(configuration.overlay_opacity)
        .with_outlines(configuration.draw_region_outlines);
    let output = export_annotated_png(&analysis, &renderer, &configuration.output_dir)?;

    if cli.json {
        println!("{}", analysis.report().to_json()?);
    } else {
        print_summary(&analysis);
        println!("\nAnnotated image: {}", output.display());
    }
    Ok(())
}
