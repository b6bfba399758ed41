use std::sync::Arc;

use agriguard_client::{AnalysisOutcome, DashboardSession, HttpPredictor, NominatimGeocoder};
use agriguard_core::config::LayeredConfig;
use agriguard_core::render::ResultView;
use anyhow::{anyhow, Result};

use crate::cli::AnalyzeArgs;
use crate::errors::analysis_failed;
use crate::interactive::prompt_analysis_inputs;
use crate::output::OutputWriter;
use crate::output_types::AnalyzeOutput;
use crate::progress::{create_spinner, finish_error, finish_success};

use super::render::print_report;

pub async fn execute(args: AnalyzeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let boundary = super::read_boundary(&args.path, "analyze")?;

    let mut crop = args.crop.unwrap_or_else(|| config.default_crop.value.clone());
    let mut planting_date = args.planting_date;
    if args.interactive {
        let inputs = prompt_analysis_inputs(&crop, planting_date.as_deref())?;
        crop = inputs.crop;
        planting_date = inputs.planting_date;
    }

    let geocoder = NominatimGeocoder::from_config(config)?;
    let predictor = HttpPredictor::from_config(config)?;
    let session = DashboardSession::with_default_crop(
        Arc::new(geocoder),
        Arc::new(predictor),
        config.default_crop.value.clone(),
    );

    let captured = session.capture_boundary(boundary);
    for warning in &captured.summary.warnings {
        output.warning(warning);
    }

    let spinner = create_spinner(&format!("Analyzing {} field...", crop), output.is_json());
    // Place lookup runs alongside the analysis; its failure is not fatal
    let (place_label, outcome) = tokio::join!(
        session.resolve_place(),
        session.analyze_with(crop.clone(), planting_date.clone())
    );

    let report = match outcome {
        Ok(AnalysisOutcome::Applied(report)) => {
            finish_success(&spinner, "Analysis complete");
            report
        }
        Ok(AnalysisOutcome::Superseded) => {
            finish_error(&spinner, "Analysis superseded");
            return Err(anyhow!("Analysis was superseded by a newer request"));
        }
        Err(e) => {
            finish_error(&spinner, "Analysis failed");
            return Err(analysis_failed(&config.predict_url.value, &e).into());
        }
    };

    output.section("Field");
    match &place_label {
        Some(label) => output.kv("Location", label),
        None => output.kv("Location", "(unknown)"),
    }
    if let Some(centroid) = captured.summary.centroid {
        output.kv("Centroid", centroid);
    }
    output.kv("Crop", &crop);
    if let Some(date) = &planting_date {
        output.kv("Planting date", date);
    }

    let view = ResultView::from_result(&report.result);
    print_report(&report, &view, output);

    output.result(AnalyzeOutput {
        crop,
        planting_date,
        place_label,
        boundary: captured.summary,
        report,
        view,
    })
}
