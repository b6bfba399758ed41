use agriguard_geo::summarize;
use anyhow::Result;

use crate::cli::CentroidArgs;
use crate::output::OutputWriter;
use crate::output_types::CentroidOutput;

pub fn execute(args: CentroidArgs, output: &OutputWriter) -> Result<()> {
    let boundary = super::read_boundary(&args.path, "centroid")?;
    let summary = summarize(&boundary);

    for warning in &summary.warnings {
        output.warning(warning);
    }

    output.section("Boundary");
    output.kv("File", args.path.display());
    output.kv("Vertices", summary.vertex_count);
    match summary.centroid {
        Some(centroid) => output.kv("Centroid (vertex mean)", centroid),
        None => output.kv("Centroid (vertex mean)", "n/a"),
    }
    if let Some(weighted) = summary.area_weighted_centroid {
        output.kv("Centroid (area-weighted)", weighted);
    }
    if let Some(offset) = summary.centroid_offset_m {
        output.kv("Offset between centroids", format!("{:.1} m", offset));
    }
    if let Some(area) = summary.area_hectares {
        output.kv("Area", format!("{:.2} ha", area));
    }
    if let Some([min_lon, min_lat, max_lon, max_lat]) = summary.bounds {
        output.kv(
            "Bounds",
            format!("{:.5}, {:.5} → {:.5}, {:.5}", min_lat, min_lon, max_lat, max_lon),
        );
    }

    output.result(CentroidOutput {
        path: args.path.display().to_string(),
        summary,
    })
}
