use agriguard_client::NominatimGeocoder;
use agriguard_core::config::LayeredConfig;
use agriguard_core::models::LatLon;
use agriguard_core::ports::Geocoder;
use anyhow::Result;

use crate::cli::GeocodeArgs;
use crate::errors::geocoding_failed;
use crate::output::OutputWriter;
use crate::output_types::GeocodeOutput;
use crate::progress::{create_spinner, finish_error, finish_success};

pub async fn execute(args: GeocodeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let geocoder = NominatimGeocoder::from_config(config)?;
    let location = LatLon::new(args.lat, args.lon);

    let spinner = create_spinner(&format!("Looking up {}...", location), output.is_json());
    let place = match geocoder.reverse(location).await {
        Ok(place) => {
            finish_success(&spinner, "Found place");
            place
        }
        Err(e) => {
            finish_error(&spinner, "Lookup failed");
            return Err(geocoding_failed(&config.geocoder_url.value, &e).into());
        }
    };

    output.kv("Place", place.label());
    output.kv("Full name", &place.display_name);

    output.result(GeocodeOutput {
        location,
        label: place.label(),
        display_name: place.display_name,
    })
}
