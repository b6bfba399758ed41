use anyhow::Result;
use dialoguer::{Input, Select};

/// Crops offered in the picker; anything else can be typed in
const COMMON_CROPS: [&str; 5] = ["Rice", "Maize", "Tea", "Coconut", "Rubber"];

/// Crop and planting date chosen at the prompt
#[derive(Debug)]
pub struct AnalysisInputs {
    pub crop: String,
    pub planting_date: Option<String>,
}

/// Prompt for the analysis form fields
pub fn prompt_analysis_inputs(crop: &str, planting_date: Option<&str>) -> Result<AnalysisInputs> {
    println!("\n🌾 Field Analysis\n");

    let mut options: Vec<&str> = COMMON_CROPS.to_vec();
    if !options.iter().any(|c| c.eq_ignore_ascii_case(crop)) {
        options.insert(0, crop);
    }
    options.push("Other...");

    let default = options.iter().position(|c| c.eq_ignore_ascii_case(crop)).unwrap_or(0);
    let selection =
        Select::new().with_prompt("Crop").items(&options).default(default).interact()?;

    let crop = if selection == options.len() - 1 {
        Input::<String>::new().with_prompt("Crop name").interact_text()?
    } else {
        options[selection].to_string()
    };

    let planting_date: String = Input::new()
        .with_prompt("Planting date (YYYY-MM-DD, press Enter to skip)")
        .default(planting_date.unwrap_or_default().to_string())
        .allow_empty(true)
        .interact_text()?;

    Ok(AnalysisInputs {
        crop,
        planting_date: Some(planting_date).filter(|d| !d.trim().is_empty()),
    })
}
