use agriguard_core::error::{AgriguardError, ANALYSIS_FAILED_MESSAGE};
use console::style;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a missing input file
pub fn file_not_found(path: &Path, command: &str) -> CliError {
    CliError::new("File not found")
        .with_context(format!("The specified file does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
        .with_help(format!("Run: agriguard {} --help", command))
}

/// Create error for a boundary file that cannot be used
pub fn invalid_boundary(path: &Path, error: &AgriguardError) -> CliError {
    CliError::new("Invalid field boundary")
        .with_context(format!("Path: {}\n\nError: {}", path.display(), error))
        .with_suggestion("Export the boundary as a GeoJSON Polygon or a Feature holding one")
        .with_suggestion("Check the file with: agriguard centroid <file>")
        .with_help("Run: agriguard centroid --help")
}

/// Create error for a saved response that is not a usable result
pub fn invalid_result(path: &Path, error: &AgriguardError) -> CliError {
    CliError::new("Invalid prediction response")
        .with_context(format!("Path: {}\n\nError: {}", path.display(), error))
        .with_suggestion("The file must be the JSON body returned by the prediction backend")
        .with_suggestion("It needs at least 'risk_level' and 'confidence'")
        .with_help("Run: agriguard render --help")
}

/// Create error for a failed analysis
pub fn analysis_failed(endpoint: &str, error: &AgriguardError) -> CliError {
    let mut cli_error =
        CliError::new(ANALYSIS_FAILED_MESSAGE).with_context(format!("Error: {}", error));

    if let AgriguardError::PredictionUnavailable { remediation, .. } = error {
        cli_error = cli_error.with_suggestion(remediation.clone());
    }

    cli_error
        .with_suggestion(format!("Check the backend is reachable: {}", endpoint))
        .with_suggestion("Or point at another one: --predict-url <URL>")
        .with_help("Run: agriguard config")
}

/// Create error for a failed geocoding lookup
pub fn geocoding_failed(service: &str, error: &AgriguardError) -> CliError {
    CliError::new("Reverse geocoding failed")
        .with_context(format!("Service: {}\n\nError: {}", service, error))
        .with_suggestion("Check your network connection")
        .with_suggestion("Or use another Nominatim instance: --geocoder-url <URL>")
        .with_help("Run: agriguard config")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check agriguard.toml for syntax errors")
        .with_suggestion("Or check the AGRIGUARD_* environment variables")
        .with_help("Run: agriguard config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(AgriguardError::ConfigInvalid { key, reason }) =
        error.chain().find_map(|cause| cause.downcast_ref::<AgriguardError>())
    {
        return invalid_config(key, reason);
    }

    let message = format!("{:#}", error);

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}
