/// Supported provider profiles
///
/// Each provider maps to exactly one bundled perimeter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Provider {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    #[value(name = "anthropic")]
    Anthropic,
}

impl Provider {
    /// Every provider, in the order they are listed to users
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Anthropic];

    /// Lowercase identifier used on the command line and in file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Name of the bundled configuration file for this provider
    pub fn config_file_name(&self) -> String {
        format!("{}.yaml", self.as_str())
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
