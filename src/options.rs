/// Configuration options for a [`crate::driver::ReportDriver`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// When true, suppress all operator-channel output.
    pub quiet: bool,

    /// When true, warn once per file whose mutations reference lines beyond
    /// the located source text.
    pub warn_unreachable_mutations: bool,
}

impl ReportOptions {
    /// Construct a `ReportOptions` instance with default values.
    pub fn new() -> Self {
        Self {
            quiet: false,
            warn_unreachable_mutations: true,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new()
    }
}
