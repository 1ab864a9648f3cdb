//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?dry_run=true` preview flag for enrichment endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DryRunParams {
    #[serde(default, alias = "dryRun")]
    pub dry_run: bool,
}

/// `?suffix=` selecting a community list.
#[derive(Debug, Default, Deserialize)]
pub struct SuffixParams {
    pub suffix: Option<String>,
}

/// `?confirm_code=` for destructive admin operations.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(alias = "confirmCode", alias = "code")]
    pub confirm_code: Option<String>,
}
