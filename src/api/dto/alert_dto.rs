//! Alert list query parameters.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for `GET /alerts`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertListParams {
    /// Maximum number of alerts (1–500). Defaults to 50.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Include resolved alerts. Defaults to `false` (active only).
    #[serde(default)]
    pub include_resolved: bool,
}
