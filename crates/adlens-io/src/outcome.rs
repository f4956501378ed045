//! The result of loading a dataset, as handed to the rendering layer.
//!
//! A failed load carries only its message. Views can only be built from
//! a [`LoadOutcome::Ready`] dataset, so aggregation never runs on
//! absent data.

use serde::Serialize;

use adlens_pipeline::{DashboardViews, MarketingData, ViewCache};

use crate::source::DataSource;

/// A loaded dataset or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LoadOutcome {
    Failed { message: String },
    Ready(MarketingData),
}

impl LoadOutcome {
    /// Fetch from `source`, capturing any error as a message.
    pub fn load(source: &impl DataSource) -> Self {
        let origin = source.describe();
        match source.fetch() {
            Ok(data) => {
                tracing::debug!(%origin, campaigns = data.campaigns.len(), "dataset loaded");
                Self::Ready(data)
            }
            Err(e) => {
                tracing::warn!(%origin, error = %e, "dataset load failed");
                Self::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// The dataset, if loading succeeded.
    #[must_use]
    pub const fn data(&self) -> Option<&MarketingData> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Failed { .. } => None,
        }
    }

    /// Views for the loaded dataset, or the failure message.
    ///
    /// # Errors
    ///
    /// Returns the load failure message without touching `cache`.
    pub fn views<'a>(&self, cache: &'a mut ViewCache) -> Result<&'a DashboardViews, &str> {
        match self {
            Self::Ready(data) => Ok(cache.get_or_build(data)),
            Self::Failed { message } => Err(message),
        }
    }
}
