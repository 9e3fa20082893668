//! Driving port for the dashboard overview.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::{OverviewSnapshot, RegionFrame};

/// Domain use-case port composing the overview regions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OverviewQuery: Send + Sync {
    /// Resolve every region concurrently. Regions that miss the deadline are
    /// reported as placeholders and failing regions as failed.
    async fn snapshot(&self) -> OverviewSnapshot;

    /// Stream one placeholder frame per region, then one settled frame per
    /// region in completion order.
    fn stream(&self) -> BoxStream<'static, RegionFrame>;
}
