//! Dashboard overview composition.
//!
//! Each region is fetched with its own repository query and settles on its
//! own. A failing region becomes `failed` with a fixed message; it never
//! fails the overview as a whole.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, FuturesUnordered, StreamExt};
use tracing::{error, warn};

use crate::domain::ports::{OverviewQuery, OverviewRepository};
use crate::domain::{OverviewRegion, OverviewSnapshot, RegionData, RegionFrame, RegionState};

/// Default time a snapshot waits for each region.
pub const DEFAULT_OVERVIEW_DEADLINE: Duration = Duration::from_secs(2);

/// Overview service implementing [`OverviewQuery`].
#[derive(Clone)]
pub struct OverviewService<R> {
    repository: Arc<R>,
    deadline: Duration,
}

impl<R> OverviewService<R> {
    /// Create a service whose snapshots wait at most `deadline` per region.
    pub fn new(repository: Arc<R>, deadline: Duration) -> Self {
        Self {
            repository,
            deadline,
        }
    }
}

async fn resolve<R>(repository: Arc<R>, region: OverviewRegion) -> RegionFrame
where
    R: OverviewRepository,
{
    let result = match region {
        OverviewRegion::Cards => repository.card_data().await.map(RegionData::Cards),
        OverviewRegion::Revenue => repository.revenue().await.map(RegionData::Revenue),
        OverviewRegion::LatestInvoices => repository
            .latest_invoices()
            .await
            .map(RegionData::LatestInvoices),
    };
    let state = match result {
        Ok(content) => RegionState::Ready { content },
        Err(err) => {
            error!(?region, error = %err, "overview region failed");
            RegionState::Failed {
                message: region.failure_message().to_owned(),
            }
        }
    };
    RegionFrame { region, state }
}

#[async_trait]
impl<R> OverviewQuery for OverviewService<R>
where
    R: OverviewRepository + 'static,
{
    async fn snapshot(&self) -> OverviewSnapshot {
        let deadline = self.deadline;
        let settle = |region: OverviewRegion| {
            let repository = Arc::clone(&self.repository);
            async move {
                match tokio::time::timeout(deadline, resolve(repository, region)).await {
                    Ok(frame) => frame.state,
                    Err(_) => {
                        warn!(?region, ?deadline, "overview region missed the deadline");
                        RegionState::Placeholder
                    }
                }
            }
        };

        let (cards, revenue, latest_invoices) = tokio::join!(
            settle(OverviewRegion::Cards),
            settle(OverviewRegion::Revenue),
            settle(OverviewRegion::LatestInvoices),
        );
        OverviewSnapshot {
            cards,
            revenue,
            latest_invoices,
        }
    }

    fn stream(&self) -> BoxStream<'static, RegionFrame> {
        let placeholders = stream::iter(OverviewRegion::ALL.map(RegionFrame::placeholder));
        let settled: FuturesUnordered<_> = OverviewRegion::ALL
            .into_iter()
            .map(|region| resolve(Arc::clone(&self.repository), region))
            .collect();
        placeholders.chain(settled).boxed()
    }
}

#[cfg(test)]
mod tests {
    //! Region isolation and streaming order.
    use super::*;
    use crate::domain::ports::{MockOverviewRepository, OverviewRepositoryError};
    use crate::domain::{CardData, LatestInvoice, MonthlyRevenue, format_currency};
    use rstest::rstest;

    fn cards() -> CardData {
        CardData {
            number_of_customers: 6,
            number_of_invoices: 13,
            total_paid: 120_000,
            total_pending: 45_000,
            formatted_total_paid: format_currency(120_000),
            formatted_total_pending: format_currency(45_000),
        }
    }

    fn revenue() -> Vec<MonthlyRevenue> {
        vec![MonthlyRevenue {
            month: "Jan".to_owned(),
            revenue: 2000,
        }]
    }

    struct SlowRevenue;

    #[async_trait]
    impl OverviewRepository for SlowRevenue {
        async fn card_data(&self) -> Result<CardData, OverviewRepositoryError> {
            Ok(cards())
        }

        async fn revenue(&self) -> Result<Vec<MonthlyRevenue>, OverviewRepositoryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(revenue())
        }

        async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, OverviewRepositoryError> {
            Ok(Vec::new())
        }
    }

    #[rstest]
    #[tokio::test]
    async fn failing_region_does_not_affect_siblings() {
        let mut repo = MockOverviewRepository::new();
        repo.expect_card_data().return_once(|| Ok(cards()));
        repo.expect_revenue()
            .return_once(|| Err(OverviewRepositoryError::query("relation missing")));
        repo.expect_latest_invoices().return_once(|| Ok(Vec::new()));

        let service = OverviewService::new(Arc::new(repo), DEFAULT_OVERVIEW_DEADLINE);
        let snapshot = service.snapshot().await;

        assert_eq!(
            snapshot.cards,
            RegionState::Ready {
                content: RegionData::Cards(cards())
            }
        );
        assert_eq!(
            snapshot.revenue,
            RegionState::Failed {
                message: "Failed to fetch revenue data.".to_owned()
            }
        );
        assert_eq!(
            snapshot.latest_invoices,
            RegionState::Ready {
                content: RegionData::LatestInvoices(Vec::new())
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn slow_region_stays_a_placeholder_in_snapshots() {
        let service = OverviewService::new(Arc::new(SlowRevenue), Duration::from_millis(20));
        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.revenue, RegionState::Placeholder);
        assert!(matches!(snapshot.cards, RegionState::Ready { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn stream_emits_placeholders_before_settled_frames() {
        let mut repo = MockOverviewRepository::new();
        repo.expect_card_data().return_once(|| Ok(cards()));
        repo.expect_revenue().return_once(|| Ok(revenue()));
        repo.expect_latest_invoices()
            .return_once(|| Err(OverviewRepositoryError::connection("down")));

        let service = OverviewService::new(Arc::new(repo), DEFAULT_OVERVIEW_DEADLINE);
        let frames: Vec<RegionFrame> = service.stream().collect().await;

        assert_eq!(frames.len(), 6);
        assert!(
            frames[..3]
                .iter()
                .all(|frame| frame.state == RegionState::Placeholder)
        );
        let failed = frames[3..]
            .iter()
            .find(|frame| frame.region == OverviewRegion::LatestInvoices)
            .expect("latest invoices frame");
        assert_eq!(
            failed.state,
            RegionState::Failed {
                message: "Failed to fetch the latest invoices.".to_owned()
            }
        );
        assert!(
            frames[3..]
                .iter()
                .all(|frame| frame.state != RegionState::Placeholder)
        );
    }
}
