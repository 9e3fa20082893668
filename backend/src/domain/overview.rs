//! Dashboard overview regions.
//!
//! The overview is split into independently resolved regions. Each region
//! starts as a placeholder and settles to `ready` or `failed` without waiting
//! for its siblings, so a slow revenue query never hides the summary cards.

use serde::Serialize;
use utoipa::ToSchema;

use super::{AmountCents, InvoiceId};

/// Headline totals shown in the summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub number_of_customers: i64,
    pub number_of_invoices: i64,
    pub total_paid: i64,
    pub total_pending: i64,
    pub formatted_total_paid: String,
    pub formatted_total_pending: String,
}

/// Revenue booked for one month, in whole dollars as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    #[schema(example = "Jan")]
    pub month: String,
    #[schema(example = 2000)]
    pub revenue: i32,
}

/// Row of the "latest invoices" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestInvoice {
    #[schema(value_type = String)]
    pub id: InvoiceId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: AmountCents,
    pub formatted_amount: String,
}

/// Identifier of an overview region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum OverviewRegion {
    Cards,
    Revenue,
    LatestInvoices,
}

impl OverviewRegion {
    /// Every region, in render order.
    pub const ALL: [Self; 3] = [Self::Cards, Self::Revenue, Self::LatestInvoices];

    /// Message shown when the region's data cannot be loaded.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Cards => "Failed to fetch card data.",
            Self::Revenue => "Failed to fetch revenue data.",
            Self::LatestInvoices => "Failed to fetch the latest invoices.",
        }
    }
}

/// Resolved payload of a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum RegionData {
    Cards(CardData),
    Revenue(Vec<MonthlyRevenue>),
    LatestInvoices(Vec<LatestInvoice>),
}

/// Readiness of a single region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RegionState {
    /// Data has not arrived yet; clients render a skeleton.
    Placeholder,
    Ready { content: RegionData },
    Failed { message: String },
}

/// One update of a streamed overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionFrame {
    pub region: OverviewRegion,
    #[serde(flatten)]
    pub state: RegionState,
}

impl RegionFrame {
    /// Placeholder frame for a region.
    pub fn placeholder(region: OverviewRegion) -> Self {
        Self {
            region,
            state: RegionState::Placeholder,
        }
    }
}

/// All regions resolved within the snapshot deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSnapshot {
    pub cards: RegionState,
    pub revenue: RegionState,
    pub latest_invoices: RegionState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frames_serialise_flat_with_state_tag() {
        let frame = RegionFrame {
            region: OverviewRegion::Revenue,
            state: RegionState::Ready {
                content: RegionData::Revenue(vec![MonthlyRevenue {
                    month: "Jan".to_owned(),
                    revenue: 2000,
                }]),
            },
        };

        let value = serde_json::to_value(frame).expect("serialise frame");
        assert_eq!(
            value,
            json!({
                "region": "revenue",
                "state": "ready",
                "content": {
                    "kind": "revenue",
                    "data": [{ "month": "Jan", "revenue": 2000 }]
                }
            })
        );
    }

    #[test]
    fn placeholder_frames_carry_no_payload() {
        let value = serde_json::to_value(RegionFrame::placeholder(OverviewRegion::Cards))
            .expect("serialise frame");
        assert_eq!(value, json!({ "region": "cards", "state": "placeholder" }));
    }
}
