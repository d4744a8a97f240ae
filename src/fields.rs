//! Well-known field roles and their mapping onto dataset columns.
//!
//! Filtering, summaries and chart defaults refer to columns by [`FieldRole`]. A [`FieldMapping`]
//! names the column for each role, and is resolved once per dataset into [`ResolvedFields`]
//! (role → column index), so evaluation never searches headers per row.

use serde::{Deserialize, Serialize};

use crate::types::Schema;

const ROLE_COUNT: usize = 14;

/// Semantic role of a well-known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldRole {
    Identifier,
    Revenue,
    Ebitda,
    TotalPursuits,
    Vertical,
    Activity,
    Region,
    State,
    MarketDate,
    SmartShareEnabled,
    InboundInquiryEnabled,
    DealIntent,
    DealIntentStatus,
    AccountOwner,
}

impl FieldRole {
    /// Every role, in declaration order.
    pub const ALL: [FieldRole; ROLE_COUNT] = [
        FieldRole::Identifier,
        FieldRole::Revenue,
        FieldRole::Ebitda,
        FieldRole::TotalPursuits,
        FieldRole::Vertical,
        FieldRole::Activity,
        FieldRole::Region,
        FieldRole::State,
        FieldRole::MarketDate,
        FieldRole::SmartShareEnabled,
        FieldRole::InboundInquiryEnabled,
        FieldRole::DealIntent,
        FieldRole::DealIntentStatus,
        FieldRole::AccountOwner,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Column names for every [`FieldRole`].
///
/// [`Default`] matches the headers of the standard deal export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMapping {
    /// Candidate identifier columns; the first one present in the header wins.
    pub identifier_aliases: Vec<String>,
    pub revenue: String,
    pub ebitda: String,
    pub total_pursuits: String,
    pub vertical: String,
    pub activity: String,
    pub region: String,
    pub state: String,
    pub market_date: String,
    pub smartshare_enabled: String,
    pub inbound_inquiry_enabled: String,
    pub deal_intent: String,
    pub deal_intent_status: String,
    pub account_owner: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            identifier_aliases: ["Deal ID", "Deal Id", "ID", "Id", "id", "Listing ID"]
                .into_iter()
                .map(String::from)
                .collect(),
            revenue: "Revenue".to_string(),
            ebitda: "EBITDA".to_string(),
            total_pursuits: "Total Pursuits".to_string(),
            vertical: "Primary Supply Vertical".to_string(),
            activity: "Primary Supply Activity".to_string(),
            region: "Region".to_string(),
            state: "State/Province".to_string(),
            market_date: "Market Date".to_string(),
            smartshare_enabled: "SmartShare Enabled?".to_string(),
            inbound_inquiry_enabled: "Inbound Inquiry Enabled?".to_string(),
            deal_intent: "Deal Intent".to_string(),
            deal_intent_status: "Deal Intent Status".to_string(),
            account_owner: "Account Owner".to_string(),
        }
    }
}

impl FieldMapping {
    /// Column name configured for `role`.
    ///
    /// For [`FieldRole::Identifier`] this is the first alias (`None` if there are no aliases);
    /// use [`FieldMapping::resolve`] to pick the alias actually present in a dataset.
    pub fn column(&self, role: FieldRole) -> Option<&str> {
        let name = match role {
            FieldRole::Identifier => return self.identifier_aliases.first().map(String::as_str),
            FieldRole::Revenue => &self.revenue,
            FieldRole::Ebitda => &self.ebitda,
            FieldRole::TotalPursuits => &self.total_pursuits,
            FieldRole::Vertical => &self.vertical,
            FieldRole::Activity => &self.activity,
            FieldRole::Region => &self.region,
            FieldRole::State => &self.state,
            FieldRole::MarketDate => &self.market_date,
            FieldRole::SmartShareEnabled => &self.smartshare_enabled,
            FieldRole::InboundInquiryEnabled => &self.inbound_inquiry_enabled,
            FieldRole::DealIntent => &self.deal_intent,
            FieldRole::DealIntentStatus => &self.deal_intent_status,
            FieldRole::AccountOwner => &self.account_owner,
        };
        Some(name.as_str())
    }

    /// Columns charted by default: vertical, activity, region, state.
    pub fn default_group_by(&self) -> Vec<String> {
        [
            &self.vertical,
            &self.activity,
            &self.region,
            &self.state,
        ]
        .into_iter()
        .cloned()
        .collect()
    }

    /// Columns summarized by default: revenue and EBITDA.
    pub fn default_summary_fields(&self) -> Vec<String> {
        vec![self.revenue.clone(), self.ebitda.clone()]
    }

    /// Resolve every role to a column index in `schema`.
    pub fn resolve(&self, schema: &Schema) -> ResolvedFields {
        let mut indices = [None; ROLE_COUNT];
        for role in FieldRole::ALL {
            indices[role.slot()] = match role {
                FieldRole::Identifier => self
                    .identifier_aliases
                    .iter()
                    .find_map(|alias| schema.index_of(alias)),
                _ => self.column(role).and_then(|name| schema.index_of(name)),
            };
        }
        ResolvedFields { indices }
    }
}

/// Role → column index table for one [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFields {
    indices: [Option<usize>; ROLE_COUNT],
}

impl ResolvedFields {
    /// Column index for `role`, or `None` if the dataset has no such column.
    pub fn index(&self, role: FieldRole) -> Option<usize> {
        self.indices[role.slot()]
    }

    /// Roles that could not be located in the schema.
    pub fn missing(&self) -> Vec<FieldRole> {
        FieldRole::ALL
            .into_iter()
            .filter(|r| self.index(*r).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldMapping, FieldRole};
    use crate::types::Schema;

    #[test]
    fn resolve_locates_well_known_columns() {
        let schema = Schema::new(["Region", "Revenue", "Deal Intent Status"]);
        let fields = FieldMapping::default().resolve(&schema);
        assert_eq!(fields.index(FieldRole::Region), Some(0));
        assert_eq!(fields.index(FieldRole::Revenue), Some(1));
        assert_eq!(fields.index(FieldRole::DealIntentStatus), Some(2));
        assert_eq!(fields.index(FieldRole::Ebitda), None);
    }

    #[test]
    fn identifier_uses_first_alias_present() {
        let schema = Schema::new(["Listing ID", "ID", "Revenue"]);
        let fields = FieldMapping::default().resolve(&schema);
        // "ID" precedes "Listing ID" in the alias list.
        assert_eq!(fields.index(FieldRole::Identifier), Some(1));
    }

    #[test]
    fn missing_lists_unresolved_roles() {
        let schema = Schema::new(["Revenue"]);
        let missing = FieldMapping::default().resolve(&schema).missing();
        assert!(!missing.contains(&FieldRole::Revenue));
        assert!(missing.contains(&FieldRole::MarketDate));
        assert_eq!(missing.len(), FieldRole::ALL.len() - 1);
    }

    #[test]
    fn renamed_columns_resolve_through_mapping() {
        let mapping = FieldMapping {
            revenue: "Annual Revenue".to_string(),
            ..FieldMapping::default()
        };
        let schema = Schema::new(["Revenue", "Annual Revenue"]);
        assert_eq!(mapping.resolve(&schema).index(FieldRole::Revenue), Some(1));
    }

    #[test]
    fn mapping_deserializes_partial_overrides() {
        let mapping: FieldMapping =
            serde_json::from_str(r#"{"marketDate": "Listed On"}"#).unwrap();
        assert_eq!(mapping.column(FieldRole::MarketDate), Some("Listed On"));
        assert_eq!(mapping.column(FieldRole::Revenue), Some("Revenue"));
    }
}
