use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
}

/// Status selector on the CSA board. `All` sends no status to the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
}

impl StatusFilter {
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some("pending"),
            StatusFilter::Approved => Some("approved"),
        }
    }

    pub fn matches(self, status: ApprovalStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == ApprovalStatus::Pending,
            StatusFilter::Approved => status == ApprovalStatus::Approved,
        }
    }
}

/// Badge shown next to a bundle on the board and in its detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    Pending,
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_name: Option<String>,
}

/// Engraving ("nick") customisation offered on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NickOption {
    pub available: bool,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchItem {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<NickOption>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    pub name: String,
    #[serde(alias = "price")]
    pub combo_price: f64,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<ClubRef>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub visibility: bool,
    #[serde(default)]
    pub merch_items: Vec<MerchItem>,
    #[serde(default)]
    pub combos: Vec<Combo>,
    #[serde(default)]
    pub size_charts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Bundle {
    pub fn club_name(&self) -> Option<&str> {
        self.club.as_ref().and_then(|c| c.club_name.as_deref())
    }

    pub fn combo(&self, name: &str) -> Option<&Combo> {
        self.combos.iter().find(|c| c.name == name)
    }

    pub fn status_badge(&self) -> StatusBadge {
        match (self.approval_status, self.visibility) {
            (ApprovalStatus::Pending, _) => StatusBadge::Pending,
            (ApprovalStatus::Approved, true) => StatusBadge::Visible,
            (ApprovalStatus::Approved, false) => StatusBadge::Hidden,
        }
    }

    /// Case-insensitive match on the title or the owning club's name. An
    /// empty term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&term)
            || self
                .club_name()
                .is_some_and(|name| name.to_lowercase().contains(&term))
    }
}

/// Editable content of a bundle, as submitted by the club editor or the CSA
/// edit form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BundleDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub merch_items: Vec<MerchItem>,
    #[serde(default)]
    pub combos: Vec<Combo>,
    #[serde(default)]
    pub size_charts: Vec<String>,
}

impl BundleDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |msg: String| Err(DomainError::InvalidInput(msg));

        if self.title.trim().is_empty() {
            return invalid("Bundle title is required".to_string());
        }
        if self.merch_items.is_empty() {
            return invalid("Add at least one merchandise item".to_string());
        }

        let mut names = HashSet::new();
        for item in &self.merch_items {
            let name = item.name.trim();
            if name.is_empty() {
                return invalid("Every item needs a name".to_string());
            }
            if !names.insert(name) {
                return invalid(format!("Duplicate item name '{}'", name));
            }
            if !item.price.is_finite() || item.price < 0.0 {
                return invalid(format!("Item '{}' has an invalid price", name));
            }
            if let Some(nick) = item.nick.as_ref().filter(|n| n.available) {
                if !nick.price.is_finite() || nick.price < 0.0 {
                    return invalid(format!("Item '{}' has an invalid engraving price", name));
                }
            }
        }

        let mut combo_names = HashSet::new();
        for combo in &self.combos {
            let name = combo.name.trim();
            if name.is_empty() {
                return invalid("Every combo needs a name".to_string());
            }
            if !combo_names.insert(name) {
                return invalid(format!("Duplicate combo name '{}'", name));
            }
            if !combo.combo_price.is_finite() || combo.combo_price < 0.0 {
                return invalid(format!("Combo '{}' has an invalid price", name));
            }
            let mut slots = HashSet::new();
            for slot in &combo.items {
                let slot = slot.trim();
                if !names.contains(slot) {
                    return invalid(format!(
                        "Combo '{}' references unknown item '{}'",
                        name, slot
                    ));
                }
                if !slots.insert(slot) {
                    return invalid(format!("Combo '{}' lists '{}' twice", name, slot));
                }
            }
            if slots.len() < 2 {
                return invalid(format!("Combo '{}' must group at least two items", name));
            }
        }

        Ok(())
    }
}
