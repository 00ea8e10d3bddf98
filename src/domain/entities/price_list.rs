//! Price lists: per-currency product prices with a validity window.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PriceList {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// ISO 4217 code, upper-case.
    pub currency: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub items: Vec<PriceListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriceList {
    /// Whether the list applies at instant `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.valid_from && self.valid_to.is_none_or(|to| at <= to)
    }

    pub fn apply(&mut self, patch: PriceListPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.currency {
            self.currency = v;
        }
        if let Some(v) = patch.valid_from {
            self.valid_from = v;
        }
        if let Some(v) = patch.valid_to {
            self.valid_to = v;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceListItem {
    pub product_id: Uuid,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewPriceList {
    pub tenant_id: Uuid,
    pub name: String,
    pub currency: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct PriceListPatch {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn list(valid_to: Option<DateTime<Utc>>) -> PriceList {
        let now = Utc::now();
        PriceList {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Retail".to_string(),
            currency: "EUR".to_string(),
            valid_from: now - Duration::days(1),
            valid_to,
            items: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_open_ended_list_is_valid_now() {
        assert!(list(None).is_valid_at(Utc::now()));
    }

    #[test]
    fn test_expired_list_is_not_valid() {
        let l = list(Some(Utc::now() - Duration::hours(1)));
        assert!(!l.is_valid_at(Utc::now()));
    }

    #[test]
    fn test_not_yet_started_list_is_not_valid() {
        let l = list(None);
        assert!(!l.is_valid_at(l.valid_from - Duration::seconds(1)));
    }
}
