use chrono::NaiveDate;
use serde::Serialize;

use super::partners::Partner;

/// Where a partner's time-boxed promotion stands on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PromotionWindow {
    NotOffered,
    Open { valid_until: NaiveDate },
    Closed { ended_on: NaiveDate },
}

impl PromotionWindow {
    /// The window is inclusive: a promotion valid until `D` still applies on `D`.
    pub fn for_partner(partner: &Partner, on: NaiveDate) -> Self {
        if !partner.promotional_discount_eligible {
            return PromotionWindow::NotOffered;
        }
        match partner.promotional_discount_valid_until {
            Some(valid_until) if on <= valid_until => PromotionWindow::Open { valid_until },
            Some(ended_on) => PromotionWindow::Closed { ended_on },
            None => PromotionWindow::NotOffered,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PromotionWindow::Open { .. })
    }
}

pub(crate) fn promotion_open(partner: &Partner, on: NaiveDate) -> bool {
    PromotionWindow::for_partner(partner, on).is_open()
}

pub(crate) fn residency_offered(partner: &Partner) -> bool {
    partner.residency_discount_eligible
}

pub(crate) fn alumni_offered(partner: &Partner) -> bool {
    partner.alumni_discount_eligible
}

/// Which optional discount toggles a landing page should surface for a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscountAvailability {
    pub show_promotional: bool,
    pub show_residency: bool,
    pub show_alumni: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotional_valid_until: Option<NaiveDate>,
}

impl DiscountAvailability {
    pub(crate) fn for_partner(partner: &Partner, on: NaiveDate) -> Self {
        let window = PromotionWindow::for_partner(partner, on);
        let promotional_valid_until = match window {
            PromotionWindow::Open { valid_until } => Some(valid_until),
            _ => None,
        };

        Self {
            show_promotional: window.is_open(),
            show_residency: residency_offered(partner),
            show_alumni: alumni_offered(partner),
            promotional_valid_until,
        }
    }
}
