//! Channel-specific financial rules. Pure lookups over static rate tables
//! loaded once at compile time; unknown channel names resolve to the
//! "Other" fallback instead of failing.

use serde::Serialize;

/// Slack allowed between amount due and amount received before a booking
/// still counts as fully paid. Absorbs rounding differences; an overpayment
/// (negative pending) is also Paid.
pub const PAID_TOLERANCE: i64 = 5;

pub const STATUS_PAID: &str = "Paid";
pub const STATUS_PART_PAYMENT: &str = "Part-Payment";
pub const STATUS_PENDING_PAYMENT: &str = "Pending Payment";

struct ChannelPolicy {
    ota_name: &'static str,
    commission_rate: f64,
    gst_rate: f64,
    bank: &'static str,
}

const FALLBACK_POLICY: ChannelPolicy = ChannelPolicy {
    ota_name: "Other",
    commission_rate: 0.0,
    gst_rate: 0.0,
    bank: "Secondary",
};

const CHANNEL_POLICIES: &[ChannelPolicy] = &[
    ChannelPolicy { ota_name: "Booking.com", commission_rate: 0.15, gst_rate: 0.12, bank: "Primary" },
    ChannelPolicy { ota_name: "Hostelworld", commission_rate: 0.15, gst_rate: 0.12, bank: "Primary" },
    ChannelPolicy { ota_name: "Makemytrip", commission_rate: 0.0, gst_rate: 0.0, bank: "Primary" },
    ChannelPolicy { ota_name: "Agoda", commission_rate: 0.0, gst_rate: 0.0, bank: "Primary" },
    ChannelPolicy { ota_name: "Direct", commission_rate: 0.0, gst_rate: 0.0, bank: "Secondary" },
    ChannelPolicy { ota_name: "Website", commission_rate: 0.0, gst_rate: 0.0, bank: "Primary" },
    ChannelPolicy { ota_name: "Extension", commission_rate: 0.0, gst_rate: 0.0, bank: "Secondary" },
    FALLBACK_POLICY,
];

fn policy_for(ota_name: &str) -> &'static ChannelPolicy {
    CHANNEL_POLICIES
        .iter()
        .find(|p| p.ota_name == ota_name)
        .unwrap_or(&FALLBACK_POLICY)
}

pub fn calculate_commission(ota_name: &str, base_amount: i64) -> i64 {
    (base_amount as f64 * policy_for(ota_name).commission_rate).round() as i64
}

pub fn calculate_gst(ota_name: &str, base_amount: i64) -> i64 {
    (base_amount as f64 * policy_for(ota_name).gst_rate).round() as i64
}

pub fn calculate_pending_amount(base_amount: i64, gst: i64, payment_received: i64) -> i64 {
    base_amount + gst - payment_received
}

pub fn calculate_payment_status(pending_amount: i64, base_amount: i64, gst: i64) -> &'static str {
    // Tolerance check first so an overpayment never falls through to the
    // equality branch.
    if pending_amount <= PAID_TOLERANCE {
        return STATUS_PAID;
    }
    if pending_amount == base_amount + gst {
        return STATUS_PENDING_PAYMENT;
    }
    STATUS_PART_PAYMENT
}

pub fn calculate_bank(ota_name: &str) -> &'static str {
    policy_for(ota_name).bank
}

/// The five derived financial fields of a booking, always computed and
/// persisted as a unit.
#[derive(Debug, Serialize, Clone)]
pub struct Financials {
    pub commission: i64,
    pub gst: i64,
    pub pending_amount: i64,
    pub payment_status: String,
    pub bank: String,
}

impl Financials {
    pub fn compute(ota_name: &str, base_amount: i64, payment_received: i64) -> Self {
        let commission = calculate_commission(ota_name, base_amount);
        let gst = calculate_gst(ota_name, base_amount);
        let pending_amount = calculate_pending_amount(base_amount, gst, payment_received);
        let payment_status = calculate_payment_status(pending_amount, base_amount, gst).to_string();
        let bank = calculate_bank(ota_name).to_string();

        Self {
            commission,
            gst,
            pending_amount,
            payment_status,
            bank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commissioned_channel() {
        let f = Financials::compute("Booking.com", 1000, 0);
        assert_eq!(f.commission, 150);
        assert_eq!(f.gst, 120);
        assert_eq!(f.pending_amount, 1120);
        assert_eq!(f.payment_status, STATUS_PENDING_PAYMENT);
        assert_eq!(f.bank, "Primary");
    }

    #[test]
    fn test_paid_within_tolerance() {
        let f = Financials::compute("Booking.com", 1000, 1120);
        assert_eq!(f.pending_amount, 0);
        assert_eq!(f.payment_status, STATUS_PAID);

        // Rounding slack of up to 5 units still counts as Paid.
        let f = Financials::compute("Booking.com", 1000, 1115);
        assert_eq!(f.pending_amount, 5);
        assert_eq!(f.payment_status, STATUS_PAID);
    }

    #[test]
    fn test_overpayment_is_paid() {
        let f = Financials::compute("Direct", 500, 800);
        assert!(f.pending_amount < 0);
        assert_eq!(f.payment_status, STATUS_PAID);
    }

    #[test]
    fn test_part_payment() {
        let f = Financials::compute("Hostelworld", 1000, 500);
        assert_eq!(f.pending_amount, 620);
        assert_eq!(f.payment_status, STATUS_PART_PAYMENT);
    }

    #[test]
    fn test_unknown_channel_falls_back() {
        let f = Financials::compute("Shiny New OTA", 1000, 0);
        assert_eq!(f.commission, 0);
        assert_eq!(f.gst, 0);
        assert_eq!(f.pending_amount, 1000);
        assert_eq!(f.bank, "Secondary");
    }

    #[test]
    fn test_direct_channel_bank() {
        assert_eq!(calculate_bank("Direct"), "Secondary");
        assert_eq!(calculate_bank("Extension"), "Secondary");
        assert_eq!(calculate_bank("Website"), "Primary");
        assert_eq!(calculate_bank("Agoda"), "Primary");
    }

    #[test]
    fn test_commission_rounding() {
        // 333 * 0.15 = 49.95 -> 50
        assert_eq!(calculate_commission("Booking.com", 333), 50);
        // 333 * 0.12 = 39.96 -> 40
        assert_eq!(calculate_gst("Hostelworld", 333), 40);
    }
}
