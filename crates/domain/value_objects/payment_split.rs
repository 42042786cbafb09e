use serde::Serialize;
use thiserror::Error;

/// Gateway commission used when none is configured: 2% expressed in basis points.
pub const DEFAULT_COMMISSION_BPS: i64 = 200;

const PERCENT: i64 = 100;
const BASIS_POINTS: i64 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("platform share must be between 0 and 100, got {0}")]
    InvalidShare(i32),
    #[error("gateway commission must be between 0 and 10000 basis points, got {0}")]
    InvalidCommission(i64),
    #[error("amount {amount} is too small to cover the platform share and gateway commission")]
    CreatorAmountNegative { amount: i64 },
    #[error("amount {0} is too large")]
    Overflow(i64),
}

/// How one incoming payment is divided between the creator and the platform.
///
/// `sapi_amount` is the platform share, `creator_amount` is what the creator
/// receives after the gateway commission is taken out of the creator leg.
/// Integer arithmetic truncates, so
/// `sapi_amount + creator_amount <= amount - commission` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentSplit {
    pub amount: i64,
    pub sapi_amount: i64,
    pub creator_amount: i64,
    pub commission: i64,
}

impl PaymentSplit {
    pub fn compute(amount: i64, sapi_share: i32, commission_bps: i64) -> Result<Self, SplitError> {
        if amount <= 0 {
            return Err(SplitError::NonPositiveAmount);
        }
        if !(0..=100).contains(&sapi_share) {
            return Err(SplitError::InvalidShare(sapi_share));
        }
        if !(0..=BASIS_POINTS).contains(&commission_bps) {
            return Err(SplitError::InvalidCommission(commission_bps));
        }

        let share = i64::from(sapi_share);
        let sapi_amount = amount
            .checked_mul(share)
            .map(|value| value / PERCENT)
            .ok_or(SplitError::Overflow(amount))?;
        let creator_gross = amount
            .checked_mul(PERCENT - share)
            .map(|value| value / PERCENT)
            .ok_or(SplitError::Overflow(amount))?;
        let commission = amount
            .checked_mul(commission_bps)
            .map(|value| value / BASIS_POINTS)
            .ok_or(SplitError::Overflow(amount))?;

        let creator_amount = creator_gross - commission;
        if creator_amount < 0 {
            return Err(SplitError::CreatorAmountNegative { amount });
        }

        Ok(Self {
            amount,
            sapi_amount,
            creator_amount,
            commission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donation_with_ten_percent_share() {
        let split = PaymentSplit::compute(10_000, 10, DEFAULT_COMMISSION_BPS).unwrap();

        assert_eq!(split.sapi_amount, 1_000);
        assert_eq!(split.creator_amount, 8_800);
        assert_eq!(split.commission, 200);
    }

    #[test]
    fn zero_share_leaves_everything_but_commission_to_creator() {
        let split = PaymentSplit::compute(50_000, 0, DEFAULT_COMMISSION_BPS).unwrap();

        assert_eq!(split.sapi_amount, 0);
        assert_eq!(split.creator_amount, 49_000);
    }

    #[test]
    fn custom_commission_is_applied() {
        let split = PaymentSplit::compute(10_000, 10, 150).unwrap();

        assert_eq!(split.commission, 150);
        assert_eq!(split.creator_amount, 8_850);
    }

    #[test]
    fn amounts_never_exceed_amount_minus_commission() {
        for amount in [1_i64, 7, 99, 101, 999, 12_345, 1_000_001] {
            for share in [0, 1, 10, 33, 50, 97, 98] {
                let split = PaymentSplit::compute(amount, share, DEFAULT_COMMISSION_BPS).unwrap();
                assert!(split.sapi_amount >= 0);
                assert!(split.creator_amount >= 0);
                assert!(
                    split.sapi_amount + split.creator_amount <= amount - split.commission,
                    "amount={amount} share={share} split={split:?}"
                );
            }
        }
    }

    #[test]
    fn rejects_split_that_would_go_negative() {
        let result = PaymentSplit::compute(10_000, 100, DEFAULT_COMMISSION_BPS);

        assert_eq!(
            result,
            Err(SplitError::CreatorAmountNegative { amount: 10_000 })
        );
    }

    #[test]
    fn rejects_non_positive_amount_and_bad_share() {
        assert_eq!(
            PaymentSplit::compute(0, 10, DEFAULT_COMMISSION_BPS),
            Err(SplitError::NonPositiveAmount)
        );
        assert_eq!(
            PaymentSplit::compute(100, 101, DEFAULT_COMMISSION_BPS),
            Err(SplitError::InvalidShare(101))
        );
        assert_eq!(
            PaymentSplit::compute(100, 10, 10_001),
            Err(SplitError::InvalidCommission(10_001))
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(
            PaymentSplit::compute(i64::MAX, 10, DEFAULT_COMMISSION_BPS),
            Err(SplitError::Overflow(i64::MAX))
        );
    }
}
