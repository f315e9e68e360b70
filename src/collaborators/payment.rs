//! Plan purchase.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::CancelToken;
use crate::catalog::{Plan, PlanId};

/// Proof that a plan was paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub plan: PlanId,
    pub amount_usd: u32,
    pub reference: String,
    /// Unix timestamp (seconds) when the payment was confirmed
    pub paid_at: u64,
}

/// What the payment processor reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    Confirmed(PaymentReceipt),
    Declined { reason: String },
    Cancelled,
}

/// Takes payment for a plan. Implementations block; the session runs them
/// on a worker thread.
pub trait PaymentProcessor: Send + Sync {
    fn process(&self, plan: &Plan, cancel: &CancelToken) -> PaymentOutcome;
}

/// Confirms every payment after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentProcessor {
    delay: Duration,
}

impl SimulatedPaymentProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedPaymentProcessor {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl PaymentProcessor for SimulatedPaymentProcessor {
    fn process(&self, plan: &Plan, cancel: &CancelToken) -> PaymentOutcome {
        tracing::info!(plan = plan.id, delay_ms = self.delay.as_millis() as u64, "Processing payment");
        if !cancel.sleep(self.delay) {
            tracing::info!(plan = plan.id, "Payment cancelled");
            return PaymentOutcome::Cancelled;
        }

        let Some(plan_id) = PlanId::new(plan.id) else {
            return PaymentOutcome::Declined {
                reason: "plan has no identifier".to_string(),
            };
        };

        let paid_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        PaymentOutcome::Confirmed(PaymentReceipt {
            plan: plan_id,
            amount_usd: plan.price_usd,
            reference: format!("SIM-{}-{}", plan.id.to_uppercase(), paid_at),
            paid_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_plan;

    #[test]
    fn test_confirms_with_receipt() {
        let processor = SimulatedPaymentProcessor::new(Duration::ZERO);
        let plan = find_plan("basic").unwrap();
        match processor.process(plan, &CancelToken::new()) {
            PaymentOutcome::Confirmed(receipt) => {
                assert_eq!(receipt.plan.as_str(), "basic");
                assert_eq!(receipt.amount_usd, 5);
                assert!(receipt.reference.starts_with("SIM-BASIC-"));
            }
            other => panic!("Expected confirmation, got {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_before_delay_elapses() {
        let processor = SimulatedPaymentProcessor::new(Duration::from_secs(30));
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = processor.process(find_plan("premium").unwrap(), &cancel);
        assert_eq!(outcome, PaymentOutcome::Cancelled);
    }
}
