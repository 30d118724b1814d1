//! The three-step checkout flow.
//!
//! ```text
//!   Cart ──(cart not empty)──▶ Details ──(all fields present)──▶ Summary
//!    ▲                           │  ▲                               │
//!    └────────── back ───────────┘  └──────────── back ─────────────┘
//! ```
//!
//! The flow never skips forward: `Summary` is reachable only through a
//! successful `submit_details`, and `Details` only from a non-empty cart.
//! A rejected transition never changes the step.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Cart, CustomerDetails, CustomerDetailsForm, FieldErrors};

/// Named checkout steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutStep {
    #[default]
    Cart,
    Details,
    Summary,
}

impl CheckoutStep {
    /// Step labels in order, for the progress indicator.
    pub const ALL: [Self; 3] = [Self::Cart, Self::Details, Self::Summary];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cart => "My Cart",
            Self::Details => "Customer Details",
            Self::Summary => "Order Summary",
        }
    }

    /// Zero-based position in the flow.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Cart => 0,
            Self::Details => 1,
            Self::Summary => 2,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The cart has no lines, so there is nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Required customer details are missing.
    #[error("{} required field(s) missing", .0.len())]
    InvalidDetails(FieldErrors),

    /// The transition does not start from the current step.
    #[error("expected step {expected}, flow is at {actual}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },
}

/// State of one customer's checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    /// Last submitted form input, kept for re-rendering.
    draft: CustomerDetailsForm,
    /// Present once the details step has been passed.
    details: Option<CustomerDetails>,
}

impl CheckoutFlow {
    /// A fresh flow at the cart step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn draft(&self) -> &CustomerDetailsForm {
        &self.draft
    }

    #[must_use]
    pub const fn details(&self) -> Option<&CustomerDetails> {
        self.details.as_ref()
    }

    fn expect(&self, expected: CheckoutStep) -> Result<(), TransitionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(TransitionError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// `Cart → Details`, guarded on a non-empty cart.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` if the cart has no lines, or `WrongStep` if the
    /// flow is not at the cart step.
    pub fn proceed_to_details(&mut self, cart: &Cart) -> Result<(), TransitionError> {
        self.expect(CheckoutStep::Cart)?;
        if cart.is_empty() {
            return Err(TransitionError::EmptyCart);
        }
        self.step = CheckoutStep::Details;
        Ok(())
    }

    /// `Details → Summary`, guarded on every required field being present.
    ///
    /// The submitted input is kept as the draft either way.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDetails` with one entry per missing field, or
    /// `WrongStep` if the flow is not at the details step.
    pub fn submit_details(&mut self, form: CustomerDetailsForm) -> Result<(), TransitionError> {
        self.expect(CheckoutStep::Details)?;
        let validated = form.validate();
        self.draft = form;
        match validated {
            Ok(details) => {
                self.details = Some(details);
                self.step = CheckoutStep::Summary;
                Ok(())
            }
            Err(errors) => {
                self.details = None;
                Err(TransitionError::InvalidDetails(errors))
            }
        }
    }

    /// Step back one step. No-op at the cart step.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Cart | CheckoutStep::Details => CheckoutStep::Cart,
            CheckoutStep::Summary => CheckoutStep::Details,
        };
    }

    /// Align the flow with a freshly loaded cart.
    ///
    /// An empty cart cannot be past the cart step. Entered details survive.
    /// Returns `true` if the step changed.
    pub fn reconcile(&mut self, cart: &Cart) -> bool {
        if cart.is_empty() && self.step != CheckoutStep::Cart {
            self.step = CheckoutStep::Cart;
            return true;
        }
        false
    }

    /// Details to send with the order. Only available on the summary step.
    ///
    /// # Errors
    ///
    /// Returns `WrongStep` if the flow is not at the summary step.
    pub fn details_for_order(&self) -> Result<&CustomerDetails, TransitionError> {
        self.expect(CheckoutStep::Summary)?;
        self.details.as_ref().ok_or(TransitionError::WrongStep {
            expected: CheckoutStep::Details,
            actual: self.step,
        })
    }

    /// Start over after an order has been placed.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::catalog::fixtures::line;
    use crate::types::customer::fixtures::complete_form;

    fn cart() -> Cart {
        Cart::new(vec![line(1, 10, 100, 1)])
    }

    fn at_summary() -> CheckoutFlow {
        let mut flow = CheckoutFlow::new();
        flow.proceed_to_details(&cart()).unwrap();
        flow.submit_details(complete_form()).unwrap();
        flow
    }

    #[test]
    fn test_new_flow_starts_at_cart() {
        let flow = CheckoutFlow::new();
        assert_eq!(flow.step(), CheckoutStep::Cart);
        assert!(flow.details().is_none());
    }

    #[test]
    fn test_empty_cart_blocks_details() {
        let mut flow = CheckoutFlow::new();
        let err = flow.proceed_to_details(&Cart::empty()).unwrap_err();
        assert_eq!(err, TransitionError::EmptyCart);
        assert_eq!(flow.step(), CheckoutStep::Cart);
    }

    #[test]
    fn test_non_empty_cart_advances() {
        let mut flow = CheckoutFlow::new();
        flow.proceed_to_details(&cart()).unwrap();
        assert_eq!(flow.step(), CheckoutStep::Details);
    }

    #[test]
    fn test_empty_details_block_summary_with_all_errors() {
        let mut flow = CheckoutFlow::new();
        flow.proceed_to_details(&cart()).unwrap();

        let err = flow
            .submit_details(CustomerDetailsForm::default())
            .unwrap_err();
        let TransitionError::InvalidDetails(errors) = err else {
            panic!("expected InvalidDetails, got {err:?}");
        };
        assert_eq!(errors.len(), 8);
        assert_eq!(flow.step(), CheckoutStep::Details);
    }

    #[test]
    fn test_failed_submission_keeps_draft() {
        let mut flow = CheckoutFlow::new();
        flow.proceed_to_details(&cart()).unwrap();
        let mut form = complete_form();
        form.city = String::new();

        assert!(flow.submit_details(form.clone()).is_err());
        assert_eq!(flow.draft(), &form);
    }

    #[test]
    fn test_valid_details_reach_summary() {
        let flow = at_summary();
        assert_eq!(flow.step(), CheckoutStep::Summary);
        assert_eq!(flow.details_for_order().unwrap().name, "Asha Rao");
    }

    #[test]
    fn test_cannot_skip_to_summary_from_cart() {
        let mut flow = CheckoutFlow::new();
        let err = flow.submit_details(complete_form()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::WrongStep {
                expected: CheckoutStep::Details,
                actual: CheckoutStep::Cart,
            }
        );
        assert_eq!(flow.step(), CheckoutStep::Cart);
    }

    #[test]
    fn test_order_details_only_on_summary() {
        let mut flow = at_summary();
        flow.back();
        assert_eq!(flow.step(), CheckoutStep::Details);
        assert!(flow.details_for_order().is_err());
    }

    #[test]
    fn test_back_walks_to_cart_and_stops() {
        let mut flow = at_summary();
        flow.back();
        flow.back();
        assert_eq!(flow.step(), CheckoutStep::Cart);
        flow.back();
        assert_eq!(flow.step(), CheckoutStep::Cart);
    }

    #[test]
    fn test_reconcile_with_empty_cart_returns_to_cart_keeping_details() {
        let mut flow = at_summary();
        assert!(flow.reconcile(&Cart::empty()));
        assert_eq!(flow.step(), CheckoutStep::Cart);
        assert_eq!(flow.draft(), &complete_form());
        assert!(!flow.reconcile(&cart()));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut flow = at_summary();
        flow.reset();
        assert_eq!(flow, CheckoutFlow::new());
    }

    #[test]
    fn test_flow_survives_serialization() {
        let flow = at_summary();
        let json = serde_json::to_string(&flow).unwrap();
        let restored: CheckoutFlow = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, flow);
    }
}
