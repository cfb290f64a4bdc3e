//! The checkout wizard: shipping -> payment -> review.
//!
//! Transitions are strictly forward except the explicit back-transition
//! from payment to shipping; no transition skips a state. The state is
//! session-scoped in the storefront and never persisted beyond it.
//!
//! Derived totals are recomputed from the live cart on every request -
//! nothing here caches a subtotal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Orders above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Flat shipping rate below the free-shipping threshold.
pub const FLAT_SHIPPING_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Flat tax rate applied to the subtotal (0.10).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Errors from checkout state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout requires a non-empty cart.
    #[error("cart is empty")]
    CartEmpty,

    /// The operation is not valid in the current step.
    #[error("invalid in step {0:?}")]
    WrongStep(CheckoutStep),

    /// A payment confirmation is already in flight for this session.
    #[error("a payment is already in progress")]
    PaymentInFlight,

    /// Required form fields are missing.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// The three wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
}

/// Shipping form fields. Plain strings, presence-validated server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub apartment: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

impl ShippingInfo {
    /// Required-field presence check.
    ///
    /// The original relied on browser-level validation only; the service
    /// re-validates so a raw POST cannot advance with blank fields.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` naming every blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| (*name).to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

/// Billing form fields; defaults to reusing the shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfo {
    pub same_as_shipping: bool,
    #[serde(default)]
    pub address: Option<ShippingInfo>,
}

impl Default for BillingInfo {
    fn default() -> Self {
        Self {
            same_as_shipping: true,
            address: None,
        }
    }
}

impl BillingInfo {
    /// Presence check for a separate billing address, if one is used.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` if a separate billing address
    /// was requested but not provided or left blank.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.same_as_shipping {
            return Ok(());
        }
        match &self.address {
            Some(address) => address.validate(),
            None => Err(CheckoutError::MissingFields(vec![
                "billing_address".to_string(),
            ])),
        }
    }
}

/// Totals derived from the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CheckoutTotals {
    /// Compute totals: free shipping above the threshold, flat rate below;
    /// tax is a flat 10% of the subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING_RATE
        };
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Session-scoped checkout wizard state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutState {
    step: CheckoutStep,
    shipping: Option<ShippingInfo>,
    billing: BillingInfo,
    /// Re-entrant submission guard: at most one payment confirmation in
    /// flight per session. Duplicates are dropped, not queued.
    payment_in_flight: bool,
    /// Set on successful payment; suppresses the empty-cart redirect while
    /// the cleared cart and the confirmation view race.
    order_placed: bool,
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutState {
    /// Start a new checkout at the shipping step.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: CheckoutStep::Shipping,
            shipping: None,
            billing: BillingInfo {
                same_as_shipping: true,
                address: None,
            },
            payment_in_flight: false,
            order_placed: false,
        }
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn shipping(&self) -> Option<&ShippingInfo> {
        self.shipping.as_ref()
    }

    #[must_use]
    pub const fn billing(&self) -> &BillingInfo {
        &self.billing
    }

    #[must_use]
    pub const fn payment_in_flight(&self) -> bool {
        self.payment_in_flight
    }

    #[must_use]
    pub const fn order_placed(&self) -> bool {
        self.order_placed
    }

    /// Whether an empty cart should bounce the visitor back to the shop.
    ///
    /// Only fires in the shipping step, and never while a payment is in
    /// flight or just after one succeeded - clearing the cart on success
    /// must not race the redirect.
    #[must_use]
    pub const fn should_redirect_to_shop(&self, cart_is_empty: bool) -> bool {
        cart_is_empty
            && matches!(self.step, CheckoutStep::Shipping)
            && !self.payment_in_flight
            && !self.order_placed
    }

    /// Submit the shipping form and advance to the payment step.
    ///
    /// # Errors
    ///
    /// Fails if not in the shipping step or if required fields are blank.
    pub fn submit_shipping(
        &mut self,
        shipping: ShippingInfo,
        billing: BillingInfo,
    ) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Shipping {
            return Err(CheckoutError::WrongStep(self.step));
        }
        shipping.validate()?;
        billing.validate()?;
        self.shipping = Some(shipping);
        self.billing = billing;
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// The one allowed back-transition: payment -> shipping.
    ///
    /// # Errors
    ///
    /// Fails from any other step, or while a payment is in flight.
    pub fn back_to_shipping(&mut self) -> Result<(), CheckoutError> {
        if self.payment_in_flight {
            return Err(CheckoutError::PaymentInFlight);
        }
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep(self.step));
        }
        self.step = CheckoutStep::Shipping;
        Ok(())
    }

    /// Advance from payment to the review summary.
    ///
    /// # Errors
    ///
    /// Fails from any other step, or while a payment is in flight.
    pub fn proceed_to_review(&mut self) -> Result<(), CheckoutError> {
        if self.payment_in_flight {
            return Err(CheckoutError::PaymentInFlight);
        }
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep(self.step));
        }
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Acquire the in-flight guard before creating a payment intent.
    ///
    /// Allowed in the payment and review steps. A second submission while
    /// one is pending returns `PaymentInFlight` and must be dropped by the
    /// caller without a second provider call.
    ///
    /// # Errors
    ///
    /// Fails in the shipping step, with incomplete shipping info, or when
    /// a payment is already in flight.
    pub fn begin_payment(&mut self) -> Result<(), CheckoutError> {
        if !matches!(self.step, CheckoutStep::Payment | CheckoutStep::Review) {
            return Err(CheckoutError::WrongStep(self.step));
        }
        if self.shipping.is_none() {
            return Err(CheckoutError::MissingFields(vec!["shipping".to_string()]));
        }
        if self.payment_in_flight {
            return Err(CheckoutError::PaymentInFlight);
        }
        self.payment_in_flight = true;
        Ok(())
    }

    /// Release the guard after a failed or timed-out confirmation.
    /// The cart is intact; the user may resubmit.
    pub fn payment_failed(&mut self) {
        self.payment_in_flight = false;
    }

    /// Record a successful payment: release the guard and suppress the
    /// empty-cart redirect for the transition to the confirmation view.
    pub fn payment_succeeded(&mut self) {
        self.payment_in_flight = false;
        self.order_placed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: "Amara".to_string(),
            last_name: "Okafor".to_string(),
            email: "amara@example.com".to_string(),
            address: "12 Crown Row".to_string(),
            apartment: String::new(),
            city: "Lagos".to_string(),
            state: "LA".to_string(),
            zip_code: "100001".to_string(),
            country: "NG".to_string(),
            phone: String::new(),
        }
    }

    #[test]
    fn test_totals_below_threshold() {
        let totals = CheckoutTotals::from_subtotal(Decimal::from(180));
        assert_eq!(totals.shipping, Decimal::from(15));
        assert_eq!(totals.tax, Decimal::from(18));
        assert_eq!(totals.total, Decimal::from(213));
    }

    #[test]
    fn test_totals_above_threshold() {
        let totals = CheckoutTotals::from_subtotal(Decimal::from(250));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::from(25));
        assert_eq!(totals.total, Decimal::from(275));
    }

    #[test]
    fn test_totals_at_exactly_threshold_still_pay_shipping() {
        // Free shipping requires subtotal > 200, not >=.
        let totals = CheckoutTotals::from_subtotal(Decimal::from(200));
        assert_eq!(totals.shipping, Decimal::from(15));
        assert_eq!(totals.total, Decimal::from(235));
    }

    #[test]
    fn test_empty_cart_totals() {
        let totals = CheckoutTotals::from_subtotal(Decimal::ZERO);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.shipping, Decimal::from(15));
        assert_eq!(totals.tax, Decimal::ZERO);
    }

    #[test]
    fn test_shipping_validation_names_missing_fields() {
        let mut info = shipping();
        info.email = String::new();
        info.city = "   ".to_string();
        let err = info.validate().expect_err("should fail");
        assert_eq!(
            err,
            CheckoutError::MissingFields(vec!["email".to_string(), "city".to_string()])
        );
    }

    #[test]
    fn test_forward_path_shipping_payment_review() {
        let mut state = CheckoutState::new();
        assert_eq!(state.step(), CheckoutStep::Shipping);
        state
            .submit_shipping(shipping(), BillingInfo::default())
            .expect("valid shipping");
        assert_eq!(state.step(), CheckoutStep::Payment);
        state.proceed_to_review().expect("forward to review");
        assert_eq!(state.step(), CheckoutStep::Review);
    }

    #[test]
    fn test_no_step_skipping() {
        let mut state = CheckoutState::new();
        // Cannot reach review from shipping.
        assert_eq!(
            state.proceed_to_review(),
            Err(CheckoutError::WrongStep(CheckoutStep::Shipping))
        );
        // Cannot begin payment from shipping.
        assert_eq!(
            state.begin_payment(),
            Err(CheckoutError::WrongStep(CheckoutStep::Shipping))
        );
    }

    #[test]
    fn test_back_transition_only_from_payment() {
        let mut state = CheckoutState::new();
        assert_eq!(
            state.back_to_shipping(),
            Err(CheckoutError::WrongStep(CheckoutStep::Shipping))
        );
        state
            .submit_shipping(shipping(), BillingInfo::default())
            .expect("valid shipping");
        state.back_to_shipping().expect("payment -> shipping");
        assert_eq!(state.step(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_submit_shipping_rejected_outside_shipping_step() {
        let mut state = CheckoutState::new();
        state
            .submit_shipping(shipping(), BillingInfo::default())
            .expect("valid shipping");
        assert_eq!(
            state.submit_shipping(shipping(), BillingInfo::default()),
            Err(CheckoutError::WrongStep(CheckoutStep::Payment))
        );
    }

    #[test]
    fn test_duplicate_payment_submission_is_dropped() {
        let mut state = CheckoutState::new();
        state
            .submit_shipping(shipping(), BillingInfo::default())
            .expect("valid shipping");
        state.begin_payment().expect("first submission wins");
        // The second rapid submission must not reach the provider.
        assert_eq!(state.begin_payment(), Err(CheckoutError::PaymentInFlight));
        state.payment_failed();
        state.begin_payment().expect("retry after failure");
    }

    #[test]
    fn test_success_suppresses_empty_cart_redirect() {
        let mut state = CheckoutState::new();
        state
            .submit_shipping(shipping(), BillingInfo::default())
            .expect("valid shipping");
        state.begin_payment().expect("guard acquired");
        // In flight: no redirect even if the cart empties.
        assert!(!state.should_redirect_to_shop(true));
        state.payment_succeeded();
        // Cart cleared on success: still no redirect.
        assert!(!state.should_redirect_to_shop(true));
        assert!(state.order_placed());
    }

    #[test]
    fn test_empty_cart_redirects_only_in_shipping_step() {
        let mut state = CheckoutState::new();
        assert!(state.should_redirect_to_shop(true));
        assert!(!state.should_redirect_to_shop(false));
        state
            .submit_shipping(shipping(), BillingInfo::default())
            .expect("valid shipping");
        assert!(!state.should_redirect_to_shop(true));
    }

    #[test]
    fn test_separate_billing_address_is_validated() {
        let billing = BillingInfo {
            same_as_shipping: false,
            address: None,
        };
        assert_eq!(
            billing.validate(),
            Err(CheckoutError::MissingFields(vec![
                "billing_address".to_string()
            ]))
        );
        let billing = BillingInfo {
            same_as_shipping: false,
            address: Some(shipping()),
        };
        assert_eq!(billing.validate(), Ok(()));
    }
}
