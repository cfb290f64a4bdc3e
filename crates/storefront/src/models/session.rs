//! Session persistence for the cart and checkout state.
//!
//! The original system kept the cart in client-local durable storage under
//! a fixed namespace key; here the same snapshot lives in the visitor's
//! session under a fixed key and is rehydrated on every request.
//!
//! Reads are best-effort with an explicit fallback: a failed or corrupt
//! read yields an empty cart plus a warning, never a 500 - the worst-case
//! user-visible failure is a cart that starts over. Writes propagate
//! errors, since silently dropping a mutation is worse than surfacing it.

use tower_sessions::Session;

use amara_core::{Cart, CheckoutState};

use crate::error::Result;

/// Session keys for persisted state.
pub mod session_keys {
    /// Key for the serialized cart snapshot (items + open flag).
    pub const CART: &str = "cart";

    /// Key for the checkout wizard state.
    pub const CHECKOUT: &str = "checkout";
}

/// Load the cart, falling back to an empty one on a failed read.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!("Failed to read cart from session, starting empty: {e}");
            Cart::new()
        }
    }
}

/// Persist the cart snapshot.
///
/// # Errors
///
/// Returns the session-layer error if the write fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Load the checkout state, if a checkout is underway.
pub async fn load_checkout(session: &Session) -> Option<CheckoutState> {
    match session.get::<CheckoutState>(session_keys::CHECKOUT).await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!("Failed to read checkout state from session: {e}");
            None
        }
    }
}

/// Persist the checkout state.
///
/// # Errors
///
/// Returns the session-layer error if the write fails.
pub async fn save_checkout(session: &Session, state: &CheckoutState) -> Result<()> {
    session.insert(session_keys::CHECKOUT, state).await?;
    Ok(())
}
