//! Client-held cart, persisted through the session store.
//!
//! The cart never round-trips through the API; it lives under the fixed
//! `cart` storage key exactly like the browser original kept it in local
//! storage.

use crate::client::StorefrontClient;
use storefront_types::config::storage_keys;
use storefront_types::{Cart, Product};

impl StorefrontClient {
    /// The persisted cart, or an empty one. An unreadable stored cart is
    /// treated as empty rather than failing the storefront.
    pub fn cart(&self) -> Cart {
        self.store
            .get(storage_keys::CART)
            .and_then(|serialized| match serde_json::from_str(&serialized) {
                Ok(cart) => Some(cart),
                Err(e) => {
                    tracing::warn!(error = %e, "stored cart unreadable, starting fresh");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save_cart(&self, cart: &Cart) {
        match serde_json::to_string(cart) {
            Ok(serialized) => self.store.put(storage_keys::CART, &serialized),
            Err(e) => tracing::warn!(error = %e, "failed to persist cart"),
        }
    }

    pub fn clear_cart(&self) {
        self.store.remove(storage_keys::CART);
    }

    /// Add a product and persist in one step.
    pub fn add_to_cart(&self, product: &Product, quantity: u32) -> Cart {
        let mut cart = self.cart();
        cart.add(product.id, &product.name, product.price_cents, quantity);
        self.save_cart(&cart);
        cart
    }
}
