//! Cart quantity guard and checkout.

use bazaar_core::{Phone, PostalCode};
use serde::Deserialize;

use super::forms::{FieldErrors, require};
use crate::marketplace::{Cart, NewOrder, NewOrderItem, ShippingAddress};

/// Payment method recorded on orders placed from the dashboard.
pub const PAYMENT_METHOD: &str = "آنلاین";

/// Quantity to send for a requested target, or `None` when it is below 1.
///
/// Nothing is sent to the marketplace for a refused quantity. Targets past
/// `u32::MAX` are clamped and left to the marketplace's stock check.
#[must_use]
pub fn guard_quantity(requested: i64) -> Option<u32> {
    if requested < 1 {
        return None;
    }
    Some(u32::try_from(requested).unwrap_or(u32::MAX))
}

/// Checkout refused because the cart has no lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cart is empty")]
pub struct EmptyCart;

/// Build the order for a cart.
///
/// The order goes to the store of the first line; every line is sent as
/// `{productId, quantity}`.
///
/// # Errors
///
/// Returns [`EmptyCart`] when there is nothing to order.
pub fn checkout_order(cart: &Cart, address: ShippingAddress) -> Result<NewOrder, EmptyCart> {
    let first = cart.items.first().ok_or(EmptyCart)?;

    Ok(NewOrder {
        store_id: first
            .product_id
            .store_id
            .as_ref()
            .map(|store| store.id().clone()),
        items: cart
            .items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id.id.clone(),
                quantity: item.quantity,
            })
            .collect(),
        shipping_address: address,
        payment_method: PAYMENT_METHOD.to_string(),
    })
}

/// Shipping address form shown next to the checkout button.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShippingForm {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

impl ShippingForm {
    /// Validate and normalize the address.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<ShippingAddress, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "first_name", &self.first_name, "نام الزامی است");
        require(&mut errors, "last_name", &self.last_name, "نام خانوادگی الزامی است");
        require(&mut errors, "address", &self.address, "آدرس الزامی است");
        require(&mut errors, "city", &self.city, "شهر الزامی است");

        let postal_code = PostalCode::parse(&self.postal_code);
        if postal_code.is_err() {
            errors.add("postal_code", "کد پستی باید ۱۰ رقم باشد");
        }
        let phone = Phone::parse(&self.phone);
        if phone.is_err() {
            errors.add("phone", "شماره تماس معتبر نیست");
        }

        match (postal_code, phone) {
            (Ok(postal_code), Ok(phone)) if errors.is_empty() => Ok(ShippingAddress {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                address: self.address.trim().to_string(),
                city: self.city.trim().to_string(),
                postal_code: postal_code.to_string(),
                phone: phone.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

impl From<&ShippingAddress> for ShippingForm {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            address: address.address.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            phone: address.phone.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{CartItemId, ProductId, Rial, StoreId};

    use super::*;
    use crate::marketplace::{CartItem, CartProduct, StoreRef};

    fn line(product: &str, store: Option<&str>, quantity: u32) -> CartItem {
        CartItem {
            id: CartItemId::new(format!("line-{product}")),
            product_id: CartProduct {
                id: ProductId::new(product),
                title: product.to_string(),
                store_id: store.map(|s| StoreRef::Id(StoreId::new(s))),
                images: Vec::new(),
            },
            price_snapshot: Rial::from_whole(10_000),
            quantity,
        }
    }

    fn address() -> ShippingAddress {
        ShippingForm {
            first_name: "سارا".to_string(),
            last_name: "احمدی".to_string(),
            address: "خیابان ولیعصر".to_string(),
            city: "تهران".to_string(),
            postal_code: "۱۲۳۴۵۶۷۸۹۰".to_string(),
            phone: "09121234567".to_string(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_quantity_below_one_is_refused() {
        assert_eq!(guard_quantity(0), None);
        assert_eq!(guard_quantity(-3), None);
        assert_eq!(guard_quantity(1), Some(1));
        assert_eq!(guard_quantity(7), Some(7));
    }

    #[test]
    fn test_quantity_guard_clamps_huge_targets() {
        assert_eq!(guard_quantity(i64::MAX), Some(u32::MAX));
        assert_eq!(guard_quantity(i64::from(u32::MAX) + 1), Some(u32::MAX));
    }

    #[test]
    fn test_checkout_blocked_for_empty_cart() {
        assert_eq!(checkout_order(&Cart::default(), address()), Err(EmptyCart));
    }

    #[test]
    fn test_checkout_uses_first_line_store() {
        let cart = Cart {
            items: vec![line("p-1", Some("s-1"), 2), line("p-2", Some("s-2"), 1)],
            subtotal: Rial::from_whole(30_000),
            total: Rial::from_whole(30_000),
        };

        let order = checkout_order(&cart, address()).unwrap();
        assert_eq!(order.store_id, Some(StoreId::new("s-1")));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.payment_method, PAYMENT_METHOD);
    }

    #[test]
    fn test_shipping_form_normalizes_digits() {
        assert_eq!(address().postal_code, "1234567890");
    }

    #[test]
    fn test_shipping_form_reports_each_bad_field() {
        let errors = ShippingForm {
            postal_code: "123".to_string(),
            phone: "9121234567".to_string(),
            ..ShippingForm::default()
        }
        .validate()
        .unwrap_err();

        for field in ["first_name", "last_name", "address", "city", "postal_code", "phone"] {
            assert!(errors.has(field), "{field} should be reported");
        }
    }
}
