use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A registered shop user. The password is whatever the credential policy stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// One line in the global cart. Identical items are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    #[serde(with = "json_price")]
    pub price: Decimal,
}

/// Catalogue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    #[serde(with = "json_price")]
    pub price: Decimal,
}

/// Body of `/register` and `/login`. Missing fields are taken as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `/cart/add`. Nothing is checked against the catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddToCartRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "json_price")]
    pub price: Decimal,
}

/// Every shop mutation answers 200 with this body; `success` carries the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopResponse {
    pub success: bool,
    pub message: String,
}

pub const USER_EXISTS_MESSAGE: &str = "User already exists!";
pub const REGISTERED_MESSAGE: &str = "Registration successful!";
pub const LOGIN_OK_MESSAGE: &str = "Login successful!";
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid credentials!";
pub const ADDED_TO_CART_MESSAGE: &str = "Added to cart!";
pub const CART_CLEARED_MESSAGE: &str = "Cart cleared!";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

impl ShopResponse {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Prices travel as plain JSON numbers, echoed the way clients send them:
/// whole amounts as integers, anything else as a float.
mod json_price {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{ser::Error, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        if price.fract().is_zero() {
            if let Some(whole) = price.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        match price.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(S::Error::custom(format!("price {} is not representable", price))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer)
    }
}

impl From<AddToCartRequest> for CartItem {
    fn from(request: AddToCartRequest) -> Self {
        Self {
            name: request.name,
            price: request.price,
        }
    }
}

impl Product {
    /// Fixed catalogue served by `/products`
    pub fn catalogue() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Watch".to_string(),
                price: dec!(50),
            },
            Product {
                id: 2,
                name: "Headphones".to_string(),
                price: dec!(80),
            },
            Product {
                id: 3,
                name: "Bag".to_string(),
                price: dec!(30),
            },
        ]
    }
}
