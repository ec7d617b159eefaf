use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct PaymentVerification<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentVerified {
    pub status: String,
    #[serde(default)]
    pub credits: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckoutRequest {
    pub credits: u32,
}

/// Hosted checkout page to send the user to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreditPurchase {
    pub amount: f64,
}
