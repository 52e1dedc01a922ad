// Minimal Stripe DTOs and form builders
use serde::{Deserialize, Serialize};

use crate::connection::CardDetails;
use crate::stripe::errors::StripeApiError;

// PaymentMethod minimal shape (only the token is used)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

// PaymentIntent minimal shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_method: Option<String>,
}

pub type FormFields = Vec<(&'static str, String)>;

// POST /v1/payment_methods
pub fn payment_method_form(card: &CardDetails) -> FormFields {
    vec![
        ("type", "card".to_string()),
        ("card[number]", card.card_number.clone()),
        ("card[exp_month]", card.expiry_month.to_string()),
        ("card[exp_year]", card.expiry_year.to_string()),
        ("card[cvc]", card.cvv.clone()),
    ]
}

// POST /v1/payment_intents, confirmed immediately with manual capture
pub fn payment_intent_form(amount: i64, currency: &str, payment_method_id: &str) -> FormFields {
    vec![
        ("amount", amount.to_string()),
        ("currency", currency.to_ascii_lowercase()),
        ("capture_method", "manual".to_string()),
        ("confirm", "true".to_string()),
        ("payment_method_types[]", "card".to_string()),
        ("payment_method", payment_method_id.to_string()),
    ]
}

pub fn encode_form(fields: &FormFields) -> Result<String, StripeApiError> {
    serde_urlencoded::to_string(fields).map_err(|e| StripeApiError::Encode(e.to_string()))
}

// Helper enforcing authorization preconditions at the API boundary.
pub fn ensure_amount_and_currency(amount: i64, currency: &str) -> Result<(), StripeApiError> {
    if amount < 0 {
        return Err(StripeApiError::Precondition("amount must be non-negative minor units"));
    }
    if currency.trim().is_empty() {
        return Err(StripeApiError::Precondition("currency code is required"));
    }
    Ok(())
}

// Intent ids are interpolated into the request path.
pub fn ensure_transaction_id(id: &str) -> Result<(), StripeApiError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StripeApiError::Precondition("invalid processor transaction id"));
    }
    Ok(())
}
