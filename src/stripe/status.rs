// Payment intent status vocabulary -> canonical transaction status.
// New gateway states are added here and nowhere else.

use crate::connection::TransactionStatus;

pub const REQUIRES_CAPTURE: &str = "requires_capture";
pub const SUCCEEDED: &str = "succeeded";
pub const CANCELED: &str = "canceled";

/// Returns `None` for tokens with no canonical meaning; callers report those as FAILED.
pub fn map_intent_status(token: &str) -> Option<TransactionStatus> {
    match token {
        REQUIRES_CAPTURE => Some(TransactionStatus::Authorized),
        SUCCEEDED => Some(TransactionStatus::Settled),
        CANCELED => Some(TransactionStatus::Cancelled),
        "card_declined" | "declined" => Some(TransactionStatus::Declined),
        _ => None,
    }
}
