use std::time::Duration;

use ureq::Agent;

use crate::error::{MilkboothError, Result};

/// Outbound message delivery seam. The booth only ever needs "send this
/// text to this number"; how it gets there is the gateway's business.
pub trait Notifier {
    fn send(&self, recipient: &str, message: &str) -> Result<()>;
}

/// POSTs messages as JSON to a configured HTTP gateway.
pub struct GatewayNotifier {
    agent: Agent,
    gateway_url: String,
}

impl GatewayNotifier {
    pub fn new(gateway_url: &str) -> GatewayNotifier {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(3)))
            .build()
            .into();

        GatewayNotifier {
            agent,
            gateway_url: gateway_url.to_string(),
        }
    }
}

impl Notifier for GatewayNotifier {
    fn send(&self, recipient: &str, message: &str) -> Result<()> {
        let payload = serde_json::json!({
            "to": recipient,
            "message": message,
        })
        .to_string();

        self.agent
            .post(&self.gateway_url)
            .header("content-type", "application/json")
            .send(payload.as_bytes())
            .map_err(|e| MilkboothError::Notify(e.to_string()))?;

        Ok(())
    }
}

/// Normalize an entered mobile number to E.164. Ten bare digits get the
/// Indian country code; already-prefixed numbers keep theirs. Anything
/// else is unusable for the gateway.
pub fn format_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => Some(format!("+91{digits}")),
        12 if digits.starts_with("91") => Some(format!("+{digits}")),
        11..=15 if raw.trim_start().starts_with('+') => Some(format!("+{digits}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ten_digits_get_country_code() {
        assert_eq!(format_phone("9876543210").as_deref(), Some("+919876543210"));
        assert_eq!(format_phone("98765 43210").as_deref(), Some("+919876543210"));
    }

    #[test]
    fn prefixed_numbers_keep_their_code() {
        assert_eq!(format_phone("919876543210").as_deref(), Some("+919876543210"));
        assert_eq!(format_phone("+919876543210").as_deref(), Some("+919876543210"));
    }

    #[test]
    fn junk_is_rejected() {
        assert_eq!(format_phone("12345"), None);
        assert_eq!(format_phone("not a number"), None);
    }
}
