//! The two scannable values a gate pass hands out.
//!
//! An [`ApprovalToken`] is what the student shows an admin while the pass is
//! pending; a [`GatePayload`] is what gate security scans once it is approved.
//! They are separate types on purpose so one can never be fed into the other's
//! scan path.

use crate::{
    entities::GatePassModel,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Admin scan-to-approve code. The QR content is the bare pass id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalToken(String);

impl ApprovalToken {
    /// Token for an existing pass.
    #[must_use]
    pub fn for_pass(pass: &GatePassModel) -> Self {
        Self(pass.approval_qr_code_data.clone())
    }

    /// Parses scanned text. Surrounding whitespace from scanners is dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(Error::MalformedPayload {
                reason: "Approval code is empty.".to_string(),
            });
        }
        Ok(Self(token.to_string()))
    }

    /// Pass id carried by the token; also the exact QR content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Gate security payload, issued on approval.
///
/// Field order and names are the wire format read by existing gate scanners:
/// `{"passId":..,"studentId":..,"name":..,"rollNumber":..,"reason":..,"fromDate":..,"toDate":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatePayload {
    /// Pass this payload was issued for
    pub pass_id: String,
    /// Student the pass belongs to
    pub student_id: String,
    /// Student name
    #[serde(default)]
    pub name: String,
    /// Student roll number
    #[serde(default)]
    pub roll_number: String,
    /// Reason for leaving
    #[serde(default)]
    pub reason: String,
    /// Departure
    #[serde(default)]
    pub from_date: String,
    /// Return
    #[serde(default)]
    pub to_date: String,
}

impl GatePayload {
    /// Builds the payload from a pass's submission snapshot.
    #[must_use]
    pub fn for_pass(pass: &GatePassModel) -> Self {
        Self {
            pass_id: pass.id.clone(),
            student_id: pass.student_id.clone(),
            name: pass.student_name.clone(),
            roll_number: pass.roll_number.clone(),
            reason: pass.reason.clone(),
            from_date: pass.from_date.clone(),
            to_date: pass.to_date.clone(),
        }
    }

    /// Compact JSON text, the literal QR content.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Decodes scanned text. `passId` and `studentId` must be present and non-empty.
    pub fn decode(raw: &str) -> Result<Self> {
        let payload: Self = serde_json::from_str(raw.trim()).map_err(|e| {
            tracing::debug!("Gate payload did not decode: {}", e);
            Error::MalformedPayload {
                reason: "Not in the expected JSON format.".to_string(),
            }
        })?;

        if payload.pass_id.trim().is_empty() || payload.student_id.trim().is_empty() {
            return Err(Error::MalformedPayload {
                reason: "Missing required pass details.".to_string(),
            });
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::GatePassStatus;

    fn sample_pass() -> GatePassModel {
        let now = chrono::Utc::now();
        GatePassModel {
            id: "gp-1".to_string(),
            student_id: "s1".to_string(),
            student_name: "Alice Smith".to_string(),
            roll_number: "S2021001".to_string(),
            reason: "Festival".to_string(),
            from_date: "2024-01-01T10:00".to_string(),
            to_date: "2024-01-03T18:00".to_string(),
            status: GatePassStatus::Approved,
            approval_qr_code_data: "gp-1".to_string(),
            qr_code_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_encode_is_bit_exact() {
        let encoded = GatePayload::for_pass(&sample_pass()).encode().unwrap();
        assert_eq!(
            encoded,
            r#"{"passId":"gp-1","studentId":"s1","name":"Alice Smith","rollNumber":"S2021001","reason":"Festival","fromDate":"2024-01-01T10:00","toDate":"2024-01-03T18:00"}"#
        );
    }

    #[test]
    fn test_decode_minimal_payload() {
        let payload = GatePayload::decode(r#"{"passId":"gp-1","studentId":"s1"}"#).unwrap();
        assert_eq!(payload.pass_id, "gp-1");
        assert_eq!(payload.student_id, "s1");
        assert!(payload.name.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = GatePayload::decode("gp-1").unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { .. }));
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let err = GatePayload::decode(r#"{"passId":"gp-1"}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { .. }));

        let err = GatePayload::decode(r#"{"passId":"","studentId":"s1"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid QR code: Missing required pass details."
        );
    }

    #[test]
    fn test_approval_token_is_pass_id() {
        let pass = sample_pass();
        let token = ApprovalToken::for_pass(&pass);
        assert_eq!(token.as_str(), pass.id);
        assert_eq!(ApprovalToken::parse("  gp-1\n").unwrap(), token);
        assert!(ApprovalToken::parse("   ").is_err());
    }
}
