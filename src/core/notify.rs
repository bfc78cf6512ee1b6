//! Fire-and-forget notifications to students.
//!
//! A [`Notifier`] never reports failure back to its caller and must return
//! without waiting on delivery, so an approval can never be held up or undone
//! by the notification channel.

use crate::entities::{GatePassModel, StudentModel};
use std::sync::Arc;
use tracing::info;

/// A message addressed to one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Who the message is for
    pub recipient: StudentModel,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

impl Notification {
    /// The message sent when a student's gate pass is approved.
    #[must_use]
    pub fn gate_pass_approved(recipient: StudentModel, pass: &GatePassModel) -> Self {
        let body = format!(
            "Dear {},\n\n\
             Your gate pass request for the reason \"{}\" from {} to {} has been approved.\n\n\
             You can now print the gate pass or show its QR code at the gate.\n\n\
             Regards,\n\
             Hostel Administration",
            recipient.name, pass.reason, pass.from_date, pass.to_date
        );
        Self {
            recipient,
            subject: "Your Gate Pass Request has been Approved".to_string(),
            body,
        }
    }
}

/// Outbound notification channel.
pub trait Notifier: Send + Sync {
    /// Hands the message to the channel. Must not block on delivery.
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        info!(
            to = %notification.recipient.email,
            subject = %notification.subject,
            "{}",
            notification.body
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::GatePassStatus;

    #[test]
    fn test_approval_message_mentions_trip() {
        let now = chrono::Utc::now();
        let student = StudentModel {
            id: "s1".to_string(),
            name: "Alice Smith".to_string(),
            roll_number: "S2021001".to_string(),
            email: "alice@example.com".to_string(),
            discord_user_id: None,
            created_at: now,
        };
        let pass = GatePassModel {
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
        };

        let note = Notification::gate_pass_approved(student, &pass);
        assert_eq!(note.subject, "Your Gate Pass Request has been Approved");
        assert!(note.body.starts_with("Dear Alice Smith,"));
        assert!(note.body.contains("\"Festival\" from 2024-01-01T10:00 to 2024-01-03T18:00"));

        // Logging never fails
        LogNotifier.notify(note);
    }
}
