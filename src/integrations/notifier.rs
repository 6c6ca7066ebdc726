//! Member notifications (booking confirmations, cancellations, welcome
//! mail).
//!
//! Delivery is best-effort: failures are logged at `warn` and never
//! retried, and no ledger state depends on them.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A message to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A spot in a class was confirmed.
    BookingConfirmation {
        /// Recipient address.
        email: String,
        /// Recipient name.
        name: String,
        /// Class booked.
        class_name: String,
        /// Class start.
        start_time: DateTime<Utc>,
        /// Instructor teaching it.
        instructor: String,
    },
    /// A booking was cancelled.
    Cancellation {
        /// Recipient address.
        email: String,
        /// Recipient name.
        name: String,
        /// Class cancelled.
        class_name: String,
        /// Class start.
        start_time: DateTime<Utc>,
    },
    /// A membership was purchased.
    MembershipConfirmation {
        /// Recipient address.
        email: String,
        /// Recipient name.
        name: String,
        /// Plan purchased.
        plan_name: String,
        /// Price paid, in cents.
        amount_cents: u64,
    },
    /// A new account was created.
    Welcome {
        /// Recipient address.
        email: String,
        /// Recipient name.
        name: String,
    },
}

impl Notification {
    /// Recipient address.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::BookingConfirmation { email, .. }
            | Self::Cancellation { email, .. }
            | Self::MembershipConfirmation { email, .. }
            | Self::Welcome { email, .. } => email,
        }
    }

    /// Short kind label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BookingConfirmation { .. } => "booking_confirmation",
            Self::Cancellation { .. } => "cancellation",
            Self::MembershipConfirmation { .. } => "membership_confirmation",
            Self::Welcome { .. } => "welcome",
        }
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::BookingConfirmation { class_name, .. } => {
                format!("Booking confirmed: {class_name}")
            }
            Self::Cancellation { class_name, .. } => format!("Booking cancelled: {class_name}"),
            Self::MembershipConfirmation { plan_name, .. } => {
                format!("Welcome to your {plan_name}")
            }
            Self::Welcome { .. } => "Welcome to the studio".to_string(),
        }
    }
}

/// Identifier assigned to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Provider message id.
    pub id: String,
}

/// Errors raised by a [`Notifier`].
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The provider refused the message.
    #[error("delivery rejected: {0}")]
    Rejected(String),
    /// The provider could not be reached.
    #[error("notification provider unavailable: {0}")]
    Unavailable(String),
}

/// Sends [`Notification`]s to members.
pub trait Notifier: Send + Sync + Debug {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if the message could not be delivered.
    fn deliver(&self, notification: &Notification) -> Result<DeliveryReceipt, NotifyError>;
}

/// Notifier that writes each message to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, notification: &Notification) -> Result<DeliveryReceipt, NotifyError> {
        if !notification.recipient().contains('@') {
            return Err(NotifyError::Rejected(format!(
                "invalid recipient {:?}",
                notification.recipient()
            )));
        }
        let receipt = DeliveryReceipt {
            id: format!("email_{}", Uuid::new_v4().simple()),
        };
        tracing::info!(
            kind = notification.kind(),
            to = notification.recipient(),
            subject = %notification.subject(),
            receipt = %receipt.id,
            "notification sent"
        );
        Ok(receipt)
    }
}

/// Delivers `notification` on a background task. Failures are logged and
/// dropped.
pub fn dispatch(notifier: &Arc<dyn Notifier>, notification: Notification) {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        if let Err(e) = notifier.deliver(&notification) {
            tracing::warn!(kind = notification.kind(), error = %e, "notification failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn welcome(email: &str) -> Notification {
        Notification::Welcome {
            email: email.to_string(),
            name: "Jordan".to_string(),
        }
    }

    #[test]
    fn log_notifier_issues_receipt() {
        let receipt = LogNotifier.deliver(&welcome("jordan@example.com"));
        assert!(matches!(receipt, Ok(r) if r.id.starts_with("email_")));
    }

    #[test]
    fn log_notifier_rejects_bad_recipient() {
        assert!(matches!(
            LogNotifier.deliver(&welcome("nobody")),
            Err(NotifyError::Rejected(_))
        ));
    }

    #[test]
    fn subject_names_the_class() {
        let n = Notification::Cancellation {
            email: "a@b.co".to_string(),
            name: "A".to_string(),
            class_name: "Power Yoga".to_string(),
            start_time: Utc::now(),
        };
        assert_eq!(n.subject(), "Booking cancelled: Power Yoga");
        assert_eq!(n.kind(), "cancellation");
    }

    #[tokio::test]
    async fn dispatch_swallows_failures() {
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        dispatch(&notifier, welcome("nobody"));
        tokio::task::yield_now().await;
    }
}
