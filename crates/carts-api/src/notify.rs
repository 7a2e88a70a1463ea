//! # Notifications
//!
//! Confirmation emails are sent on a detached task. The HTTP response never
//! waits on the mail relay, and a failed send is only logged.

use carts_core::{BoxedMailer, CartsResult, OutgoingEmail, PaymentConfirmation, ShipmentConfirmation};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Which confirmation is being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    PaymentConfirmation,
    ShipmentConfirmation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PaymentConfirmation => "payment_confirmation",
            NotificationKind::ShipmentConfirmation => "shipment_confirmation",
        }
    }
}

/// Fire-and-forget email dispatcher
#[derive(Clone)]
pub struct Notifier {
    mailer: BoxedMailer,
}

impl Notifier {
    pub fn new(mailer: BoxedMailer) -> Self {
        Self { mailer }
    }

    pub fn provider_name(&self) -> &'static str {
        self.mailer.provider_name()
    }

    /// Spawn delivery of `email` and return immediately.
    ///
    /// The handle is only useful to tests; handlers drop it.
    pub fn dispatch(&self, kind: NotificationKind, email: OutgoingEmail) -> JoinHandle<()> {
        let mailer = self.mailer.clone();
        let span = info_span!(
            "notification",
            id = %Uuid::new_v4(),
            kind = kind.as_str(),
            to = %email.to,
        );

        tokio::spawn(
            async move {
                match mailer.send(&email).await {
                    Ok(()) => info!(provider = mailer.provider_name(), "Notification sent"),
                    Err(e) => error!(provider = mailer.provider_name(), "Notification failed: {}", e),
                }
            }
            .instrument(span),
        )
    }

    /// Confirm a recorded payment to the payload's `email`
    pub fn payment_confirmation(&self, payload: &Value) -> Option<JoinHandle<()>> {
        let Some(confirmation) = PaymentConfirmation::from_payload(payload) else {
            warn!("Payment payload has no email, skipping confirmation");
            return None;
        };
        self.dispatch_rendered(NotificationKind::PaymentConfirmation, confirmation.render())
    }

    /// Tell the payload's `email` that the order shipped
    pub fn shipment_confirmation(&self, payload: &Value) -> Option<JoinHandle<()>> {
        let Some(confirmation) = ShipmentConfirmation::from_payload(payload) else {
            warn!("Shipment payload has no email, skipping confirmation");
            return None;
        };
        self.dispatch_rendered(NotificationKind::ShipmentConfirmation, confirmation.render())
    }

    fn dispatch_rendered(
        &self,
        kind: NotificationKind,
        rendered: CartsResult<OutgoingEmail>,
    ) -> Option<JoinHandle<()>> {
        match rendered {
            Ok(email) => Some(self.dispatch(kind, email)),
            Err(e) => {
                error!(kind = kind.as_str(), "Failed to render notification: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use carts_core::{CartsError, Mailer};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> CartsResult<()> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }

        fn provider_name(&self) -> &'static str {
            "recording"
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: &OutgoingEmail) -> CartsResult<()> {
            Err(CartsError::upstream("mailgun", "relay down"))
        }

        fn provider_name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_payment_confirmation_is_sent() {
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = Notifier::new(mailer.clone());

        let handle = notifier
            .payment_confirmation(&json!({"email": "a@b.com", "productName": "Widget"}))
            .unwrap();
        handle.await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert!(sent[0].subject.contains("Widget"));
    }

    #[tokio::test]
    async fn test_missing_recipient_skips_send() {
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = Notifier::new(mailer.clone());

        assert!(notifier.shipment_confirmation(&json!({"address": "X"})).is_none());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_does_not_panic() {
        let notifier = Notifier::new(Arc::new(FailingMailer));
        let handle = notifier
            .shipment_confirmation(&json!({"email": "a@b.com"}))
            .unwrap();
        assert!(handle.await.is_ok());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NotificationKind::PaymentConfirmation.as_str(), "payment_confirmation");
        assert_eq!(NotificationKind::ShipmentConfirmation.as_str(), "shipment_confirmation");
    }
}
