use tracing::warn;

use lifeline_types::models::Point;

use crate::channels::{BroadcastChannel, PushbulletClient, SmsChannel, TwilioClient};
use crate::message::{compose_alert, compose_location_update};
use crate::phone::{normalize_for_dispatch, NormalizedContact};

/// The dispatcher wired to the real providers.
pub type ProviderDispatcher = AlertDispatcher<PushbulletClient, TwilioClient>;

/// Per-channel bookkeeping. Partial delivery is a valid terminal outcome, so
/// counts are reported rather than collapsed into a single flag.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub success: bool,
    pub detail: String,
    pub sent: usize,
    pub total: usize,
}

impl ChannelReport {
    fn not_configured(total: usize) -> Self {
        Self {
            success: false,
            detail: "Not configured".to_string(),
            sent: 0,
            total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertOutcome {
    pub success: bool,
    pub broadcast: ChannelReport,
    pub sms: ChannelReport,
}

impl AlertOutcome {
    fn no_contacts() -> Self {
        let empty = || ChannelReport {
            success: false,
            detail: "No emergency contacts found".to_string(),
            sent: 0,
            total: 0,
        };
        Self {
            success: false,
            broadcast: empty(),
            sms: empty(),
        }
    }
}

/// Fans an emergency message out over two independent providers. Either
/// channel succeeding is sufficient; neither aborts the other.
pub struct AlertDispatcher<A, B> {
    broadcast: Option<A>,
    sms: Option<B>,
}

impl<A: BroadcastChannel, B: SmsChannel> AlertDispatcher<A, B> {
    pub fn new(broadcast: Option<A>, sms: Option<B>) -> Self {
        Self { broadcast, sms }
    }

    /// Send the composed emergency message to every contact on both channels.
    /// Infallible by construction: every provider fault is folded into the
    /// returned outcome.
    pub async fn dispatch(
        &self,
        username: &str,
        point: Point,
        location_name: &str,
        in_zone: bool,
        contacts: &[NormalizedContact],
    ) -> AlertOutcome {
        if contacts.is_empty() {
            return AlertOutcome::no_contacts();
        }

        let body = compose_alert(username, location_name, point, in_zone);

        // The channels are independent call-outs with no shared state, so
        // they run concurrently.
        let (broadcast, sms) = tokio::join!(
            self.run_broadcast(contacts, &body),
            self.run_sms(contacts, &body),
        );

        AlertOutcome {
            success: broadcast.success || sms.success,
            broadcast,
            sms,
        }
    }

    async fn run_broadcast(&self, contacts: &[NormalizedContact], body: &str) -> ChannelReport {
        let total = contacts.len();
        let Some(channel) = &self.broadcast else {
            return ChannelReport::not_configured(total);
        };

        let numbers: Vec<String> = contacts.iter().map(|c| c.phone.clone()).collect();
        match channel.send_to_all(&numbers, body).await {
            Ok(()) => ChannelReport {
                success: true,
                detail: format!("Sent emergency alerts to {total} of {total} contacts"),
                sent: total,
                total,
            },
            Err(e) => {
                warn!("Broadcast channel failed: {}", e);
                ChannelReport {
                    success: false,
                    detail: e.to_string(),
                    sent: 0,
                    total,
                }
            }
        }
    }

    async fn run_sms(&self, contacts: &[NormalizedContact], body: &str) -> ChannelReport {
        let total = contacts.len();
        let Some(channel) = &self.sms else {
            return ChannelReport::not_configured(total);
        };

        let mut sent = 0;
        for contact in contacts {
            // Redundant second normalization pass, kept for parity with the
            // contact pipeline (see phone.rs).
            let number = normalize_for_dispatch(&contact.phone);
            match channel.send_sms(&number, body).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!("SMS to {} ({}) failed: {}", contact.name, number, e);
                }
            }
        }

        ChannelReport {
            success: sent > 0,
            detail: if sent > 0 {
                format!("Sent {sent} of {total} SMS alerts")
            } else {
                "All SMS deliveries failed".to_string()
            },
            sent,
            total,
        }
    }

    /// Best-effort location share over the SMS channel only. Returns how many
    /// contacts were reached.
    pub async fn share_location(
        &self,
        username: &str,
        point: Point,
        location_name: &str,
        contacts: &[NormalizedContact],
    ) -> usize {
        let Some(channel) = &self.sms else {
            return 0;
        };

        let body = compose_location_update(username, location_name, point);
        let mut sent = 0;
        for contact in contacts {
            let number = normalize_for_dispatch(&contact.phone);
            match channel.send_sms(&number, &body).await {
                Ok(()) => sent += 1,
                Err(e) => warn!("Location update to {} failed: {}", number, e),
            }
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::channels::ChannelError;

    fn rejected() -> ChannelError {
        ChannelError::Rejected {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    #[derive(Default)]
    struct MockBroadcast {
        calls: AtomicUsize,
        fail: bool,
    }

    impl BroadcastChannel for MockBroadcast {
        async fn send_to_all(&self, _numbers: &[String], _body: &str) -> Result<(), ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail { Err(rejected()) } else { Ok(()) }
        }
    }

    /// Succeeds only for numbers listed in `deliverable`.
    #[derive(Default)]
    struct MockSms {
        calls: AtomicUsize,
        deliverable: Vec<String>,
    }

    impl SmsChannel for MockSms {
        async fn send_sms(&self, number: &str, _body: &str) -> Result<(), ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.deliverable.iter().any(|d| d == number) {
                Ok(())
            } else {
                Err(rejected())
            }
        }
    }

    fn contact(name: &str, phone: &str) -> NormalizedContact {
        NormalizedContact {
            name: name.to_string(),
            phone: phone.to_string(),
            relationship: "Friend".to_string(),
        }
    }

    fn three_contacts() -> Vec<NormalizedContact> {
        vec![
            contact("Maya", "+911111111111"),
            contact("Ravi", "+912222222222"),
            contact("Amma", "+913333333333"),
        ]
    }

    #[tokio::test]
    async fn zero_contacts_touches_no_provider() {
        let broadcast = MockBroadcast::default();
        let sms = MockSms::default();
        let dispatcher = AlertDispatcher::new(Some(broadcast), Some(sms));

        let outcome = dispatcher
            .dispatch("asha", Point::new(0.0, 0.0), "Unknown Location", false, &[])
            .await;

        assert!(!outcome.success);
        assert!(outcome.broadcast.detail.contains("No emergency contacts"));
        let (a, b) = (dispatcher.broadcast.unwrap(), dispatcher.sms.unwrap());
        assert_eq!(a.calls.load(Ordering::SeqCst), 0);
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_channel_is_enough() {
        // Channel A fails outright; channel B reaches 1 of 3 contacts.
        let broadcast = MockBroadcast { fail: true, ..Default::default() };
        let sms = MockSms {
            deliverable: vec!["+912222222222".to_string()],
            ..Default::default()
        };
        let dispatcher = AlertDispatcher::new(Some(broadcast), Some(sms));

        let outcome = dispatcher
            .dispatch("asha", Point::new(12.97, 77.59), "MG Road", true, &three_contacts())
            .await;

        assert!(outcome.success);
        assert!(!outcome.broadcast.success);
        assert!(outcome.sms.success);
        assert_eq!(outcome.sms.sent, 1);
        assert_eq!(outcome.sms.total, 3);
        // The per-contact faults must not have stopped iteration.
        assert_eq!(dispatcher.sms.unwrap().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn broadcast_alone_succeeds() {
        let dispatcher = AlertDispatcher::<MockBroadcast, MockSms>::new(
            Some(MockBroadcast::default()),
            None,
        );

        let outcome = dispatcher
            .dispatch("asha", Point::new(0.0, 0.0), "Unknown Location", false, &three_contacts())
            .await;

        assert!(outcome.success);
        assert!(outcome.broadcast.success);
        assert_eq!(outcome.broadcast.sent, 3);
        assert!(!outcome.sms.success);
        assert_eq!(outcome.sms.detail, "Not configured");
    }

    #[tokio::test]
    async fn total_failure_is_reported_not_raised() {
        let broadcast = MockBroadcast { fail: true, ..Default::default() };
        let sms = MockSms::default(); // delivers to nobody
        let dispatcher = AlertDispatcher::new(Some(broadcast), Some(sms));

        let outcome = dispatcher
            .dispatch("asha", Point::new(0.0, 0.0), "Unknown Location", false, &three_contacts())
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.sms.sent, 0);
        assert_eq!(outcome.sms.detail, "All SMS deliveries failed");
    }

    #[tokio::test]
    async fn dispatch_prefixes_bare_numbers() {
        // A contact stored without `+` still reaches the SMS channel in
        // dispatchable form.
        let sms = MockSms {
            deliverable: vec!["+919876543210".to_string()],
            ..Default::default()
        };
        let dispatcher = AlertDispatcher::<MockBroadcast, MockSms>::new(None, Some(sms));

        let outcome = dispatcher
            .dispatch(
                "asha",
                Point::new(0.0, 0.0),
                "Unknown Location",
                false,
                &[contact("Maya", "919876543210")],
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.sms.sent, 1);
    }
}
