//! Delivers student notifications as Discord direct messages.

use crate::core::notify::{LogNotifier, Notification, Notifier};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends each notification as a DM on a spawned task.
///
/// Students without a linked Discord account are logged instead.
pub struct DiscordNotifier {
    http: Arc<serenity::Http>,
    fallback: LogNotifier,
}

impl DiscordNotifier {
    /// Creates a notifier sending through the bot's HTTP client.
    #[must_use]
    pub const fn new(http: Arc<serenity::Http>) -> Self {
        Self {
            http,
            fallback: LogNotifier,
        }
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, notification: Notification) {
        let Some(user_id) = notification
            .recipient
            .discord_user_id
            .as_deref()
            .and_then(|id| id.parse::<u64>().ok())
            .filter(|id| *id != 0)
        else {
            self.fallback.notify(notification);
            return;
        };

        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            let content = format!("**{}**\n\n{}", notification.subject, notification.body);
            let message = serenity::CreateMessage::new().content(content);
            match serenity::UserId::new(user_id)
                .direct_message(&*http, message)
                .await
            {
                Ok(_) => debug!("Sent DM to student {}", notification.recipient.id),
                Err(e) => warn!(
                    "Failed to DM student {}: {}",
                    notification.recipient.id, e
                ),
            }
        });
    }
}
