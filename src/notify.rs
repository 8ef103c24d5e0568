use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::{
        HashMap,
        VecDeque,
    },
    sync::{
        Arc,
        Mutex,
    },
};
use tracing::info;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationCategory {
    System,
    Workshop,
    Auction,
}

/// Fire-and-forget sink for user-facing notifications.
pub trait NotificationSink {
    fn push(&self, category: NotificationCategory, message: String);
}

/// Routes notifications into the log stream; the default for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn push(&self, category: NotificationCategory, message: String) {
        info!(?category, "{message}");
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub category: NotificationCategory,
    pub message: String,
    pub pushed_at: DateTime<Utc>,
}

/// Buffers notifications for a UI layer to drain on its own schedule.
#[derive(Clone, Default)]
pub struct QueueNotificationSink {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl QueueNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().unwrap().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl NotificationSink for QueueNotificationSink {
    fn push(&self, category: NotificationCategory, message: String) {
        self.queue.lock().unwrap().push_back(Notification {
            category,
            message,
            pushed_at: Utc::now(),
        });
    }
}

/// Renders localized strings from a key plus positional arguments.
pub trait Localizer {
    fn localize(&self, key: &str, args: &[&str]) -> String;
}

pub const QUEST_COMPLETE_KEY: &str = "NOTIFICATION_QUEST_COMPLETE";
pub const MULTIPLE_QUEST_COMPLETE_KEY: &str = "NOTIFICATION_MULTIPLE_QUEST_COMPLETE";

/// Template-table localizer with English defaults. Placeholders are positional
/// (`{0}`, `{1}`, ...); an unknown key falls back to the key itself so a
/// missing entry never blocks a notification.
#[derive(Clone, Debug)]
pub struct StaticLocalizer {
    templates: HashMap<String, String>,
}

impl Default for StaticLocalizer {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            QUEST_COMPLETE_KEY.to_string(),
            "Quest completed: {0}".to_string(),
        );
        templates.insert(
            MULTIPLE_QUEST_COMPLETE_KEY.to_string(),
            "{0} quests completed".to_string(),
        );
        Self { templates }
    }
}

impl StaticLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }
}

impl Localizer for StaticLocalizer {
    fn localize(&self, key: &str, args: &[&str]) -> String {
        let template = self.templates.get(key).map(String::as_str).unwrap_or(key);
        let mut rendered = template.to_string();
        for (position, arg) in args.iter().enumerate() {
            rendered = rendered.replace(&format!("{{{position}}}"), arg);
        }
        rendered
    }
}
