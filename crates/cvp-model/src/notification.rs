//! Notification rows and per-user reminder settings.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::NotificationKind;
use crate::ids::{ContractId, NotificationId, UserId};

/// A deadline reminder delivered to one user for one contract.
///
/// The (user_id, contract_id, kind) triple is unique for the lifetime of
/// the system; the store enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub contract_id: ContractId,
    pub message: String,
    pub email_sent: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Per-user reminder preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub user_id: UserId,
    pub email_enabled: bool,
    pub in_app_enabled: bool,
    /// Day-count thresholds the user wants reminders for.
    pub reminder_days: BTreeSet<u32>,
}

impl NotificationSettings {
    /// Default settings: both channels on, reminders at 90/60/30 days.
    #[must_use]
    pub fn defaults(user_id: UserId) -> Self {
        Self {
            user_id,
            email_enabled: true,
            in_app_enabled: true,
            reminder_days: BTreeSet::from([90, 60, 30]),
        }
    }

    /// True when the user should receive a reminder at this threshold.
    #[must_use]
    pub fn wants(&self, threshold: u32) -> bool {
        (self.email_enabled || self.in_app_enabled) && self.reminder_days.contains(&threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_standard_thresholds() {
        let settings = NotificationSettings::defaults(UserId::generate());
        for threshold in [90, 60, 30] {
            assert!(settings.wants(threshold));
        }
        assert!(!settings.wants(45));
    }

    #[test]
    fn disabled_channels_suppress_reminders() {
        let mut settings = NotificationSettings::defaults(UserId::generate());
        settings.email_enabled = false;
        settings.in_app_enabled = false;
        assert!(!settings.wants(90));
    }
}
