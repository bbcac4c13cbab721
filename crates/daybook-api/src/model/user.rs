//! User and auth DTOs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{flag, timestamp};

/// The signed-in user, as the backend describes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display nickname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Paid membership flag.
    #[serde(
        default,
        deserialize_with = "flag::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_vip: Option<bool>,
    /// Membership expiry.
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub vip_expire_time: Option<NaiveDateTime>,
    /// Diary lock passcode, if the user set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diary_secret: Option<String>,
}

impl User {
    /// Nickname if set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Returns true if the membership flag is set and not past its expiry.
    #[must_use]
    pub fn is_vip_active(&self, now: NaiveDateTime) -> bool {
        self.is_vip.unwrap_or(false) && self.vip_expire_time.is_none_or(|exp| now < exp)
    }

    /// Returns true if the diary is protected by a passcode.
    #[must_use]
    pub fn has_diary_lock(&self) -> bool {
        self.diary_secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Body for `POST /api/login`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The signed-in user.
    pub user: User,
    /// Bearer token for subsequent requests.
    pub token: String,
}
