use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::GarageError;

/// How long an offline session created by [`Session::local`] stays valid.
const LOCAL_SESSION_DAYS: i64 = 30;

/// Authenticated user context passed explicitly through service calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        user_id: Uuid,
        email: impl Into<String>,
        access_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Session for single-user local use; the token is random and never sent anywhere.
    pub fn local(email: impl Into<String>) -> Self {
        Self::new(
            Uuid::new_v4(),
            email,
            Uuid::new_v4().simple().to_string(),
            Utc::now() + Duration::days(LOCAL_SESSION_DAYS),
        )
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn ensure_active(&self, now: DateTime<Utc>) -> Result<(), GarageError> {
        if self.is_expired(now) {
            Err(GarageError::SessionExpired)
        } else {
            Ok(())
        }
    }

    /// Extends an offline session; returns the new expiry.
    pub fn renew(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.expires_at = now + Duration::days(LOCAL_SESSION_DAYS);
        self.expires_at
    }
}
