use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::users::repo::User;

/// User as seen over the wire. The password hash never leaves the repo
/// layer; the balance keeps its legacy camelCase spelling.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    #[serde(rename = "timeCredits")]
    pub time_credits: i64,
    pub bio: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub is_online: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            avatar: u.avatar,
            time_credits: u.time_credits,
            bio: u.bio,
            role: u.role,
            location: u.location,
            website: u.website,
            is_online: u.is_online,
            last_seen: u.last_seen,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.avatar.is_none()
            && self.bio.is_none()
            && self.role.is_none()
            && self.location.is_none()
            && self.website.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    #[serde(default)]
    pub amount: Option<i64>,
}

impl AmountRequest {
    /// Missing, zero and negative amounts are all invalid.
    pub fn validated(&self) -> ApiResult<i64> {
        match self.amount {
            Some(amount) if amount > 0 => Ok(amount),
            _ => Err(ApiError::Validation("Invalid amount")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            avatar: Some("https://api.dicebear.com/7.x/avataaars/svg?seed=alice".into()),
            time_credits: 10,
            bio: None,
            role: None,
            location: None,
            website: None,
            is_online: false,
            last_seen: datetime!(2024-05-01 12:00 UTC),
            created_at: datetime!(2024-05-01 12:00 UTC),
        }
    }

    #[test]
    fn view_never_exposes_password_hash() {
        let json = serde_json::to_value(UserView::from(sample_user())).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn view_spells_balance_time_credits() {
        let json = serde_json::to_value(UserView::from(sample_user())).unwrap();
        assert_eq!(json["timeCredits"], 10);
        assert!(json.get("time_credits").is_none());
    }

    #[test]
    fn view_formats_timestamps_rfc3339() {
        let json = serde_json::to_value(UserView::from(sample_user())).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(AmountRequest { amount: None }.validated().is_err());
        assert!(AmountRequest { amount: Some(0) }.validated().is_err());
        assert!(AmountRequest { amount: Some(-5) }.validated().is_err());
        assert_eq!(AmountRequest { amount: Some(5) }.validated().unwrap(), 5);
    }

    #[test]
    fn empty_profile_change_set_detected() {
        let empty = UpdateProfileRequest {
            avatar: None,
            bio: None,
            role: None,
            location: None,
            website: None,
        };
        assert!(empty.is_empty());

        let some = UpdateProfileRequest {
            bio: Some("hi".into()),
            ..empty
        };
        assert!(!some.is_empty());
    }
}
