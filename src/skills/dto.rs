use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::skills::repo::{Skill, SkillWithOwner};

#[derive(Debug, Serialize)]
pub struct SkillView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub hours: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Skill> for SkillView {
    fn from(s: Skill) -> Self {
        Self {
            id: s.id,
            title: s.title,
            description: s.description,
            category: s.category,
            hours: s.hours,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillOwner {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub online: bool,
}

/// Browse-surface shape: the listing plus its owner's public fields.
#[derive(Debug, Serialize)]
pub struct SkillWithOwnerView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub hours: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: SkillOwner,
}

impl From<SkillWithOwner> for SkillWithOwnerView {
    fn from(s: SkillWithOwner) -> Self {
        Self {
            id: s.id,
            title: s.title,
            description: s.description,
            category: s.category,
            hours: s.hours,
            created_at: s.created_at,
            user: SkillOwner {
                id: s.user_id,
                name: s.owner_name,
                avatar: s.owner_avatar,
                online: s.owner_online,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub hours: Option<f64>,
}

#[derive(Debug)]
pub struct NewSkill {
    pub title: String,
    pub description: String,
    pub category: String,
    pub hours: f64,
}

impl CreateSkillRequest {
    pub fn validated(self) -> ApiResult<NewSkill> {
        let title = non_empty(self.title);
        let description = non_empty(self.description);
        let category = non_empty(self.category);
        let (Some(title), Some(description), Some(category), Some(hours)) =
            (title, description, category, self.hours)
        else {
            return Err(ApiError::Validation("Missing required fields"));
        };
        if hours <= 0.0 {
            return Err(ApiError::Validation("Hours must be positive"));
        }
        Ok(NewSkill {
            title,
            description,
            category,
            hours,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub hours: Option<f64>,
}

impl UpdateSkillRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.hours.is_none()
    }

    pub fn validated(&self) -> ApiResult<()> {
        if self.is_empty() {
            return Err(ApiError::Validation("No fields to update"));
        }
        if matches!(self.hours, Some(h) if h <= 0.0) {
            return Err(ApiError::Validation("Hours must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateSkillRequest {
        CreateSkillRequest {
            title: Some("Guitar Lessons".into()),
            description: Some("Beginner to intermediate acoustic guitar".into()),
            category: Some("Music".into()),
            hours: Some(2.0),
        }
    }

    #[test]
    fn create_accepts_complete_request() {
        let skill = full_request().validated().expect("valid");
        assert_eq!(skill.title, "Guitar Lessons");
        assert_eq!(skill.hours, 2.0);
    }

    #[test]
    fn create_rejects_missing_hours() {
        let req = CreateSkillRequest {
            hours: None,
            ..full_request()
        };
        assert!(req.validated().is_err());
    }

    #[test]
    fn create_rejects_blank_title() {
        let req = CreateSkillRequest {
            title: Some("   ".into()),
            ..full_request()
        };
        assert!(req.validated().is_err());
    }

    #[test]
    fn create_rejects_non_positive_hours() {
        let req = CreateSkillRequest {
            hours: Some(0.0),
            ..full_request()
        };
        assert!(req.validated().is_err());
    }

    #[test]
    fn update_rejects_empty_change_set() {
        let req = UpdateSkillRequest {
            title: None,
            description: None,
            category: None,
            hours: None,
        };
        assert!(req.validated().is_err());
    }

    #[test]
    fn update_accepts_partial_change_set() {
        let req = UpdateSkillRequest {
            title: Some("Bass Lessons".into()),
            description: None,
            category: None,
            hours: None,
        };
        assert!(req.validated().is_ok());
    }
}
