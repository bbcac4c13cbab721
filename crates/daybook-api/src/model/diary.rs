//! Diary DTOs.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Days a soft-deleted diary stays in the recycle bin.
pub const RECYCLE_RETENTION_DAYS: i64 = 30;

/// A generated journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryDetail {
    /// Diary ID.
    pub id: i64,
    /// Diary text.
    #[serde(default)]
    pub context: String,
    /// Image paths as a JSON-encoded array string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    /// Creation time (local wall clock).
    #[serde(with = "timestamp")]
    pub gmt_create: NaiveDateTime,
}

impl DiaryDetail {
    /// Decodes the attached image paths.
    ///
    /// # Errors
    ///
    /// Returns an error if `pic` is present but not a JSON string array.
    pub fn image_paths(&self) -> serde_json::Result<Vec<String>> {
        self.pic.as_deref().map_or_else(|| Ok(Vec::new()), decode_image_paths)
    }
}

/// Encodes image paths the way the backend stores them in `pic`.
#[must_use]
pub fn encode_image_paths(paths: &[String]) -> String {
    serde_json::Value::from(paths.to_vec()).to_string()
}

/// Decodes a `pic` column. An empty string decodes to no images.
///
/// # Errors
///
/// Returns an error if the value is not a JSON string array.
pub fn decode_image_paths(pic: &str) -> serde_json::Result<Vec<String>> {
    if pic.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(pic)
}

/// A diary sitting in the recycle bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedDiary {
    /// The diary itself.
    #[serde(flatten)]
    pub diary: DiaryDetail,
    /// When it was soft-deleted.
    #[serde(with = "timestamp")]
    pub gmt_delete: NaiveDateTime,
}

impl DeletedDiary {
    /// When the server will hard-delete the diary.
    #[must_use]
    pub fn purge_at(&self) -> NaiveDateTime {
        self.gmt_delete + Duration::days(RECYCLE_RETENTION_DAYS)
    }

    /// Whole days left before the hard delete, never negative.
    #[must_use]
    pub fn days_remaining(&self, now: NaiveDateTime) -> i64 {
        (self.purge_at() - now).num_days().max(0)
    }

    /// Returns true if the diary can still be restored.
    #[must_use]
    pub fn is_recoverable(&self, now: NaiveDateTime) -> bool {
        now < self.purge_at()
    }
}

/// Filter for listing diaries (the calendar view asks per month).
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryQuery {
    /// Owner.
    pub user_id: i64,
    /// Year filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Month filter (1-12), only meaningful with `year`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl DiaryQuery {
    /// All diaries of a user.
    #[must_use]
    pub const fn all(user_id: i64) -> Self {
        Self {
            user_id,
            year: None,
            month: None,
        }
    }

    /// Diaries of one calendar month.
    #[must_use]
    pub const fn month(user_id: i64, year: i32, month: u32) -> Self {
        Self {
            user_id,
            year: Some(year),
            month: Some(month),
        }
    }
}

/// Body for editing a diary in place.
#[derive(Debug, Clone, Serialize)]
pub struct DiaryUpdate {
    /// New text.
    pub context: String,
    /// New image list, JSON-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
}

impl DiaryUpdate {
    /// Replaces the text and image list.
    #[must_use]
    pub fn new(context: impl Into<String>, images: &[String]) -> Self {
        Self {
            context: context.into(),
            pic: (!images.is_empty()).then(|| encode_image_paths(images)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_image_paths_round_trip() {
        let paths = vec![
            "uploads/2024/a.jpg".to_string(),
            "uploads/2024/b \"quoted\".png".to_string(),
            "uploads/2024/c.heic".to_string(),
        ];
        let encoded = encode_image_paths(&paths);
        assert_eq!(decode_image_paths(&encoded).unwrap(), paths);
    }

    #[test]
    fn test_decode_empty_pic() {
        assert!(decode_image_paths("").unwrap().is_empty());
        assert!(decode_image_paths("[]").unwrap().is_empty());
        assert!(decode_image_paths("not json").is_err());
    }

    #[test]
    fn test_diary_image_paths() {
        let diary: DiaryDetail = serde_json::from_str(
            r#"{"id": 1, "context": "sunny", "pic": "[\"a.jpg\"]", "gmt_create": "2024-06-01 21:00:00"}"#,
        )
        .unwrap();
        assert_eq!(diary.image_paths().unwrap(), vec!["a.jpg".to_string()]);

        let bare: DiaryDetail =
            serde_json::from_str(r#"{"id": 2, "gmt_create": "2024-06-01 21:00:00"}"#).unwrap();
        assert!(bare.image_paths().unwrap().is_empty());
        assert!(bare.context.is_empty());
    }

    #[test]
    fn test_deleted_diary_retention() {
        let deleted = DeletedDiary {
            diary: DiaryDetail {
                id: 1,
                context: String::new(),
                pic: None,
                gmt_create: at(2024, 1, 1),
            },
            gmt_delete: at(2024, 1, 10),
        };

        assert_eq!(deleted.purge_at(), at(2024, 2, 9));
        assert_eq!(deleted.days_remaining(at(2024, 1, 10)), 30);
        assert_eq!(deleted.days_remaining(at(2024, 2, 1)), 8);
        assert_eq!(deleted.days_remaining(at(2024, 3, 1)), 0);
        assert!(deleted.is_recoverable(at(2024, 2, 8)));
        assert!(!deleted.is_recoverable(at(2024, 2, 9)));
    }

    #[test]
    fn test_deleted_diary_flattened() {
        let deleted: DeletedDiary = serde_json::from_str(
            r#"{"id": 4, "context": "x", "gmt_create": "2024-01-01 00:00:00", "gmt_delete": "2024-01-02 00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(deleted.diary.id, 4);
    }

    #[test]
    fn test_diary_update_body() {
        let update = DiaryUpdate::new("edited", &[]);
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"context":"edited"}"#
        );

        let update = DiaryUpdate::new("edited", &["a.jpg".to_string()]);
        assert_eq!(update.pic.as_deref(), Some(r#"["a.jpg"]"#));
    }

    #[test]
    fn test_diary_query_body() {
        let json = serde_json::to_value(DiaryQuery::month(5, 2024, 6)).unwrap();
        assert_eq!(json["userId"], 5);
        assert_eq!(json["month"], 6);
        let json = serde_json::to_value(DiaryQuery::all(5)).unwrap();
        assert!(json.get("year").is_none());
    }

    proptest! {
        #[test]
        fn prop_image_paths_round_trip(
            paths in proptest::collection::vec("\\PC*", 0..8),
        ) {
            let encoded = encode_image_paths(&paths);
            prop_assert_eq!(decode_image_paths(&encoded).unwrap(), paths);
        }
    }
}
