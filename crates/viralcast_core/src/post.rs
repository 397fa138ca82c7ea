//! The marketing post and its lifecycle.

use crate::ImageReference;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a post: draft → scheduled → posted/failed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostStatus {
    /// Freshly generated
    #[default]
    Draft,
    /// Waiting for its publication time
    Scheduled,
    /// Delivered to the channel
    Posted,
    /// Delivery failed
    Failed,
}

impl PostStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use viralcast_core::PostStatus;
    ///
    /// assert!(PostStatus::Draft.can_transition_to(PostStatus::Scheduled));
    /// assert!(PostStatus::Scheduled.can_transition_to(PostStatus::Posted));
    /// assert!(!PostStatus::Posted.can_transition_to(PostStatus::Draft));
    /// ```
    pub fn can_transition_to(self, next: PostStatus) -> bool {
        matches!(
            (self, next),
            (PostStatus::Draft, PostStatus::Scheduled)
                | (PostStatus::Draft, PostStatus::Posted)
                | (PostStatus::Draft, PostStatus::Failed)
                | (PostStatus::Scheduled, PostStatus::Posted)
                | (PostStatus::Scheduled, PostStatus::Failed)
                | (PostStatus::Failed, PostStatus::Scheduled)
        )
    }
}

/// A generated marketing post ready for review or delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier
    pub id: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Suggested publication time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Attention-grabbing headline
    pub hook: String,
    /// Body text
    pub content: String,
    /// Emotional trigger line
    pub emotional_trigger: String,
    /// Call to action
    pub cta: String,
    /// Hashtags without the leading `#`
    pub hashtags: Vec<String>,
    /// Prompt for the illustration
    pub image_prompt: String,
    /// Attached illustration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageReference>,
    /// Lifecycle status
    #[serde(default)]
    pub status: PostStatus,
    /// Channel the post belongs to
    pub channel_id: String,
}

impl Post {
    /// Moves the post to `next` if the lifecycle allows it.
    ///
    /// Returns `false` and leaves the status untouched otherwise.
    pub fn transition(&mut self, next: PostStatus) -> bool {
        if self.status.can_transition_to(next) {
            self.status = next;
            true
        } else {
            false
        }
    }

    /// Hashtags rendered with a leading `#`, separated by spaces.
    pub fn hashtag_line(&self) -> String {
        self.hashtags
            .iter()
            .map(|tag| format!("#{}", tag.trim_start_matches('#')))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
