//! Feedback service - ratings and comments on earlier answers

use crate::error::{RagError, RagResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use tracing::info;

/// Accepted rating values
pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

/// Inbound feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub session_id: String,
    pub response_id: String,
    #[serde(default)]
    pub feedback: String,
    pub rating: i32,
}

/// Accepted feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub session_id: String,
    pub response_id: String,
    pub feedback: String,
    pub rating: u8,
    pub received_at: DateTime<Utc>,
}

/// Acknowledgement returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEnvelope {
    pub success: bool,
    pub message: String,
}

/// Collects feedback in a bounded in-process log
#[derive(Debug)]
pub struct FeedbackService {
    records: Mutex<VecDeque<FeedbackRecord>>,
    capacity: usize,
}

impl Default for FeedbackService {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl FeedbackService {
    /// Keep at most `capacity` records; the oldest are dropped first
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn submit_feedback(
        &self,
        session_id: &str,
        response_id: &str,
        feedback: &str,
        rating: i32,
    ) -> RagResult<FeedbackEnvelope> {
        if session_id.trim().is_empty() {
            return Err(RagError::validation("session_id", "must not be empty", session_id));
        }
        if response_id.trim().is_empty() {
            return Err(RagError::validation("response_id", "must not be empty", response_id));
        }
        if !RATING_RANGE.contains(&rating) {
            return Err(RagError::validation(
                "rating",
                "must be between 1 and 5",
                rating.to_string(),
            ));
        }

        let record = FeedbackRecord {
            session_id: session_id.to_string(),
            response_id: response_id.to_string(),
            feedback: feedback.to_string(),
            rating: rating as u8,
            received_at: Utc::now(),
        };
        info!(
            session_id = %record.session_id,
            response_id = %record.response_id,
            rating = record.rating,
            feedback = %record.feedback,
            "Feedback received"
        );

        let mut records = self.records.lock();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);

        Ok(FeedbackEnvelope {
            success: true,
            message: "Feedback received.".to_string(),
        })
    }

    /// Up to `limit` records, newest first
    pub fn recent(&self, limit: usize) -> Vec<FeedbackRecord> {
        self.records.lock().iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
