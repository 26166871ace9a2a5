//! Request-facing services: chat queries and feedback

mod feedback;
mod query;

pub use feedback::{
    FeedbackEnvelope, FeedbackRecord, FeedbackRequest, FeedbackService, RATING_RANGE,
};
pub use query::{QueryEnvelope, QueryRequest, QueryService};
