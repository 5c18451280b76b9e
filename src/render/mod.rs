//! Rendering extracted cells to JSON and CSV submission files.

mod json;
mod submission;

pub use json::{cells_from_json, cells_to_json, to_json, JsonFormat};
pub use submission::{
    read_submission, read_submission_file, SubmissionRecord, SubmissionWriter, SUBMISSION_HEADER,
};
