mod submission;

pub use submission::SubmissionClient;
