pub mod applications;
pub mod documents;
pub mod jobs;
pub mod storage;
