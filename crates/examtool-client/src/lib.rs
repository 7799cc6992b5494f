//! examtool-client: EXAM service integration.
//!
//! Implements the `ExamApi` trait over the exam service's REST API, the
//! question payload builder, and the destructive import workflow that
//! replaces an exam's contents with a parsed exam.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod import;
pub mod mock;
pub mod payload;

pub use api::{ExamApi, SectionEdit};
pub use config::{load_config_from, ExamtoolConfig};
pub use error::ClientError;
pub use http::HttpExamClient;
pub use import::{import_exam, ImportError, ImportSummary};
pub use payload::{build_option, build_question, OptionData, OptionInput, QuestionData};
