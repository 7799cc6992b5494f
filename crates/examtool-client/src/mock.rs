//! In-memory exam service for testing.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{ExamApi, SectionEdit};
use crate::error::ClientError;
use crate::payload::QuestionData;

/// A call made against [`MockExamApi`], in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetExams,
    GetExam(u64),
    CreateSection(u64),
    EditSection {
        exam_id: u64,
        section_id: u64,
        edit: SectionEdit,
    },
    DeleteSection {
        exam_id: u64,
        section_id: u64,
    },
    AddQuestion {
        exam_id: u64,
        section_id: u64,
        sequence_number: u32,
        question_id: u64,
    },
    RemoveQuestion {
        exam_id: u64,
        section_id: u64,
        question_id: u64,
    },
    GetQuestions,
    CreateQuestion(QuestionData),
    EditQuestion {
        question_id: u64,
        data: QuestionData,
    },
    DeleteQuestion(u64),
}

impl ApiCall {
    /// Short name of the call, used by [`MockExamApi::fail_on`].
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::GetExams => "get_exams",
            ApiCall::GetExam(_) => "get_exam",
            ApiCall::CreateSection(_) => "create_section",
            ApiCall::EditSection { .. } => "edit_section",
            ApiCall::DeleteSection { .. } => "delete_section",
            ApiCall::AddQuestion { .. } => "add_question",
            ApiCall::RemoveQuestion { .. } => "remove_question",
            ApiCall::GetQuestions => "get_questions",
            ApiCall::CreateQuestion(_) => "create_question",
            ApiCall::EditQuestion { .. } => "edit_question",
            ApiCall::DeleteQuestion(_) => "delete_question",
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<ApiCall>,
    /// Section ids per exam.
    sections: BTreeMap<u64, Vec<u64>>,
    /// Question bank, keyed by id.
    questions: BTreeMap<u64, Value>,
    next_id: u64,
    fail_on: Option<&'static str>,
}

impl MockState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// An exam service that keeps sections and bank questions in memory and
/// records every call.
#[derive(Debug)]
pub struct MockExamApi {
    state: Mutex<MockState>,
}

impl MockExamApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1000,
                ..Default::default()
            }),
        }
    }

    /// Seed an exam with existing section ids.
    pub fn with_sections(self, exam_id: u64, section_ids: &[u64]) -> Self {
        self.lock().sections.insert(exam_id, section_ids.to_vec());
        self
    }

    /// Seed the question bank with a question carrying `tags`.
    pub fn with_bank_question(self, question_id: u64, tags: &[&str]) -> Self {
        let tags: Vec<Value> = tags.iter().map(|t| json!({ "name": t })).collect();
        self.lock()
            .questions
            .insert(question_id, json!({ "id": question_id, "tags": tags }));
        self
    }

    /// Make every call with this name fail with an HTTP 500.
    pub fn fail_on(self, call: &'static str) -> Self {
        self.lock().fail_on = Some(call);
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Section ids currently attached to `exam_id`.
    pub fn section_ids(&self, exam_id: u64) -> Vec<u64> {
        self.lock().sections.get(&exam_id).cloned().unwrap_or_default()
    }

    /// Ids currently in the question bank.
    pub fn bank_ids(&self) -> Vec<u64> {
        self.lock().questions.keys().copied().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ApiCall) -> Result<std::sync::MutexGuard<'_, MockState>, ClientError> {
        let mut state = self.lock();
        let name = call.name();
        state.calls.push(call);
        if state.fail_on == Some(name) {
            return Err(ClientError::Api {
                status: 500,
                endpoint: name.to_string(),
                body: "mock failure".to_string(),
            });
        }
        Ok(state)
    }
}

impl Default for MockExamApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExamApi for MockExamApi {
    async fn get_exams(&self) -> Result<Value, ClientError> {
        let state = self.record(ApiCall::GetExams)?;
        let exams: Vec<Value> = state.sections.keys().map(|id| json!({ "id": id })).collect();
        Ok(Value::Array(exams))
    }

    async fn get_exam(&self, exam_id: u64) -> Result<Value, ClientError> {
        let state = self.record(ApiCall::GetExam(exam_id))?;
        let sections: Vec<Value> = state
            .sections
            .get(&exam_id)
            .map(|ids| ids.iter().map(|id| json!({ "id": id })).collect())
            .unwrap_or_default();
        Ok(json!({ "id": exam_id, "examSections": sections }))
    }

    async fn create_section(&self, exam_id: u64) -> Result<Value, ClientError> {
        let mut state = self.record(ApiCall::CreateSection(exam_id))?;
        let id = state.next_id();
        let sections = state.sections.entry(exam_id).or_default();
        sections.push(id);
        let sequence_number = sections.len() - 1;
        Ok(json!({ "id": id, "sequenceNumber": sequence_number }))
    }

    async fn edit_section(
        &self,
        exam_id: u64,
        section_id: u64,
        edit: &SectionEdit,
    ) -> Result<Value, ClientError> {
        self.record(ApiCall::EditSection {
            exam_id,
            section_id,
            edit: edit.clone(),
        })?;
        Ok(json!({ "id": section_id, "name": edit.name }))
    }

    async fn delete_section(&self, exam_id: u64, section_id: u64) -> Result<(), ClientError> {
        let mut state = self.record(ApiCall::DeleteSection {
            exam_id,
            section_id,
        })?;
        if let Some(sections) = state.sections.get_mut(&exam_id) {
            sections.retain(|id| *id != section_id);
        }
        Ok(())
    }

    async fn add_question(
        &self,
        exam_id: u64,
        section_id: u64,
        sequence_number: u32,
        question_id: u64,
    ) -> Result<Value, ClientError> {
        self.record(ApiCall::AddQuestion {
            exam_id,
            section_id,
            sequence_number,
            question_id,
        })?;
        Ok(json!({ "id": section_id }))
    }

    async fn remove_question(
        &self,
        exam_id: u64,
        section_id: u64,
        question_id: u64,
    ) -> Result<(), ClientError> {
        self.record(ApiCall::RemoveQuestion {
            exam_id,
            section_id,
            question_id,
        })?;
        Ok(())
    }

    async fn get_questions(&self) -> Result<Value, ClientError> {
        let state = self.record(ApiCall::GetQuestions)?;
        Ok(Value::Array(state.questions.values().cloned().collect()))
    }

    async fn create_question(&self, data: &QuestionData) -> Result<Value, ClientError> {
        let mut state = self.record(ApiCall::CreateQuestion(data.clone()))?;
        let id = state.next_id();
        let options: Vec<Value> = data
            .options
            .iter()
            .map(|_| json!({ "id": state.next_id() }))
            .collect();
        let tags: Vec<Value> = data.tag_names().map(|t| json!({ "name": t })).collect();
        let question = json!({ "id": id, "tags": tags, "options": options });
        state.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn edit_question(
        &self,
        question_id: u64,
        data: &QuestionData,
    ) -> Result<Value, ClientError> {
        self.record(ApiCall::EditQuestion {
            question_id,
            data: data.clone(),
        })?;
        Ok(json!({ "id": question_id }))
    }

    async fn delete_question(&self, question_id: u64) -> Result<(), ClientError> {
        let mut state = self.record(ApiCall::DeleteQuestion(question_id))?;
        state.questions.remove(&question_id);
        Ok(())
    }
}
