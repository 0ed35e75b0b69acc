use super::entities::{TranscriptEntry, TranscriptSummary};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transcript.ts")]
pub struct TranscriptResponse {
    pub student_id: String,
    /// 仅含已有总评的课程
    pub items: Vec<TranscriptEntry>,
    pub summary: TranscriptSummary,
}
