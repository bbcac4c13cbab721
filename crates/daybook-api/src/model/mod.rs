//! Data transfer objects mirrored from the backend.

mod chat;
mod diary;
pub mod flag;
mod plan;
pub mod timestamp;
mod user;

pub(crate) use chat::{
    ChatRecordRequest, ChatRequest, DiaryGenerateRequest, VisionRequest, VisionResponse,
};
pub use chat::{HistoryEntry, Role};
pub use diary::{
    DeletedDiary, DiaryDetail, DiaryQuery, DiaryUpdate, RECYCLE_RETENTION_DAYS,
    decode_image_paths, encode_image_paths,
};
pub(crate) use plan::NewRecord;
pub use plan::{Cycle, NewPlan, Plan, PlanRecord, PlanUpdate};
pub(crate) use user::LoginRequest;
pub use user::{LoginResponse, User};
