//! 基础设施层（Infrastructure）
//!
//! 持有本地持久化资源，只通过端口暴露能力：
//!
//! - `CredentialStore` - API 凭据的读写
//! - `QuizLibrary` - 已保存题目的追加、列出、读取、删除、更新

pub mod credential_store;
pub mod quiz_library;

pub use credential_store::{CredentialStore, FileCredentialStore, CREDENTIAL_ENV_VAR};
pub use quiz_library::{new_record, new_record_id, JsonFileLibrary, QuizLibrary};
