//! LLM API連携
//!
//! 画像認識とチャットはどちらも Chat Completions 形式で呼び出す。

mod openai;
mod types;

pub use openai::OpenAiClient;
pub use types::{ChatMessage, CompletionRequest, ContentPart, ImageUrl, MessageContent, Role};

use crate::error::Result;
use async_trait::async_trait;

/// 補完APIクライアント
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 最初の候補のテキストを返す
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
