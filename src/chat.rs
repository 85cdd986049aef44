//! チャットプロキシ
//!
//! ブラウザから受け取った会話履歴にシステムプロンプトを付けてLLMへ転送する。
//! APIキーはサーバ側にのみ置く。

use crate::error::{ReefIdError, Result};
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest, Role};
use reef_id_common::prompts::{CHAT_MAX_TOKENS, CHAT_SYSTEM_PROMPT};
use std::sync::Arc;
use std::time::Duration;

/// 転送する履歴の最大件数（新しい方から）
pub const MAX_HISTORY: usize = 20;

pub struct ChatProxy {
    client: Arc<dyn CompletionClient>,
    model: String,
    timeout: Duration,
}

impl ChatProxy {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    /// 会話履歴への返答を生成する
    pub async fn reply(&self, history: Vec<ChatMessage>) -> Result<String> {
        let request = self.build_request(history)?;

        let reply = tokio::time::timeout(self.timeout, self.client.complete(request))
            .await
            .map_err(|_| ReefIdError::Timeout(self.timeout.as_secs()))??;

        Ok(reply.trim().to_string())
    }

    /// システムプロンプトを先頭に付けたリクエストを作る
    ///
    /// クライアントから来た system メッセージは捨てる。
    pub fn build_request(&self, history: Vec<ChatMessage>) -> Result<CompletionRequest> {
        let mut conversation: Vec<ChatMessage> = history
            .into_iter()
            .filter(|m| m.role != Role::System)
            .filter(|m| !m.text().trim().is_empty())
            .collect();

        if conversation.is_empty() {
            return Err(ReefIdError::InvalidRequest("メッセージがありません".into()));
        }
        if conversation.len() > MAX_HISTORY {
            conversation.drain(..conversation.len() - MAX_HISTORY);
        }

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(CHAT_SYSTEM_PROMPT));
        messages.extend(conversation);

        Ok(CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: CHAT_MAX_TOKENS,
            temperature: 0.7,
        })
    }
}
