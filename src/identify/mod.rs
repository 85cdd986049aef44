//! 魚種識別パイプライン
//!
//! 1. 画像認識モデルで魚名を取得（タイムアウト付き）
//! 2. 応答を整形して候補名にする
//! 3. 図鑑と照合
//!
//! 画像認識が完了してから照合を行う。失敗はすべて終端的で再試行しない。

mod encoding;

pub use self::encoding::{extract_base64_from_data_url, extract_mime_type_from_data_url, EncodedImage};

use crate::error::{ReefIdError, Result};
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest};
use reef_id_common::prompts::{VISION_MAX_TOKENS, VISION_PROMPT};
use reef_id_common::{clean_species_answer, match_species, ImageStore, MatchFailure, MatchResult, SpeciesCatalog, TrigramScheme};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// 識別失敗
#[derive(Error, Debug)]
pub enum IdentifyError {
    /// 画像認識API・設定など上流の失敗
    #[error(transparent)]
    Upstream(#[from] ReefIdError),

    /// 照合の失敗
    #[error(transparent)]
    Match(#[from] MatchFailure),
}

/// 識別結果（照合結果と画像認識モデルの回答）
#[derive(Debug, Clone)]
pub struct Identification {
    pub candidate_name: String,
    pub result: MatchResult,
}

pub struct Identifier {
    client: Arc<dyn CompletionClient>,
    catalog: Arc<dyn SpeciesCatalog>,
    images: ImageStore,
    scheme: TrigramScheme,
    model: String,
    timeout: Duration,
}

impl Identifier {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        catalog: Arc<dyn SpeciesCatalog>,
        images: ImageStore,
        scheme: TrigramScheme,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            catalog,
            images,
            scheme,
            model: model.into(),
            timeout,
        }
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog.len()
    }

    /// 画像認識モデルに魚名を問い合わせる
    pub async fn recognize(&self, image: &EncodedImage) -> Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user_with_image(VISION_PROMPT, image.to_data_url())],
            max_tokens: VISION_MAX_TOKENS,
            temperature: 0.0,
        };

        let raw = tokio::time::timeout(self.timeout, self.client.complete(request))
            .await
            .map_err(|_| ReefIdError::Timeout(self.timeout.as_secs()))??;

        let candidate = clean_species_answer(&raw);
        tracing::info!(candidate = %candidate, "vision model answered");
        Ok(candidate)
    }

    /// 候補名を図鑑と照合する
    pub fn match_name(&self, candidate_name: &str) -> std::result::Result<MatchResult, MatchFailure> {
        let outcome = match_species(candidate_name, self.catalog.as_ref(), &self.images, self.scheme);

        match &outcome {
            Ok(result) => tracing::info!(
                candidate = %candidate_name,
                id = %result.record.id,
                name = %result.record.common_name,
                confidence = result.confidence,
                "species matched"
            ),
            Err(failure) => tracing::warn!(candidate = %candidate_name, reason = %failure, "species not matched"),
        }

        outcome
    }

    /// 画像から魚種を識別する
    pub async fn identify(&self, image: &EncodedImage) -> std::result::Result<Identification, IdentifyError> {
        let candidate_name = self.recognize(image).await?;
        let result = self.match_name(&candidate_name)?;
        Ok(Identification { candidate_name, result })
    }
}
