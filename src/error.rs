use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReefIdError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`reef-id config --set-api-key YOUR_KEY` または環境変数 OPENAI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像データが不正: {0}")]
    InvalidImage(String),

    #[error("リクエストが不正: {0}")]
    InvalidRequest(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("APIがタイムアウトしました ({0}秒)")]
    Timeout(u64),

    #[error("図鑑ファイルが不正: {0}")]
    InvalidCatalog(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("サーバエラー: {0}")]
    Server(String),

    #[error(transparent)]
    Common(#[from] reef_id_common::Error),
}

pub type Result<T> = std::result::Result<T, ReefIdError>;
