use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reef-id")]
#[command(about = "ダイビングサイト向け魚種識別ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPサーバを起動（/identify-fish, /chat, /health）
    Serve {
        /// 待ち受けアドレス（省略時は設定値）
        #[arg(short, long)]
        bind: Option<String>,

        /// 図鑑JSONファイル（省略時は設定値）
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// 写真（ファイルまたはフォルダ）の魚種を識別
    Identify {
        /// 写真ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 図鑑JSONファイル
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// 魚名を図鑑と照合（画像認識なし）
    Match {
        /// 魚名
        #[arg(required = true)]
        name: String,

        /// 図鑑JSONファイル
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// ダイビング案内チャットに質問
    Chat {
        /// 質問文
        #[arg(required = true)]
        message: String,
    },

    /// 図鑑の概要を表示
    Catalog {
        /// 図鑑JSONファイル
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
