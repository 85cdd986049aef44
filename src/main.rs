use clap::Parser;
use reef_id::{catalog, chat, cli, config, error, identify, llm, scanner, server};
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use error::Result;
use identify::{EncodedImage, IdentifyError, Identifier};
use reef_id_common::{MatchResult, SpeciesCatalog, SpeciesResponse};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { bind, catalog } => {
            let catalog = Arc::new(load_catalog(&config, catalog.as_deref())?);
            let client: Arc<dyn llm::CompletionClient> = Arc::new(llm::OpenAiClient::from_config(&config)?);

            let identifier = Arc::new(build_identifier(&config, client.clone(), catalog)?);
            let chat = Arc::new(chat::ChatProxy::new(
                client,
                config.chat_model.clone(),
                timeout(&config),
            ));

            let bind = bind.unwrap_or_else(|| config.bind_address.clone());
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                catalog_size = identifier.catalog_size(),
                scheme = %config.trigram_scheme,
                "starting reef-id server"
            );
            server::serve(server::AppState::new(identifier, chat), &bind).await?;
        }

        Commands::Identify { path, catalog, format } => {
            println!("🐠 reef-id - 魚種識別\n");

            let images = scanner::scan_images(&path)?;
            println!("✔ {}枚の写真を検出\n", images.len());
            if images.is_empty() {
                return Ok(());
            }

            let catalog = Arc::new(load_catalog(&config, catalog.as_deref())?);
            let client = Arc::new(llm::OpenAiClient::from_config(&config)?);
            let identifier = build_identifier(&config, client, catalog)?;

            let mut report = Vec::new();
            for image in &images {
                let outcome = identify_file(&identifier, &image.path, config.max_image_size).await;
                match format {
                    OutputFormat::Text => print_identification(&image.file_name, &outcome),
                    OutputFormat::Json => report.push(identification_json(&image.file_name, outcome)),
                }
            }

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }

        Commands::Match { name, catalog, format } => {
            let catalog = load_catalog(&config, catalog.as_deref())?;
            let images = config.image_store()?;

            let outcome = reef_id_common::match_species(&name, &catalog, &images, config.trigram_scheme);
            match format {
                OutputFormat::Text => match &outcome {
                    Ok(result) => print_match(result),
                    Err(failure) => println!("✖ {}", failure),
                },
                OutputFormat::Json => {
                    let value = match outcome {
                        Ok(result) => serde_json::to_value(SpeciesResponse::from(result))?,
                        Err(failure) => serde_json::json!({ "error": failure.to_string() }),
                    };
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
            }
        }

        Commands::Chat { message } => {
            let client = Arc::new(llm::OpenAiClient::from_config(&config)?);
            let proxy = chat::ChatProxy::new(client, config.chat_model.clone(), timeout(&config));
            let reply = proxy.reply(vec![llm::ChatMessage::user(message)]).await?;
            println!("{}", reply);
        }

        Commands::Catalog { catalog } => {
            let path = catalog_path(&config, catalog.as_deref());
            let catalog = catalog::load_catalog(&path)?;
            let summary = catalog::CatalogSummary::from_records(catalog.records());

            println!("図鑑情報:");
            println!("  パス: {}", path.display());
            println!("  件数: {}", summary.total);
            println!("  分布地域なし: {}", summary.without_regions);
            println!("  科:");
            for (family, count) in &summary.by_family {
                println!("    {}: {}", family, count);
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  APIエンドポイント: {}", config.api_base_url);
                println!("  画像認識モデル: {}", config.vision_model);
                println!("  チャットモデル: {}", config.chat_model);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ストレージURL: {}", config.storage_base_url.as_deref().unwrap_or("未設定"));
                println!("  画像バケット: {} (.{})", config.image_bucket, config.image_extension);
                println!("  図鑑: {}", config.catalog_path.display());
                println!("  待ち受け: {}", config.bind_address);
                println!("  トライグラム方式: {}", config.trigram_scheme);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn timeout(config: &Config) -> Duration {
    Duration::from_secs(config.timeout_seconds)
}

fn catalog_path(config: &Config, override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.catalog_path.clone())
}

fn load_catalog(config: &Config, override_path: Option<&Path>) -> Result<reef_id_common::InMemoryCatalog> {
    catalog::load_catalog(&catalog_path(config, override_path))
}

fn build_identifier<C>(
    config: &Config,
    client: Arc<dyn llm::CompletionClient>,
    catalog: Arc<C>,
) -> Result<Identifier>
where
    C: SpeciesCatalog + 'static,
{
    Ok(Identifier::new(
        client,
        catalog,
        config.image_store()?,
        config.trigram_scheme,
        config.vision_model.clone(),
        timeout(config),
    ))
}

async fn identify_file(
    identifier: &Identifier,
    path: &Path,
    max_image_size: u32,
) -> std::result::Result<identify::Identification, IdentifyError> {
    let image = EncodedImage::from_path(path, max_image_size)?;
    identifier.identify(&image).await
}

fn print_identification(
    file_name: &str,
    outcome: &std::result::Result<identify::Identification, IdentifyError>,
) {
    println!("📷 {}", file_name);
    match outcome {
        Ok(identification) => {
            println!("  モデルの回答: {}", identification.candidate_name);
            print_match(&identification.result);
        }
        Err(e) => println!("  ✖ {}", e),
    }
    println!();
}

fn print_match(result: &MatchResult) {
    let record = &result.record;
    println!("  ✔ {} ({})", record.common_name, record.scientific_name);
    println!("    ID: {}", record.id);
    println!("    信頼度: {}%", result.confidence);
    if !record.family.is_empty() {
        println!("    科: {}", record.family);
    }
    if !record.conservation_status.is_empty() {
        println!("    保全状況: {}", record.conservation_status);
    }
    if !record.depth_range.is_empty() {
        println!("    水深: {}", record.depth_range);
    }
    if !result.regions.is_empty() {
        println!("    分布: {}", result.regions.join(", "));
    }
    println!("    画像: {}", result.image_url);
}

fn identification_json(
    file_name: &str,
    outcome: std::result::Result<identify::Identification, IdentifyError>,
) -> serde_json::Value {
    match outcome {
        Ok(identification) => serde_json::json!({
            "file": file_name,
            "candidateName": identification.candidate_name,
            "species": SpeciesResponse::from(identification.result),
        }),
        Err(e) => serde_json::json!({
            "file": file_name,
            "error": e.to_string(),
        }),
    }
}
