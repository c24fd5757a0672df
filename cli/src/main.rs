use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use client::extract::{DEFAULT_MOCK_DELAY, MockExtractor};
use client::net::api::{ApiClient, ApiClientError};
use client::sink::DirectorySink;
use client::state::display::download;
use client::state::notice::Notice;
use client::state::upload::{self, DEFAULT_MAX_BYTES, ExtractionOutcome, ImageFile, UploadConfig, UploadError, Uploader};
use elements::{ElementsInput, ExtractedElement};
use serde_json::Value;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiClientError),
    #[error("upload rejected: {0}")]
    Upload(#[from] UploadError),
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("extraction was superseded")]
    Superseded,
    #[error("record {0} not found")]
    NotFound(String),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("unsupported image extension: {0}")]
    UnknownImageType(String),
    #[error("{failed} of {total} exports failed")]
    ExportFailed { failed: usize, total: usize },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "design-cli", about = "Design element extraction CLI")]
struct Cli {
    #[arg(long, env = "DESIGN_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// Store an element list for an image.
    Save {
        #[arg(long)]
        image_url: String,
        #[arg(long, help = "JSON array of elements, or - for stdin")]
        elements: String,
    },
    /// Fetch a stored record.
    Get { id: String },
    /// Run extraction on a local PNG or JPEG.
    Extract {
        image: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
        max_bytes: u64,
        #[arg(long, help = "Mock extraction delay in milliseconds [default: 2000]")]
        delay_ms: Option<u64>,
        #[arg(long, default_value_t = false)]
        save: bool,
        #[arg(long, help = "Write one export file per element into this directory")]
        out: Option<PathBuf>,
    },
    /// Download every element of a stored record as files.
    Export {
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(cli.base_url);

    let result = match cli.command {
        Command::Ping => run_ping(&api).await,
        Command::Save { image_url, elements } => run_save(&api, image_url, &elements).await,
        Command::Get { id } => run_get(&api, &id).await,
        Command::Extract { image, max_bytes, delay_ms, save, out } => {
            let delay = delay_ms.map_or(DEFAULT_MOCK_DELAY, Duration::from_millis);
            run_extract(&api, &image, max_bytes, delay, save, out.as_deref()).await
        }
        Command::Export { id, out } => run_export(&api, &id, &out).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run_ping(api: &ApiClient) -> Result<(), CliError> {
    let health = api.health().await?;
    tracing::debug!(%health, "health check");
    println!("ok");
    Ok(())
}

async fn run_save(api: &ApiClient, image_url: String, elements: &str) -> Result<(), CliError> {
    let raw = if elements == "-" { read_stdin()? } else { elements.to_owned() };
    let elements = parse_elements(&raw)?;
    let record = api.save(&ElementsInput { image_url, elements }).await?;
    print_json(&serde_json::to_value(&record)?)
}

async fn run_get(api: &ApiClient, id: &str) -> Result<(), CliError> {
    let record = api.get(id).await?.ok_or_else(|| CliError::NotFound(id.to_owned()))?;
    print_json(&serde_json::to_value(&record)?)
}

async fn run_extract(
    api: &ApiClient,
    image: &Path,
    max_bytes: u64,
    delay: Duration,
    save: bool,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let file = read_image(image)?;
    let uploader = Mutex::new(Uploader::new(UploadConfig::with_max_bytes(max_bytes)));
    let provider = MockExtractor::new(delay);

    let result = upload::process(&uploader, &provider, file).await;
    let mut uploader = uploader.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
    report_notices(&uploader.take_notices());
    if result? == ExtractionOutcome::Superseded {
        return Err(CliError::Superseded);
    }

    let state = uploader.state();
    if let upload::UploadState::Failed { message, .. } = state {
        return Err(CliError::Extraction(message.clone()));
    }
    let elements = state.elements().to_vec();

    if let Some(dir) = out {
        export_all(&elements, dir)?;
    }

    if save {
        let image_url = state.image().map(|i| i.data_url.clone()).unwrap_or_default();
        let record = api.save(&ElementsInput { image_url, elements }).await?;
        return print_json(&serde_json::to_value(&record)?);
    }
    print_json(&serde_json::to_value(&elements)?)
}

async fn run_export(api: &ApiClient, id: &str, out: &Path) -> Result<(), CliError> {
    let record = api.get(id).await?.ok_or_else(|| CliError::NotFound(id.to_owned()))?;
    export_all(&record.elements, out)
}

fn export_all(elements: &[ExtractedElement], dir: &Path) -> Result<(), CliError> {
    let mut sink = DirectorySink::new(dir);
    let notices: Vec<Notice> = elements.iter().map(|element| download(element, &mut sink)).collect();
    report_notices(&notices);

    let failed = notices.iter().filter(|n| n.is_error()).count();
    if failed > 0 {
        return Err(CliError::ExportFailed { failed, total: notices.len() });
    }
    Ok(())
}

fn report_notices(notices: &[Notice]) {
    for notice in notices {
        let marker = if notice.is_error() { "!" } else { "*" };
        eprintln!("{marker} {}: {}", notice.title, notice.description);
    }
}

fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|source| CliError::Read { path: "-".to_owned(), source })?;
    Ok(buf)
}

fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    let mime_type = mime_for(path)?;
    let bytes =
        std::fs::read(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })?;
    let file_name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(ImageFile::new(file_name, mime_type, bytes))
}

/// Declared MIME type from the file extension. Unknown extensions are passed
/// through as `application/octet-stream` so validation rejects them with the
/// usual notice.
fn mime_for(path: &Path) -> Result<&'static str, CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| CliError::UnknownImageType(path.display().to_string()))?;
    Ok(match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    })
}

fn parse_elements(raw: &str) -> Result<Vec<ExtractedElement>, CliError> {
    Ok(serde_json::from_str::<Vec<ExtractedElement>>(raw.trim())?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
