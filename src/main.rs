use anyhow::{bail, Context, Result};
use background_service::{MonitorTarget, TrendMonitor};
use clap::{Parser, Subcommand};
use content_engine::{BusinessMode, GrowthMode, Studio};
use database::{KeyValueStore, SqliteStore};
use llm_interface::{Backends, GeminiBackend, UnsupportedBackend};
use socialarch_core::{
    AppConfig, ContentIdea, GeneratorRequest, ImageAttachment, LlmSource, Outcome, Platform,
    Settings, TrendCategory, TrendItem,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "social_arch=info,content_engine=info,llm_interface=info";
const VERBOSE_LOG_FILTER: &str = "social_arch=debug,content_engine=debug,llm_interface=debug,background_service=debug,database=debug";

#[derive(Parser)]
#[command(name = "social-arch")]
#[command(about = "Content assistant for 3D artists: posts, hooks, trends and critiques")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging for all crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a post for one platform
    Post {
        topic: String,
        #[arg(short, long, default_value = "Instagram")]
        platform: Platform,
        /// Let the model research current facts first
        #[arg(long)]
        search: bool,
    },

    /// One provocative hook for a platform
    Hook {
        #[arg(default_value = "Instagram")]
        platform: Platform,
    },

    /// A batch of content ideas across platforms
    Ideas {
        #[arg(required = true)]
        platforms: Vec<Platform>,
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
        /// Also write a post from the first idea
        #[arg(long)]
        draft: bool,
    },

    /// Live trend scan
    Trends {
        #[arg(default_value = "general")]
        category: TrendCategory,
        /// Also write a post from the first trend
        #[arg(long)]
        draft: bool,
    },

    /// Art-director critique of a render
    Critique { image: PathBuf },

    /// Translate text, defaulting to the configured language
    Translate {
        text: String,
        #[arg(short, long, default_value = "")]
        language: String,
    },

    /// Viral-potential review of a draft post
    Review {
        text: String,
        #[arg(short, long, default_value = "Instagram")]
        platform: Platform,
    },

    /// Pricing, contract or client-chat consultation
    Business {
        input: String,
        #[arg(short, long, default_value = "pricing")]
        mode: BusinessMode,
    },

    /// Career mentoring or competitor analysis
    Growth {
        input: String,
        #[arg(short, long, default_value = "mentor")]
        mode: GrowthMode,
    },

    /// Re-scan trends periodically until interrupted
    Monitor {
        #[arg(default_value = "general")]
        category: TrendCategory,
        /// Minutes between scans; overrides the configuration
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Show or change the stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    /// Writing style used in every prompt
    Style { text: String },
    /// Global target language
    Language { language: String },
    /// Per-platform output language
    PlatformLanguage { platform: Platform, language: String },
    /// Model source: cloud, local or custom
    Source { source: LlmSource },
    /// Restore the default per-platform languages, keeping everything else
    ResetLanguages,
    /// Restore all defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let store = SqliteStore::connect(&config.storage.database_url)
        .await
        .context("Failed to open the settings store")?;

    let result = run(cli.command, &config, &store).await;
    store.close().await;
    result
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the Gemini client only when settings route calls to it, so the
/// local and custom sources reach their advisory without an API key.
fn studio(config: &AppConfig, settings: &Settings) -> Result<Studio> {
    if settings.llm_source != LlmSource::CloudGemini {
        tracing::debug!("{} selected, skipping Gemini setup", settings.llm_source);
        let cloud = Arc::new(UnsupportedBackend::new(LlmSource::CloudGemini));
        return Ok(Studio::new(Backends::hosted(cloud)));
    }
    let gemini = GeminiBackend::from_config(&config.gemini)
        .context("Gemini backend is not configured")?;
    tracing::debug!("Using model {}", gemini.model());
    Ok(Studio::hosted(Arc::new(gemini)))
}

async fn run(command: Commands, config: &AppConfig, store: &SqliteStore) -> Result<()> {
    let settings = database::load_settings(store).await?;

    match command {
        Commands::Settings(command) => run_settings(command, settings, store).await,
        Commands::Post {
            topic,
            platform,
            search,
        } => {
            let request = GeneratorRequest::new(topic, platform).with_search(search);
            print_text(studio(config, &settings)?.generate_post(&settings, &request).await);
            Ok(())
        }
        Commands::Hook { platform } => {
            print_text(studio(config, &settings)?.generate_hook(&settings, platform).await);
            Ok(())
        }
        Commands::Ideas {
            platforms,
            count,
            draft,
        } => {
            let studio = studio(config, &settings)?;
            let ideas = studio.generate_ideas(&settings, &platforms, count).await;
            println!("{}", serde_json::to_string_pretty(ideas.value())?);
            if draft {
                let request = ideas.is_fresh().then(|| ideas.value().first()).flatten();
                write_draft(&studio, &settings, request.map(ContentIdea::to_request)).await;
            }
            Ok(())
        }
        Commands::Trends { category, draft } => {
            let studio = studio(config, &settings)?;
            let trends = studio.scan_trends(&settings, category).await;
            println!("{}", serde_json::to_string_pretty(trends.value())?);
            if trends.is_fresh() {
                database::save_trends(store, trends.value()).await?;
            }
            if draft {
                let request = trends.is_fresh().then(|| trends.value().first()).flatten();
                write_draft(&studio, &settings, request.map(TrendItem::to_request)).await;
            }
            Ok(())
        }
        Commands::Critique { image } => {
            let attachment = read_image(&image).await?;
            print_text(studio(config, &settings)?.critique_image(&settings, &attachment).await);
            Ok(())
        }
        Commands::Translate { text, language } => {
            print_text(studio(config, &settings)?.translate(&settings, &text, &language).await);
            Ok(())
        }
        Commands::Review { text, platform } => {
            print_text(studio(config, &settings)?.review_post(&settings, &text, platform).await);
            Ok(())
        }
        Commands::Business { input, mode } => {
            print_text(studio(config, &settings)?.business_advice(&settings, &input, mode).await);
            Ok(())
        }
        Commands::Growth { input, mode } => {
            print_text(studio(config, &settings)?.growth_advice(&settings, &input, mode).await);
            Ok(())
        }
        Commands::Monitor { category, interval } => {
            let minutes = interval.unwrap_or(config.monitor.interval_minutes);
            if minutes == 0 {
                bail!("Monitor interval must be at least one minute");
            }
            run_monitor(studio(config, &settings)?, settings, category, minutes, store).await
        }
    }
}

async fn run_monitor(
    studio: Studio,
    settings: Settings,
    category: TrendCategory,
    minutes: u64,
    store: &SqliteStore,
) -> Result<()> {
    let monitor = TrendMonitor::new(Arc::new(studio), minutes);
    let (handle, mut reports) = monitor.spawn(MonitorTarget::new(settings, category));
    tracing::info!("Monitoring {} trends every {} min, Ctrl+C to stop", category, minutes);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            report = reports.recv() => {
                let Some(report) = report else { break };
                println!(
                    "[{}] {}",
                    report.scanned_at.format("%Y-%m-%d %H:%M:%S"),
                    report.category
                );
                println!("{}", serde_json::to_string_pretty(report.outcome.value())?);
                if report.outcome.is_fresh() {
                    database::save_trends(store, report.outcome.value()).await?;
                }
            }
        }
    }

    handle.stop().await?;
    Ok(())
}

async fn run_settings(
    command: SettingsCommand,
    mut settings: Settings,
    store: &dyn KeyValueStore,
) -> Result<()> {
    let changed = !matches!(command, SettingsCommand::Show);
    match command {
        SettingsCommand::Show => {}
        SettingsCommand::Style { text } => settings.user_style = text,
        SettingsCommand::Language { language } => settings.target_language = language,
        SettingsCommand::PlatformLanguage { platform, language } => {
            settings.set_platform_language(platform, language)
        }
        SettingsCommand::Source { source } => {
            if source != LlmSource::CloudGemini {
                tracing::warn!("{} is not available in this build; calls will return an advisory", source);
            }
            settings.llm_source = source;
        }
        SettingsCommand::ResetLanguages => settings.reset_platform_languages(),
        SettingsCommand::Reset => settings = Settings::default(),
    }

    if changed {
        database::save_settings(store, &settings).await?;
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

async fn write_draft(studio: &Studio, settings: &Settings, request: Option<GeneratorRequest>) {
    match request {
        Some(request) => {
            println!("\n--- Draft for {} ---", request.platform);
            print_text(studio.generate_post(settings, &request).await);
        }
        None => tracing::warn!("Nothing to draft from; the batch came back degraded"),
    }
}

fn print_text(outcome: Outcome<String>) {
    if let Some(error) = outcome.error() {
        tracing::debug!("Showing fallback text after: {}", error);
    }
    println!("{}", outcome.into_inner());
}

async fn read_image(path: &Path) -> Result<ImageAttachment> {
    let mime_type = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => bail!("Unsupported image type: {}", path.display()),
    };
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ImageAttachment::from_bytes(mime_type, &bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialarch_core::UNSUPPORTED_BACKEND_MESSAGE;

    fn keyless_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.gemini.api_key_env = "SOCIAL_ARCH_TEST_UNSET_KEY".to_string();
        config
    }

    #[tokio::test]
    async fn test_local_source_needs_no_api_key() {
        let settings = Settings {
            llm_source: LlmSource::Local,
            ..Settings::default()
        };
        let studio = studio(&keyless_config(), &settings).unwrap();

        let request = GeneratorRequest::new("Blender 5 release", Platform::Telegram);
        let outcome = studio.generate_post(&settings, &request).await;

        assert!(outcome.is_degraded());
        assert_eq!(outcome.value(), UNSUPPORTED_BACKEND_MESSAGE);
    }

    #[tokio::test]
    async fn test_custom_source_translate_shows_advisory() {
        let settings = Settings {
            llm_source: LlmSource::CustomApi,
            ..Settings::default()
        };
        let studio = studio(&keyless_config(), &settings).unwrap();

        let outcome = studio.translate(&settings, "Привет", "English").await;
        assert_eq!(outcome.value(), UNSUPPORTED_BACKEND_MESSAGE);
    }
}
