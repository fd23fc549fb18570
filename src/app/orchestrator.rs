//! Top-level wiring of the two run modes.
//!
//! Console mode prints the roster report to stdout and then monitors new
//! matches on the console. Bot mode serves chat commands and, when a
//! notification chat is configured, monitors in the background.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use super::config::Config;
use super::monitor::ChangeMonitor;
use super::report::console_report;
use super::roster::Roster;
use crate::adapter::notifier::{ConsoleNotifier, DeliveryNotifier};
use crate::adapter::opendota::{OpenDotaClient, RateLimiter};
use crate::adapter::telegram::{CommandContext, CommandRegistry, DispatchSettings, Dispatcher};
use crate::domain::HeroCatalog;
use crate::error::Result;
use crate::port::{ChatId, Delivery, StatsProvider};

/// Command-line choices that are not part of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub roster: PathBuf,
    /// Exit after the console report instead of monitoring.
    pub once: bool,
}

/// Loaded state shared by both modes.
#[derive(Clone)]
pub struct Services {
    pub provider: Arc<dyn StatsProvider>,
    pub heroes: Arc<HeroCatalog>,
    pub roster: Roster,
}

/// Main application struct.
pub struct App;

impl App {
    /// Load the roster and hero catalog, then run the mode selected by the
    /// presence of a bot token.
    pub async fn run(config: Config, options: RunOptions) -> Result<()> {
        let roster = Roster::load(&options.roster)?;
        info!(
            path = %options.roster.display(),
            accounts = roster.len(),
            "Roster loaded"
        );

        let limiter = Arc::new(RateLimiter::new(
            config.opendota.rate_limit,
            config.opendota.rate_window(),
        ));
        let provider: Arc<dyn StatsProvider> = Arc::new(OpenDotaClient::new(
            config.opendota.base_url.clone(),
            config.opendota.request_timeout(),
            limiter,
        ));
        let heroes = Arc::new(provider.heroes().await?);
        info!(heroes = heroes.len(), "Hero catalog loaded");

        let services = Services {
            provider,
            heroes,
            roster,
        };

        match config.telegram.bot_token.clone() {
            Some(token) => Self::run_telegram(&config, &token, services).await,
            None => Self::console(&config, services, options.once).await,
        }
    }

    /// Print the report; unless `once`, keep monitoring on the console.
    pub async fn console(config: &Config, services: Services, once: bool) -> Result<()> {
        let report = console_report(
            services.provider.as_ref(),
            &services.roster,
            &services.heroes,
            &Local,
            &config.report,
        )
        .await?;
        print!("{report}");

        if once {
            return Ok(());
        }

        ChangeMonitor::new(
            services.provider,
            services.heroes,
            services.roster,
            Arc::new(ConsoleNotifier::stdout()),
        )
        .with_interval(config.monitor.interval())
        .run()
        .await;
        Ok(())
    }

    #[cfg(feature = "telegram")]
    async fn run_telegram(config: &Config, token: &str, services: Services) -> Result<()> {
        use crate::adapter::telegram::TelegramDelivery;

        let delivery = Arc::new(TelegramDelivery::new(token, config.telegram.poll_timeout()));
        let registry = CommandRegistry::standard(config.commands.teammate_source);
        if config.telegram.register_commands {
            if let Err(e) = delivery.register_commands(&registry.menu()).await {
                warn!(error = %e, "Failed to register bot commands with Telegram");
            }
        }

        let notify_chat = match config.telegram.notify_chat() {
            Ok(chat) => chat,
            Err(e) => {
                warn!(error = %e, "Match notifications disabled");
                None
            }
        };
        Self::bot(config, services, delivery, registry, notify_chat).await
    }

    #[cfg(not(feature = "telegram"))]
    async fn run_telegram(_config: &Config, _token: &str, _services: Services) -> Result<()> {
        Err(crate::error::ConfigError::InvalidValue {
            field: super::config::BOT_TOKEN_ENV,
            reason: "bot mode requires the `telegram` feature".into(),
        }
        .into())
    }

    /// Serve commands over `delivery` until a fatal delivery error.
    ///
    /// With `notify_chat` set, a background monitor reports new matches there.
    pub async fn bot(
        config: &Config,
        services: Services,
        delivery: Arc<dyn Delivery>,
        registry: CommandRegistry,
        notify_chat: Option<ChatId>,
    ) -> Result<()> {
        if let Some(chat) = notify_chat {
            let notifier = Arc::new(DeliveryNotifier::new(delivery.clone(), chat));
            let monitor = ChangeMonitor::new(
                services.provider.clone(),
                services.heroes.clone(),
                services.roster.clone(),
                notifier,
            )
            .with_interval(config.monitor.interval());
            tokio::spawn(monitor.run());
            info!(chat_id = %chat, "Match notifications enabled");
        }

        let context = CommandContext {
            provider: services.provider,
            roster: Arc::new(services.roster),
            heroes: services.heroes,
            settings: config.report,
        };
        let settings = DispatchSettings {
            poll_timeout: config.telegram.poll_timeout(),
            retry_delay: config.telegram.retry_delay(),
            max_message_len: config.telegram.max_message_len,
        };
        Dispatcher::new(delivery, registry, context, settings)
            .run()
            .await?;
        Ok(())
    }
}
