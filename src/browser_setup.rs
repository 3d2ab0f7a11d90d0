//! Browser process lifecycle.
//!
//! Finds a system Chrome/Chromium (or downloads a managed build), launches
//! it with an isolated profile, and keeps the CDP connection driven by a
//! background handler task. The rest of the crate only ever sees the
//! resulting [`BrowserHandle`].

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use log::{debug, error, info, trace, warn};
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinHandle};

use crate::config::CrawlConfig;
use crate::error::{CrawlError, CrawlResult};

/// A launched browser plus the task driving its CDP connection.
#[derive(Debug)]
pub struct BrowserHandle {
    browser: Arc<Browser>,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
}

impl BrowserHandle {
    /// Shared browser for page visits.
    #[must_use]
    pub fn browser(&self) -> Arc<Browser> {
        Arc::clone(&self.browser)
    }

    /// Close the browser and clean up its temporary profile.
    ///
    /// Best effort throughout: a run that crawled successfully must not fail
    /// because Chrome went away uncleanly.
    pub async fn shutdown(self) {
        let BrowserHandle {
            browser,
            handler_task,
            user_data_dir,
        } = self;

        handler_task.abort();
        if let Err(e) = handler_task.await
            && !e.is_cancelled()
        {
            warn!("browser handler task failed during abort: {e}");
        }

        match Arc::try_unwrap(browser) {
            Ok(mut browser) => {
                if let Err(e) = browser.close().await {
                    warn!("failed to close browser cleanly: {e}");
                }
                let _ = browser.wait().await;
            }
            Err(browser) => {
                warn!(
                    "browser still has {} outstanding references, skipping graceful close",
                    Arc::strong_count(&browser)
                );
            }
        }

        if let Err(e) = tokio::fs::remove_dir_all(&user_data_dir).await {
            debug!(
                "failed to remove browser profile {}: {e}",
                user_data_dir.display()
            );
        }
    }
}

/// Launch the browser for a crawl run and execute the configured pre-crawl
/// hook.
///
/// Any failure here, the hook's included, is a setup failure that aborts
/// the run.
pub async fn setup_browser(config: &CrawlConfig) -> CrawlResult<BrowserHandle> {
    let headless = !config.debug();
    let (browser, handler_task, user_data_dir) = launch_browser(headless)
        .await
        .map_err(|e| CrawlError::BrowserSetup(format!("{e:#}")))?;
    let browser = Arc::new(browser);

    if let Some(hook) = config.on_launch() {
        hook(Arc::clone(&browser))
            .await
            .map_err(|e| CrawlError::LaunchHook(format!("{e:#}")))?;
    }

    Ok(BrowserHandle {
        browser,
        handler_task,
        user_data_dir,
    })
}

/// Find a Chrome/Chromium executable on the system.
///
/// Search order: the `CHROMIUM_PATH` environment variable, well-known
/// install locations, then `which` on Unix.
pub fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH points to a non-existent file: {}",
            path.display()
        );
    }

    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for candidate in candidates {
        let path = PathBuf::from(candidate);
        if path.exists() {
            info!("found browser at {}", path.display());
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    let path = PathBuf::from(found);
                    info!("found browser via 'which {cmd}': {}", path.display());
                    return Ok(path);
                }
            }
        }
    }

    Err(anyhow::anyhow!("no Chrome/Chromium executable found"))
}

/// Download a managed Chromium build into the user cache directory.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("refscrape")
        .join("chromium");
    std::fs::create_dir_all(&cache_dir).context("failed to create browser cache directory")?;

    info!("downloading managed Chromium into {}", cache_dir.display());
    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("failed to build browser fetcher options")?,
    );
    let revision = fetcher
        .fetch()
        .await
        .context("failed to download managed Chromium")?;

    Ok(revision.executable_path)
}

/// Launch Chrome with an isolated temporary profile and spawn the handler
/// task that drives the CDP connection.
async fn launch_browser(headless: bool) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let chrome_path = match find_browser_executable() {
        Ok(path) => path,
        Err(_) => download_managed_browser().await?,
    };

    let user_data_dir =
        std::env::temp_dir().join(format!("refscrape_chrome_{}", std::process::id()));
    std::fs::create_dir_all(&user_data_dir).context("failed to create browser profile dir")?;

    let mut config_builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1280, 1024)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path)
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-notifications")
        .arg("--disable-background-networking")
        .arg("--hide-scrollbars")
        .arg("--mute-audio");

    config_builder = if headless {
        config_builder.headless_mode(HeadlessMode::default())
    } else {
        config_builder.with_head()
    };

    let browser_config = config_builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let msg = e.to_string();
                // Chrome emits CDP events chromiumoxide doesn't model; those
                // deserialization misses are noise, not failures.
                // See mattsse/chromiumoxide#167 and #229.
                let benign = msg.contains("data did not match any variant of untagged enum Message")
                    || msg.contains("Failed to deserialize WS response");
                if benign {
                    trace!("suppressed benign CDP error: {msg}");
                } else {
                    error!("browser handler error: {e:?}");
                }
            }
        }
        debug!("browser handler task finished");
    });

    Ok((browser, handler_task, user_data_dir))
}
