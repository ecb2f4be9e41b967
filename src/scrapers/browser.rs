use crate::scrapers::traits::PageSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Time given to client-side rendering after navigation
const PAGE_SETTLE: Duration = Duration::from_secs(5);

/// Some popups only appear once another has been closed
const POPUP_PASSES: usize = 3;
const POPUP_PASS_GAP: Duration = Duration::from_millis(500);

/// Cookie banners and modals seen on Turkish ticketing sites
const DISMISS_POPUPS_JS: &str = r#"
(() => {
    const selectors = [
        '#onetrust-accept-btn-handler',
        '.onetrust-close-btn-handler',
        '.cc-btn.cc-dismiss',
        '.cc-allow',
        'button[class*="cookie"][class*="accept"]',
        'button[class*="cookie"][class*="kabul"]',
        '[aria-label="Close"]',
        '[aria-label="Kapat"]',
        '.modal-close',
        '.popup-close',
        '.btn-close'
    ];
    let clicked = 0;
    for (const sel of selectors) {
        const el = document.querySelector(sel);
        if (el && el.offsetParent !== null) { el.click(); clicked++; }
    }
    const labels = ['Kabul Et', 'Kabul Ediyorum', 'Tamam', 'Anladım', 'Kapat'];
    for (const btn of document.querySelectorAll('button')) {
        const text = (btn.textContent || '').trim();
        if (labels.some(l => text.includes(l))) { btn.click(); clicked++; }
    }
    return clicked;
})()
"#;

/// Scrolls in steps so lazy-loaded cards get rendered
const AUTO_SCROLL_JS: &str = r#"
new Promise((resolve) => {
    let total = 0;
    const timer = setInterval(() => {
        window.scrollBy(0, 400);
        total += 400;
        if (total >= document.body.scrollHeight - window.innerHeight || total > 15000) {
            clearInterval(timer);
            resolve(total);
        }
    }, 100);
})
"#;

/// Browser-based page source using headless Chrome
pub struct BrowserPageSource {
    browser: Browser,
}

impl BrowserPageSource {
    /// Launch a headless Chrome instance
    pub fn new() -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser })
    }
}

fn render(browser: &Browser, url: &str) -> Result<String> {
    let tab = browser.new_tab()?;

    tab.navigate_to(url)?;
    tab.wait_until_navigated()?;

    debug!("Waiting for {} to render...", url);
    thread::sleep(PAGE_SETTLE);

    for pass in 1..=POPUP_PASSES {
        match tab.evaluate(DISMISS_POPUPS_JS, false) {
            Ok(result) => debug!("Popup pass {}: dismissed {:?}", pass, result.value),
            Err(e) => debug!("Popup pass {} skipped: {}", pass, e),
        }
        thread::sleep(POPUP_PASS_GAP);
    }

    if let Err(e) = tab.evaluate(AUTO_SCROLL_JS, true) {
        warn!("Auto-scroll failed on {}: {}", url, e);
    }
    thread::sleep(Duration::from_secs(1));

    let html_result = tab.evaluate("document.documentElement.outerHTML", false)?;
    let html = match html_result.value {
        Some(value) => value.as_str().unwrap_or("").to_string(),
        None => {
            warn!("Could not get HTML from {}", url);
            String::new()
        }
    };

    if let Err(e) = tab.close(true) {
        debug!("Failed to close tab: {}", e);
    }

    info!("Rendered {} ({} bytes)", url, html.len());
    Ok(html)
}

#[async_trait]
impl PageSource for BrowserPageSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let browser = self.browser.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || render(&browser, &url))
            .await
            .context("Browser task panicked")?
    }

    fn source_name(&self) -> &'static str {
        "headless-chrome"
    }
}
