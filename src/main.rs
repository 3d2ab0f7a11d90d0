//! Crawl a Moodle course site for OSIS scripture references.
//!
//! All configuration is static; the binary takes no flags. Credentials for
//! the optional login hook come from the `BFA_USERNAME` and `BFA_PASSWORD`
//! environment variables. Exit code 0 on completion, 1 on setup failure.

use chromiumoxide::browser::Browser;
use std::sync::Arc;

use refscrape::CrawlConfig;

async fn login(browser: Arc<Browser>) -> anyhow::Result<()> {
    let (Ok(username), Ok(password)) = (
        std::env::var("BFA_USERNAME"),
        std::env::var("BFA_PASSWORD"),
    ) else {
        log::info!("BFA_USERNAME/BFA_PASSWORD not set, crawling without login");
        return Ok(());
    };

    let page = browser
        .new_page("https://kurs.bibel-fuer-alle.net/login/index.php")
        .await?;
    page.find_element("#username")
        .await?
        .click()
        .await?
        .type_str(&username)
        .await?;
    page.find_element("#password")
        .await?
        .click()
        .await?
        .type_str(&password)
        .await?
        .press_key("Enter")
        .await?;
    page.wait_for_navigation().await?;
    page.close().await?;
    Ok(())
}

fn build_config() -> refscrape::CrawlResult<CrawlConfig> {
    CrawlConfig::builder()
        .url("https://kurs.bibel-fuer-alle.net/mod/page/view.php?id=122")
        .scraping_whitelist(vec![
            "https://kurs.bibel-fuer-alle.net/mod/page/view.php".to_string(),
        ])
        .crawling_whitelist(vec![
            "https://kurs.bibel-fuer-alle.net/course/view.php".to_string(),
        ])
        .query_param_whitelist(vec!["id".to_string()])
        .on_launch(login)
        .concurrency(5)
        .debug(false)
        .build()
}

#[tokio::main]
async fn main() {
    let config = match build_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let default_filter = if config.debug() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match refscrape::crawl(config).await {
        Ok(()) => println!("Crawling finished successfully"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
