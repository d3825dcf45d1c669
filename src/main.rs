use clap::Parser;
use linkhop::{crawler::Crawler, types::CrawlOptions};
use log::debug;
use signal_hook::consts::{SIGINT, SIGTERM};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Single-hop browser crawler", long_about = None)]
struct Args {
    /// Page whose links will be crawled
    url: String,
    /// CSS selector whose anchor descendants are collected (every anchor when empty)
    #[arg(short = 'l', long, default_value = "")]
    link_selector: String,
    /// CSS selector restricting the fetched markup to one element
    #[arg(short = 'c', long)]
    content_selector: Option<String>,
    /// Only keep links that start with the base URL
    #[arg(long, default_value_t = false)]
    site_restricted: bool,
    /// Only keep links on the root page's host
    #[arg(long, default_value_t = false)]
    domain_restricted: bool,
    /// Base URL for relative links, defaults to scheme://host of the crawled URL
    #[arg(short = 'b', long)]
    base_url: Option<String>,
    /// Time in milliseconds to wait after navigating to a page
    #[arg(long, default_value_t = 1000)]
    initial_wait_ms: u64,
    /// Time in milliseconds between readiness probes
    #[arg(long, default_value_t = 100)]
    retry_wait_ms: u64,
    /// Maximum time in milliseconds to wait for a page to finish loading
    #[arg(long, default_value_t = 30_000)]
    load_timeout_ms: u64,
    /// Print the crawl result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    debug!("starting crawl with {:#?}", args.clone());

    let options = CrawlOptions::default_builder()
        .link_selector(args.link_selector)
        .content_selector(args.content_selector)
        .site_restricted(args.site_restricted)
        .domain_restricted(args.domain_restricted)
        .base_url(args.base_url)
        .initial_wait_ms(args.initial_wait_ms)
        .retry_wait_ms(args.retry_wait_ms)
        .load_timeout_ms(args.load_timeout_ms)
        .build()?;

    let crawler = Crawler::new(options);

    let should_terminate = crawler.termination_flag();
    signal_hook::flag::register(SIGTERM, should_terminate.clone())?;
    signal_hook::flag::register(SIGINT, should_terminate)?;

    let result = crawler.crawl(&args.url).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{result:#?}");
    }

    Ok(())
}
