mod account;
mod app;
mod config;
mod content;
mod feed;
mod nav;
mod pricing;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    style::Stylize,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use content::{Block, Run};
use pricing::Product;

#[derive(Parser, Debug)]
#[command(name = "postern")]
#[command(version = "0.1.0")]
#[command(about = "A terminal client for the Postern proxy platform: blog, pricing, user admin")]
struct Args {
    /// Print the blog feed as JSON (for scripts)
    #[arg(long)]
    json: bool,

    /// Render one post to stdout and exit
    #[arg(long, value_name = "ID")]
    post: Option<u64>,

    /// Print the pricing tables and exit
    #[arg(long)]
    plans: bool,

    /// Load the feed from this URL instead of the configured one
    #[arg(long, value_name = "URL")]
    feed_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = args.feed_url {
        // One-shot override, never written back
        config.feed_url = url;
    }

    // Handle CLI-only commands
    if args.json {
        return print_feed(&config).await;
    }

    if let Some(id) = args.post {
        return print_post(&config, id).await;
    }

    if args.plans {
        return print_plans();
    }

    // Run TUI
    run_tui(config).await
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

async fn print_feed(config: &AppConfig) -> Result<()> {
    let client = http_client()?;
    let posts = feed::fetch_posts(&client, &config.feed_url).await?;
    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}

async fn print_post(config: &AppConfig, id: u64) -> Result<()> {
    let client = http_client()?;
    let posts = feed::fetch_posts(&client, &config.feed_url).await?;
    let post = feed::find_post(&posts, id)?;

    println!("{}", post.display_title().bold());
    println!(
        "{} │ {} │ {}",
        post.display_category(),
        post.display_date(),
        post.display_read_time()
    );
    if !post.tags.is_empty() {
        println!("{}", post.tags.join(", "));
    }
    println!();

    match &post.content {
        Some(content) => print_blocks(&content::parse_blocks(content)),
        None => println!("{}", post.excerpt),
    }
    Ok(())
}

fn print_blocks(blocks: &[Block]) {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match block {
            Block::Heading(_, runs) => println!("{}", render_runs(runs).bold()),
            Block::Bullets(items) => {
                for item in items {
                    println!("  • {}", render_runs(item));
                }
            }
            Block::Paragraph(runs) => println!("{}", render_runs(runs)),
        }
    }
}

fn render_runs(runs: &[Run]) -> String {
    runs.iter()
        .map(|run| match run {
            Run::Plain(text) => text.clone(),
            Run::Bold(text) => text.as_str().bold().to_string(),
            Run::Italic(text) => text.as_str().italic().to_string(),
        })
        .collect()
}

fn print_plans() -> Result<()> {
    for product in Product::ALL {
        println!("{} {}", product.icon(), product.label().bold());
        for tier in product.tiers() {
            let badge = match tier.badge {
                Some(badge) => format!("  [{}]", badge),
                None => String::new(),
            };
            println!(
                "  {:<22} {:>15} / GB   {:<14} {}{}",
                tier.name,
                tier.price_per_gb,
                tier.traffic_limit,
                tier.action(),
                badge
            );
        }
        println!();
    }

    println!("Included with every plan:");
    for (title, detail) in pricing::PERKS {
        println!("  ✓ {}: {}", title, detail);
    }
    Ok(())
}

async fn run_tui(config: AppConfig) -> Result<()> {
    ui::init_theme(theme::Theme::from_config(&config));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config).await?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key).await {
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        app.tick();
    }
}
