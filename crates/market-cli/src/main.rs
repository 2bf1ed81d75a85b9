// ============================================================================
// giftmarket: terminal client for the NFT gift marketplace
// ============================================================================
// Usage:
//   giftmarket home                                  Popular gifts + platform stats
//   giftmarket market [--search TEXT] [--rarity R]   Browse and filter the catalog
//   giftmarket profile                               Balance, collection, history
//   giftmarket admin                                 Catalog management listing
//   giftmarket buy <NFT_ID>                          Purchase a gift
//
// Global flags: --api-url, --user-id, --json, --verbose
// ============================================================================

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use market_core::screens::{AdminScreen, HomeScreen, MarketplaceScreen, ProfileScreen};
use market_core::{
    render, ui_state, CatalogStore, Item, MarketApiClient, MarketConfig, Page, RarityFilter, Screen,
    UiEvent, UiState,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Gift marketplace terminal client
#[derive(Parser)]
#[command(name = "giftmarket", version, about = "Browse the NFT gift marketplace from a terminal")]
struct Cli {
    /// Marketplace API base URL (default: GIFTMARKET_API_URL or the hosted function)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// User whose profile is loaded (default: GIFTMARKET_USER_ID or 1)
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// Print the screen as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Log loads and requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Popular gifts and platform statistics
    Home,

    /// Browse the catalog with optional search and rarity filter
    Market {
        /// Case-insensitive substring of the gift name
        #[arg(long, default_value = "")]
        search: String,

        /// Rarity: all, common, rare, epic, legendary (unknown values mean all)
        #[arg(long, default_value = "all")]
        rarity: String,
    },

    /// Balance, owned gifts and transaction history
    Profile,

    /// Catalog management listing
    Admin,

    /// Purchase a gift for the configured user
    Buy {
        /// Catalog id of the gift
        nft_id: i64,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,market_core=debug,giftmarket=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dotenv {
        debug!("No .env file loaded: {}", e);
    }

    let mut config = MarketConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(user_id) = cli.user_id {
        config.user_id = user_id;
    }
    config.validate()?;

    info!("Using marketplace API at {}", config.api_url);

    let store = CatalogStore::new(MarketApiClient::new(&config)?);
    store.load_all(&config.user_id).await;

    let events = match cli.command {
        Commands::Home => vec![UiEvent::Navigate(Page::Home)],
        Commands::Market { search, rarity } => vec![
            UiEvent::Navigate(Page::Marketplace),
            UiEvent::SearchChanged(search),
            UiEvent::RarityFilterChanged(RarityFilter::parse(&rarity)),
        ],
        Commands::Profile => vec![UiEvent::Navigate(Page::Profile)],
        Commands::Admin => vec![UiEvent::Navigate(Page::Admin)],
        Commands::Buy { nft_id } => {
            cmd_buy(&store, &config.user_id, nft_id).await?;
            vec![UiEvent::Navigate(Page::Profile)]
        }
    };

    let ui = ui_state::replay(&UiState::default(), events);
    let screen = render(&store.snapshot().await, &ui);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&screen)?);
        return Ok(());
    }

    match &screen {
        Screen::Home(home) => print_home(home),
        Screen::Marketplace(market) => print_marketplace(market),
        Screen::Profile(profile) => print_profile(profile),
        Screen::Admin(admin) => print_admin(admin),
    }

    Ok(())
}

async fn cmd_buy(store: &CatalogStore<MarketApiClient>, user_id: &str, nft_id: i64) -> Result<()> {
    let receipt = store.source().purchase(user_id, nft_id).await?;
    println!("{}", if receipt.message.is_empty() { "Purchase complete" } else { receipt.message.as_str() });

    if let Err(e) = store.load_user_snapshot(user_id).await {
        warn!("Purchase went through but the profile could not be refreshed: {}", e);
    }
    Ok(())
}

fn print_items(items: &[Item]) {
    println!(
        "{:<5}  {:<4}  {:<20}  {:<10}  {:>7}",
        "ID", "", "NAME", "RARITY", "PRICE"
    );
    println!("{}", "-".repeat(54));

    for item in items {
        println!(
            "{:<5}  {:<4}  {:<20}  {:<10}  {:>7}{}",
            item.id,
            item.visual_theme.emoji,
            item.name.chars().take(20).collect::<String>(),
            item.rarity.badge().label,
            item.price_in_coins,
            if item.owned_by_current_user { "  (owned)" } else { "" }
        );
    }
}

fn print_home(home: &HomeScreen) {
    println!("=== NFT Gifts Market ===");
    println!();
    println!("Popular gifts:");
    print_items(&home.popular);
    println!();
    println!("Platform stats:");
    println!("  NFTs sold:     {}", home.stats.total_sales);
    println!("  Users:         {}", home.stats.total_users);
    println!("  Gift types:    {}", home.stats.total_nfts);
    println!("  Transactions:  {}", home.stats.total_transactions);
}

fn print_marketplace(market: &MarketplaceScreen) {
    println!(
        "=== Marketplace (search: {:?}, rarity: {}) ===",
        market.search_text, market.rarity_filter
    );
    println!();

    let projection = &market.projection;
    if market.awaiting_data() {
        println!("No gifts loaded yet.");
        return;
    }
    if projection.items.is_empty() && !projection.matched_none {
        println!("The catalog is empty.");
        return;
    }
    if projection.matched_none {
        println!("Nothing found.");
        return;
    }

    print_items(&projection.items);
    println!("\nShowing {} of {} gifts", projection.items.len(), projection.source_len);
}

fn print_profile(profile: &ProfileScreen) {
    println!("=== My Profile ===");
    if !profile.loaded {
        println!("(profile not loaded; showing defaults)");
    }
    println!();
    println!("Balance:      {} coins", profile.balance);
    println!("Collection:   {} NFTs", profile.owned_count);
    println!("Gifts sent:   {}", profile.gifts_sent);
    println!();

    println!("My collection:");
    if profile.owned_items.is_empty() {
        println!("  No NFTs in the collection yet.");
    } else {
        print_items(&profile.owned_items);
    }
    println!();

    println!("Transaction history:");
    if profile.history.is_empty() {
        println!("  History is empty.");
        return;
    }
    for row in &profile.history {
        println!(
            "  {:<16}  {:<18}  {:<22}  {:>8}",
            format_timestamp(&row.created_at),
            row.label,
            row.item_caption.as_deref().unwrap_or("-"),
            row.amount.as_deref().unwrap_or("")
        );
    }
}

fn print_admin(admin: &AdminScreen) {
    println!("=== Admin Panel ===");
    println!();
    println!("Managed NFTs:");
    println!("{:<5}  {:<4}  {:<20}  {:<10}  {:>7}", "ID", "", "NAME", "RARITY", "PRICE");
    println!("{}", "-".repeat(54));
    for row in &admin.managed {
        println!(
            "{:<5}  {:<4}  {:<20}  {:<10}  {:>7}",
            row.id, row.emoji, row.name, row.rarity, row.price_in_coins
        );
    }
}
