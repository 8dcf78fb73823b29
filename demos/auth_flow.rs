/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 4/9/24
 ******************************************************************************/
use anyhow::{Context, Result};
use photo_feed_client::application::events::{Notification, NotificationCenter};
use photo_feed_client::application::services::{
    FeedService, FeedServiceImpl, PageFetch, ProfileService, ProfileServiceImpl,
};
use photo_feed_client::config::Config;
use photo_feed_client::session::{
    AuthHelper, NoBrowserData, OAuth2Service, OAuthAuthenticator, ProfileLogoutService,
};
use photo_feed_client::storage::{FileStorage, TokenStore};
use photo_feed_client::transport::ReqwestHttpClient;
use photo_feed_client::utils::logger::setup_logger;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

// Usage: auth_flow [--logout]
// Without a stored token, prints the authorization URL and reads either the
// code or the full redirect URL from stdin.
#[tokio::main]
async fn main() -> Result<()> {
    setup_logger();

    let config = Arc::new(Config::new());
    info!("Configuration: {}", config);

    let client = Arc::new(ReqwestHttpClient::new(&config.rest_api)?);
    let token_store = TokenStore::new(Arc::new(FileStorage::new(&config.storage.token_file)));
    let notifications = NotificationCenter::new();

    if !token_store.is_authorized() {
        let helper = AuthHelper::new(config.clone());
        println!("Open this URL and authorize the app:\n{}", helper.auth_url()?);
        print!("Paste the code or the redirect URL: ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let line = line.trim();
        let code = helper
            .code_from_url(line)
            .unwrap_or_else(|| line.to_string());

        let oauth = OAuth2Service::new(config.clone(), client.clone(), token_store.clone());
        oauth
            .fetch_oauth_token(&code)
            .await
            .context("token exchange failed")?;
        println!("Signed in");
    }

    let profile_service = Arc::new(ProfileServiceImpl::new(
        config.clone(),
        client.clone(),
        token_store.clone(),
        notifications.clone(),
    ));
    let feed = Arc::new(FeedServiceImpl::new(
        config.clone(),
        client.clone(),
        token_store.clone(),
        notifications.clone(),
    ));

    let mut events = notifications.subscribe();

    let profile = profile_service.fetch_profile().await?;
    println!("{} ({})", profile.name, profile.login_name);
    if let Some(bio) = &profile.bio {
        println!("  {bio}");
    }

    if let PageFetch::Loaded { page, count } = feed.fetch_next_page().await? {
        println!("Page {page}: {count} photos");
    }
    for photo in feed.photos() {
        let liked = if photo.is_liked { "liked" } else { "" };
        println!(
            "  {} {}x{} {} {}",
            photo.id, photo.size.width, photo.size.height, photo.thumb_image_url, liked
        );
    }

    while let Some(event) = events.try_recv() {
        match event {
            Notification::AvatarChanged(url) => println!("Avatar: {url}"),
            other => info!("Event: {:?}", other),
        }
    }
    events.unsubscribe();

    if std::env::args().any(|arg| arg == "--logout") {
        let logout = ProfileLogoutService::new(
            config,
            Arc::new(NoBrowserData),
            token_store,
            profile_service,
            feed,
            notifications,
        );
        let report = logout.logout().await;
        for (step, error) in &report.failures {
            eprintln!("Logout step '{step}' failed: {error}");
        }
        println!("Signed out");
    }

    Ok(())
}
