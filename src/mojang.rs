//! Mojang API integration.
//!
//! Used by whitelisting to confirm a Minecraft account exists and to store
//! its canonical username capitalisation.

use serde::Deserialize;
use crate::error::{NamelessBotError, Result};

/// Public Mojang API host.
pub const MOJANG_API_BASE: &str = "https://api.mojang.com";

/// Player profile information from Mojang API.
#[derive(Deserialize, Debug, Clone)]
pub struct MojangProfile {
    /// Player UUID (without dashes)
    pub id: String,
    /// Current player username
    pub name: String,
}

/// Fetch a player profile from the Mojang API.
///
/// # Returns
///
/// Returns `Some(profile)` if the player exists, `None` if not found.
///
/// # Errors
///
/// Returns an error if the API request fails or returns an unexpected status code.
///
/// # Examples
///
/// ```no_run
/// use nameless_bot::mojang::fetch_profile;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = reqwest::Client::new();
/// if let Some(p) = fetch_profile(&client, "Notch").await? {
///     println!("UUID: {}, Name: {}", p.id, p.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_profile(client: &reqwest::Client, name: &str) -> Result<Option<MojangProfile>> {
    fetch_profile_from(client, MOJANG_API_BASE, name).await
}

/// Same as [`fetch_profile`] against an arbitrary API host.
pub async fn fetch_profile_from(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> Result<Option<MojangProfile>> {
    let url = format!("{}/users/profiles/minecraft/{}", base_url.trim_end_matches('/'), name);
    let resp = client.get(&url).send().await?;

    // Mojang answers unknown names with 204 or 404 depending on the endpoint version.
    match resp.status().as_u16() {
        204 | 404 => Ok(None),
        _ if resp.status().is_success() => {
            let body = resp.text().await?;
            Ok(Some(serde_json::from_str::<MojangProfile>(&body)?))
        }
        _ => Err(NamelessBotError::MojangApi(
            format!("API returned error: {}", resp.status())
        )),
    }
}
