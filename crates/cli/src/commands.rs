use std::str::FromStr;

use rental_furnish_core::models::category::FurnitureCategory;
use rental_furnish_core::models::furniture::Furniture;
use rental_furnish_core::models::preferences::{ApartmentSize, ProfilePreferences};
use rental_furnish_core::models::recommendation::{RecommendationRequest, StyleAssessmentRequest};
use rental_furnish_core::RentalFurnish;
use serde_json::json;

use crate::errors::{CliError, Result};
use crate::photo::load_photo;
use crate::session_store::SessionStore;
use crate::Command;

pub async fn dispatch(
    client: &mut RentalFurnish,
    store: &mut SessionStore,
    command: Command,
    json: bool,
) -> Result<()> {
    match command {
        Command::Login { email } => login(client, store, &email).await,
        Command::Logout => logout(store),
        Command::Furniture { category } => furniture(client, store, category.as_deref(), json).await,
        Command::AssessStyle { photo } => {
            let request = StyleAssessmentRequest {
                photo_data_uri: load_photo(&photo)?,
            };
            let assessment = client.assess_style(&request).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                println!("Style assessment\n\n{}\n", assessment.style_assessment);
                println!("Furniture recommendations\n\n{}", assessment.furniture_recommendations);
            }
            Ok(())
        }
        Command::Recommend {
            preferences,
            budget,
            size,
            photo,
        } => {
            let request = RecommendationRequest {
                rental_preferences: preferences,
                budget,
                apartment_size: parse_size(&size)?,
                photo_data_uri: photo.as_deref().map(load_photo).transpose()?,
            };
            let recommendations = client.generate_recommendations(&request).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recommendations)?);
            } else {
                println!("{}", recommendations.furniture_recommendations);
            }
            Ok(())
        }
        signed_in => {
            if !store.restore(client)? {
                return Err(CliError::Usage(
                    "not signed in; run `rental-furnish login --email <EMAIL>` first".into(),
                ));
            }
            let outcome = run_signed_in(client, signed_in, json).await;
            if let Err(CliError::Core(e)) = &outcome {
                if e.is_unauthorized() {
                    tracing::warn!("stored session was rejected, removing it");
                    store.clear()?;
                }
            }
            outcome
        }
    }
}

async fn run_signed_in(client: &RentalFurnish, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Whoami => {
            let user = client.current_user().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else if user.name.is_empty() {
                println!("{}", user.email);
            } else {
                println!("{} <{}>", user.name, user.email);
            }
        }
        Command::Buy {
            furniture_id,
            quantity,
        } => {
            let receipt = client.checkout(&furniture_id, quantity).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!(
                    "{}",
                    receipt.message().unwrap_or("Payment processed successfully.")
                );
            }
        }
        Command::Preferences { text, budget, size } => {
            let preferences = ProfilePreferences::new(text, budget, parse_size(&size)?);
            client.save_preferences(&preferences).await?;
            if json {
                println!("{}", json!({ "saved": true }));
            } else {
                println!("Preferences saved.");
            }
        }
        Command::Dashboard => {
            let dashboard = client.dashboard().await?;
            let report = client.dashboard_report(&dashboard);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "metrics": dashboard.metrics,
                        "report": report,
                    }))?
                );
            } else {
                print!("{}", client.render_dashboard(&report));
            }
        }
        other => {
            return Err(CliError::Usage(format!("{other:?} does not need a session")));
        }
    }
    Ok(())
}

async fn login(client: &mut RentalFurnish, store: &mut SessionStore, email: &str) -> Result<()> {
    let password = rpassword::prompt_password("Password: ").map_err(CliError::Prompt)?;
    let session = client.login(email, &password).await?;
    println!("Signed in as {}", session.email);
    store.save(client)?;
    println!("Session stored in {}", store.path().display());
    Ok(())
}

fn logout(store: &SessionStore) -> Result<()> {
    if store.clear()? {
        println!("Signed out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

async fn furniture(
    client: &mut RentalFurnish,
    store: &mut SessionStore,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let filter = category
        .map(FurnitureCategory::from_str)
        .transpose()
        .map_err(CliError::Usage)?;

    // The catalog is public; a stored session only adds the bearer token.
    if store.exists() {
        if let Err(e) = store.restore(client) {
            tracing::warn!(error = %e, "ignoring stored session");
        }
    }

    let items = client.list_furniture(filter.as_ref()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No furniture found.");
    } else {
        for item in &items {
            println!("{}", catalog_line(item));
        }
    }
    Ok(())
}

fn catalog_line(item: &Furniture) -> String {
    let stock = if item.in_stock() {
        format!("{} in stock", item.quantity)
    } else {
        "out of stock".to_string()
    };
    format!(
        "{:<26} {:<30} {:<12} {:>10}  {}",
        item.id,
        item.name,
        item.category.label(),
        item.price.to_string(),
        stock
    )
}

fn parse_size(raw: &str) -> Result<ApartmentSize> {
    ApartmentSize::from_str(raw).map_err(CliError::Usage)
}
