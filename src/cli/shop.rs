use chrono::Utc;
use uuid::Uuid;

use crate::server::validation::shop_domain_problem;
use crate::store::Store;
use crate::types::Shop;

use super::{init_store, open_existing_store};

pub fn run_shop_add(data_dir: String, domain: String, token: String) -> anyhow::Result<()> {
    if let Some(problem) = shop_domain_problem(&domain) {
        anyhow::bail!(problem);
    }
    if token.trim().is_empty() {
        anyhow::bail!("--token cannot be empty");
    }

    let store = init_store(&data_dir)?;

    if let Some(existing) = store.get_shop_by_domain(&domain)? {
        store.update_shop_token(&existing.id, &token)?;
        println!("Updated shop \"{}\"", domain);
        return Ok(());
    }

    let shop = Shop {
        id: Uuid::new_v4().to_string(),
        shop_domain: domain.clone(),
        access_token: token,
        is_active: true,
        installed_at: Utc::now(),
    };
    store.create_shop(&shop)?;

    println!("Registered shop \"{}\" ({})", domain, shop.id);
    Ok(())
}

pub fn run_shop_list(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = open_existing_store(&data_dir)?;
    let shops = store.list_shops()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&shops)?);
        return Ok(());
    }

    if shops.is_empty() {
        println!("No shops registered");
        return Ok(());
    }

    for shop in &shops {
        let status = if shop.is_active { "active" } else { "inactive" };
        println!(
            "{:<40} {:<8} installed {}",
            shop.shop_domain,
            status,
            shop.installed_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub fn run_shop_deactivate(data_dir: String, domain: String) -> anyhow::Result<()> {
    let store = open_existing_store(&data_dir)?;

    let shop = store
        .get_shop_by_domain(&domain)?
        .ok_or_else(|| anyhow::anyhow!("Shop not found: {}", domain))?;

    if store.deactivate_shop(&shop.id)? {
        println!("Deactivated shop \"{}\"", domain);
    } else {
        println!("Shop \"{}\" is already inactive", domain);
    }
    Ok(())
}
