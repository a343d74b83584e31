use anyhow::{Context, Result, anyhow};
use std::{env, str::FromStr};

/// Knobs the services need at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySettings {
    pub low_stock_threshold: i32,
    pub bulk_update_max_items: usize,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: 50,
            bulk_update_max_items: 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_min_conn: u32,
    pub db_max_conn: u32,
    pub inventory: InventorySettings,
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;

        let run_migrations = match env::var("RUN_MIGRATIONS").as_deref() {
            Err(_) | Ok("true") => true,
            Ok("false") => false,
            Ok(other) => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = parse_or("PORT", 8080u16)?;
        let db_min_conn = parse_or("DB_MIN_CONN", 1u32)?;
        let db_max_conn = parse_or("DB_MAX_CONN", 10u32)?;

        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONN ({db_min_conn}) must not exceed DB_MAX_CONN ({db_max_conn})"
            ));
        }

        let defaults = InventorySettings::default();
        let low_stock_threshold = parse_or("LOW_STOCK_THRESHOLD", defaults.low_stock_threshold)?;
        if low_stock_threshold < 0 {
            return Err(anyhow!("LOW_STOCK_THRESHOLD must be non-negative"));
        }

        let bulk_update_max_items =
            parse_or("BULK_UPDATE_MAX_ITEMS", defaults.bulk_update_max_items)?;
        if bulk_update_max_items == 0 {
            return Err(anyhow!("BULK_UPDATE_MAX_ITEMS must be at least 1"));
        }

        Ok(Self {
            database_url,
            run_migrations,
            port,
            db_min_conn,
            db_max_conn,
            inventory: InventorySettings {
                low_stock_threshold,
                bulk_update_max_items,
            },
        })
    }
}
