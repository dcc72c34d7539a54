use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::DataConfig;
use crate::domain::order::Order;
use crate::domain::product::Product;
use crate::orders::OrderStore;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read data file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse data file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
}

/// Startup snapshot of both static collections.
#[derive(Clone, Debug, Default)]
pub struct StoreSnapshot {
    pub catalog: Catalog,
    pub orders: OrderStore,
}

impl StoreSnapshot {
    pub fn load(data: &DataConfig) -> Result<Self, LoadError> {
        let products = load_products(&data.products_path)?;
        let orders = load_orders(&data.orders_path)?;
        let snapshot = Self { catalog: Catalog::new(products), orders: OrderStore::new(orders) };

        info!(
            event_name = "system.data.loaded",
            products = snapshot.catalog.products().len(),
            tags = snapshot.catalog.tag_count(),
            orders = snapshot.orders.len(),
            "static data loaded"
        );
        Ok(snapshot)
    }
}

pub fn load_products(path: &Path) -> Result<Vec<Product>, LoadError> {
    read_json(path)
}

pub fn load_orders(path: &Path) -> Result<Vec<Order>, LoadError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| LoadError::ReadFile { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| LoadError::ParseFile { path: path.to_path_buf(), source })
}
