use crate::app::CatalogReceiver;
use crate::config::Config;
use crate::resolver::Catalog;
use crate::source::DataSource;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

/// Loads the catalog in the background and publishes it once.
///
/// A failed load publishes an empty catalog so searches waiting on it still
/// finish, with no results.
pub fn spawn_catalog_load(source: Arc<dyn DataSource>, config: Config) -> CatalogReceiver {
    let (tx, rx) = watch::channel(None);

    tokio::spawn(async move {
        info!("Loading ballot data from {} ({:?} mode)", config.data_root, config.mode);

        let catalog = match Catalog::load(source.as_ref(), &config).await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Failed to load ballot data: {}", e);
                Catalog::default()
            }
        };

        if tx.send(Some(Arc::new(catalog))).is_err() {
            warn!("Catalog loaded after every receiver was dropped");
        }
    });

    rx
}
