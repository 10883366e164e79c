//! Demo: walks one catalog through create, list, update and delete.

use catalog_kv::config::CatalogConfig;
use catalog_kv::lifecycle::CatalogSystem;
use catalog_kv::model::{Cart, ImageSource, ProductChanges, ProductDraft};
use partition_actor::tracing::setup_tracing;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = CatalogConfig::from_env().map_err(|e| e.to_string())?;
    info!(partition = %config.partition, "Starting catalog demo");
    let system = CatalogSystem::new(config);
    let catalog = system.catalog.clone();

    let widget = async {
        let upload = catalog
            .upload_image("widget.png", vec![0x89, 0x50, 0x4e, 0x47])
            .await
            .map_err(|e| e.to_string())?;
        let draft = ProductDraft::new("Widget", 9.99, 10)
            .with_description("A general purpose widget")
            .with_image(ImageSource::Pending(upload.handle));
        catalog
            .create_product(draft)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(tracing::info_span!("widget_creation"))
    .await?;
    info!(id = %widget.id, "Widget created");

    let gadget = catalog
        .create_product(ProductDraft::new("Gadget", 4.50, 5))
        .await
        .map_err(|e| e.to_string())?;
    info!(id = %gadget.id, "Gadget created");

    for product in catalog.list_products().await.map_err(|e| e.to_string())? {
        info!(
            id = %product.id,
            name = %product.name,
            price = product.price,
            stock = product.stock_level,
            "Listed"
        );
    }

    let changes = ProductChanges {
        stock_level: Some(7),
        ..ProductChanges::default()
    };
    let widget = catalog
        .update_product(&widget.id, changes)
        .await
        .map_err(|e| e.to_string())?;
    info!(id = %widget.id, stock = widget.stock_level, "Widget restocked");

    catalog
        .delete_product(&gadget.id)
        .await
        .map_err(|e| e.to_string())?;
    let remaining = catalog.list_products().await.map_err(|e| e.to_string())?;
    info!(count = remaining.len(), "Gadget deleted");

    let mut cart = Cart::new();
    for product in &remaining {
        let product = catalog
            .service()
            .get_by_id(&product.id)
            .await
            .map_err(|e| e.to_string())?;
        cart.add(&product, 2);
    }
    info!(total = cart.total_price(), lines = cart.items.len(), "Cart priced");

    drop(catalog);
    system.shutdown().await?;
    Ok(())
}
