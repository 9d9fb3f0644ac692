//! Search cache behavior: identical calls served from cache inside the
//! TTL window, and a full flush on every device mutation or import.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tradein_service::catalog::{CreateDeviceRequest, UpdateDeviceRequest};
use tradein_service::{CatalogService, InterchangeService, LookupService, SearchCache};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tradein_service=debug")
        .try_init();
}

struct Harness {
    catalog: CatalogService,
    lookup: LookupService,
    interchange: InterchangeService,
    cache: Arc<SearchCache>,
}

fn harness(pool: &SqlitePool) -> Harness {
    init_tracing();
    let cache = Arc::new(SearchCache::new(Duration::from_secs(3600)));
    Harness {
        catalog: CatalogService::new(pool.clone(), Arc::clone(&cache)),
        lookup: LookupService::new(pool.clone(), Arc::clone(&cache), Duration::from_millis(400)),
        interchange: InterchangeService::new(pool.clone(), Arc::clone(&cache)),
        cache,
    }
}

async fn seed(catalog: &CatalogService, name: &str, brand: &str) -> i64 {
    catalog
        .create_device(&CreateDeviceRequest {
            name: name.to_string(),
            brand: brand.to_string(),
            base_price: Decimal::new(10_000, 2),
        })
        .await
        .unwrap()
        .id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn repeated_search_is_served_from_cache(pool: SqlitePool) {
    let h = harness(&pool);
    seed(&h.catalog, "Galaxy S21", "Samsung").await;

    let first = h.lookup.search_devices("galaxy").await;
    assert_eq!(first.len(), 1);

    // Remove the row behind the service's back: a cached term must not
    // hit storage again inside the TTL window.
    sqlx::query("DELETE FROM devices").execute(&pool).await.unwrap();

    let second = h.lookup.search_devices("galaxy").await;
    assert_eq!(first, second);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn padded_terms_share_one_cache_entry(pool: SqlitePool) {
    let h = harness(&pool);
    seed(&h.catalog, "Galaxy S21", "Samsung").await;

    h.lookup.search_devices("galaxy").await;
    h.lookup.search_devices("  galaxy ").await;
    assert_eq!(h.cache.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn device_mutation_flushes_the_cache(pool: SqlitePool) {
    let h = harness(&pool);
    let id = seed(&h.catalog, "Galaxy S21", "Samsung").await;

    let before = h.lookup.search_devices("galaxy").await;
    assert_eq!(before[0].name, "Galaxy S21");

    h.catalog
        .update_device(
            id,
            &UpdateDeviceRequest {
                name: Some("Galaxy S21 FE".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(h.cache.is_empty());

    let after = h.lookup.search_devices("galaxy").await;
    assert_eq!(after[0].name, "Galaxy S21 FE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn device_delete_flushes_the_cache(pool: SqlitePool) {
    let h = harness(&pool);
    let id = seed(&h.catalog, "Galaxy S21", "Samsung").await;

    assert_eq!(h.lookup.search_devices("galaxy").await.len(), 1);
    h.catalog.delete_device(id).await.unwrap();
    assert!(h.lookup.search_devices("galaxy").await.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn import_flushes_the_cache(pool: SqlitePool) {
    let h = harness(&pool);
    seed(&h.catalog, "Galaxy S21", "Samsung").await;
    assert_eq!(h.lookup.search_devices("galaxy").await.len(), 1);

    let csv = "type,device_name,brand,base_price,attribute_name,discount_type,option_label,discount_value,attribute_id\n\
               Device,Galaxy Note,Samsung,250.00,,,,,\n";
    h.interchange.import(Cursor::new(csv)).await.unwrap();

    assert_eq!(h.lookup.search_devices("galaxy").await.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cached_hits_are_html_escaped(pool: SqlitePool) {
    let h = harness(&pool);
    seed(&h.catalog, "Galaxy <S21> & Co", "Sam\"sung").await;

    let hits = h.lookup.search_devices("galaxy").await;
    assert_eq!(hits[0].name, "Galaxy &lt;S21&gt; &amp; Co");
    assert_eq!(hits[0].brand, "Sam&quot;sung");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_term_lists_all_devices_sorted(pool: SqlitePool) {
    let h = harness(&pool);
    seed(&h.catalog, "Pixel 6", "Google").await;
    seed(&h.catalog, "Galaxy S21", "Samsung").await;

    let hits = h.lookup.search_devices("").await;
    let names: Vec<&str> = hits.iter().map(|hit| hit.name.as_str()).collect();
    assert_eq!(names, vec!["Galaxy S21", "Pixel 6"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unmatched_term_caches_empty_result(pool: SqlitePool) {
    let h = harness(&pool);
    seed(&h.catalog, "Pixel 6", "Google").await;

    assert!(h.lookup.search_devices("iphone").await.is_empty());
    assert_eq!(h.cache.len(), 1);
}
