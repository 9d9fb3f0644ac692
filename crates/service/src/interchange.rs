//! CSV import/export adapter for the catalog.
//!
//! The wire format is the 9-column row-tagged layout defined in
//! `tradein_core::interchange`. Import is append-only and tolerant:
//! malformed rows are logged and skipped without aborting the batch,
//! while an unreadable source aborts the whole import. Export is a full
//! unfiltered dump streamed to any writer.

use std::io;
use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;
use tradein_core::interchange::{self, CatalogRow};
use tradein_core::money;
use tradein_core::pricing::DiscountKind;

use crate::cache::SearchCache;
use crate::error::ServiceResult;
use tradein_db::models::attribute::Attribute;
use tradein_db::repositories::{AttributeRepo, CriterionRepo, DeviceRepo};

/// Bulk import/export of the whole catalog.
pub struct InterchangeService {
    pool: SqlitePool,
    cache: Arc<SearchCache>,
}

impl InterchangeService {
    pub fn new(pool: SqlitePool, cache: Arc<SearchCache>) -> Self {
        Self { pool, cache }
    }

    // -- import -----------------------------------------------------------

    /// Import catalog rows from CSV, returning how many rows were
    /// actually inserted. The first record is treated as a header.
    pub async fn import<R: io::Read>(&self, reader: R) -> ServiceResult<u64> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut imported: u64 = 0;
        for record in csv_reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    // A broken stream kills the batch; a bad record does not.
                    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                        return Err(err.into());
                    }
                    tracing::warn!(error = %err, "Skipping unreadable row");
                    continue;
                }
            };

            let fields: Vec<&str> = record.iter().collect();
            let row = match interchange::parse_row(&fields) {
                Ok(row) => row,
                Err(skip) => {
                    tracing::debug!(reason = %skip, "Skipping row");
                    continue;
                }
            };

            if self.insert_row(row).await? {
                imported += 1;
            }
        }

        self.cache.flush_all();
        tracing::info!(imported, "Catalog import finished");
        Ok(imported)
    }

    /// Import from a file path. A missing or unreadable file aborts the
    /// import before any row is touched.
    pub async fn import_file(&self, path: &Path) -> ServiceResult<u64> {
        let file = std::fs::File::open(path)?;
        self.import(file).await
    }

    /// Insert one parsed row. Returns `false` when the row was dropped
    /// (currently only option rows whose attribute id does not resolve).
    async fn insert_row(&self, row: CatalogRow) -> ServiceResult<bool> {
        match row {
            CatalogRow::Device {
                name,
                brand,
                base_price,
            } => {
                // Always inserts, never upserts by name: re-importing an
                // export duplicates devices. Observed behavior, kept.
                DeviceRepo::create(&self.pool, &name, &brand, store_amount(base_price)).await?;
            }
            CatalogRow::AttributeOption {
                attribute_name,
                discount_type,
                option_label,
                discount_value,
                attribute_id,
            } => {
                let attribute = match attribute_id {
                    Some(id) => match AttributeRepo::find_by_id(&self.pool, id).await? {
                        Some(attribute) => attribute,
                        None => {
                            tracing::warn!(
                                attribute_id = id,
                                option = %option_label,
                                "Attribute id does not resolve; skipping option row"
                            );
                            return Ok(false);
                        }
                    },
                    None => {
                        self.resolve_attribute_by_name(&attribute_name, discount_type)
                            .await?
                    }
                };
                AttributeRepo::create_option(
                    &self.pool,
                    attribute.id,
                    &option_label,
                    store_amount(discount_value),
                )
                .await?;
            }
            CatalogRow::Criterion {
                text,
                discount_value,
                applicable_brands,
                active,
            } => {
                CriterionRepo::create(
                    &self.pool,
                    &text,
                    store_amount(discount_value),
                    &applicable_brands,
                    active,
                )
                .await?;
            }
        }
        Ok(true)
    }

    /// Look an attribute up by name, creating an unscoped one when the
    /// catalog has never seen it.
    async fn resolve_attribute_by_name(
        &self,
        name: &str,
        discount_type: DiscountKind,
    ) -> ServiceResult<Attribute> {
        if let Some(existing) = AttributeRepo::find_by_name(&self.pool, name).await? {
            return Ok(existing);
        }
        let created = AttributeRepo::create(&self.pool, None, name, discount_type).await?;
        tracing::debug!(attribute = name, "Created attribute from import");
        Ok(created)
    }

    // -- export -----------------------------------------------------------

    /// Dump the whole catalog: a header row, every device, every
    /// (attribute, option) pair (or a bare attribute row when an
    /// attribute has no options), and every criterion.
    pub async fn export<W: io::Write>(&self, writer: W) -> ServiceResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(interchange::EXPORT_HEADER)?;

        for device in DeviceRepo::list(&self.pool, None).await? {
            csv_writer.write_record(interchange::device_row(
                &device.name,
                &device.brand,
                device.base_price(),
            ))?;
        }

        for attribute in AttributeRepo::list_all(&self.pool).await? {
            let options = AttributeRepo::options_for_attribute(&self.pool, attribute.id).await?;
            if options.is_empty() {
                csv_writer.write_record(interchange::bare_attribute_row(
                    &attribute.name,
                    attribute.discount_kind(),
                    attribute.id,
                ))?;
            } else {
                for option in options {
                    csv_writer.write_record(interchange::attribute_option_row(
                        &attribute.name,
                        attribute.discount_kind(),
                        &option.label,
                        option.discount_value(),
                        attribute.id,
                    ))?;
                }
            }
        }

        for criterion in CriterionRepo::list_all(&self.pool).await? {
            csv_writer.write_record(interchange::criterion_row(
                &criterion.text,
                criterion.discount_value(),
                &criterion.applicable_brands,
                criterion.active,
            ))?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Imported amounts are already clamped non-negative by parsing; absurd
/// magnitudes degrade to zero rather than failing the row.
fn store_amount(amount: rust_decimal::Decimal) -> i64 {
    money::to_minor_units(amount).unwrap_or(0)
}
