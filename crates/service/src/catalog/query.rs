//! Read-side of the catalog: filtered/sorted/paginated views and
//! aggregate statistics.
//!
//! Filters are composed from named predicates so the set of available
//! filters is enumerable and testable instead of being discovered at
//! call sites.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use models::record::ServiceRecord;
use models::Category;

use crate::catalog::store::ServiceCatalog;
use crate::pagination::{PageInfo, Pagination};

/// Composable filter over catalog records. The default filter excludes
/// archived records; everything else is opt-in.
#[derive(Clone, Debug, Default)]
pub struct ServiceFilter {
    category: Option<Category>,
    search: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    featured: Option<bool>,
    published_only: bool,
    include_archived: bool,
}

impl ServiceFilter {
    pub fn published() -> Self {
        Self { published_only: true, ..Default::default() }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Case-insensitive substring match across title, description and
    /// short description.
    pub fn matching(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_lowercase();
        if !term.is_empty() {
            self.search = Some(term);
        }
        self
    }

    pub fn price_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured = Some(true);
        self
    }

    /// Admin-scoped queries may include soft-deleted records.
    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    pub fn matches(&self, record: &ServiceRecord) -> bool {
        if !self.include_archived && record.lifecycle.is_archived() {
            return false;
        }
        if self.published_only && !record.lifecycle.is_published() {
            return false;
        }
        if let Some(cat) = self.category {
            if record.category != cat {
                return false;
            }
        }
        if let Some(wanted) = self.featured {
            if record.is_featured != wanted {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if record.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if record.price > max {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let haystacks =
                [&record.title, &record.description, &record.short_description];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(term)) {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Title,
    Price,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(s: &str) -> Option<SortField> {
        let key: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_lowercase();
        match key.as_str() {
            "title" => Some(SortField::Title),
            "price" => Some(SortField::Price),
            "createdat" => Some(SortField::CreatedAt),
            "updatedat" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> SortOrder {
        if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// One page of catalog results.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<ServiceRecord>,
    #[serde(flatten)]
    pub info: PageInfo,
}

/// Aggregates over a filtered view of the catalog.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub created_last_30_days: usize,
    pub average_price: f64,
    pub categories: Vec<Category>,
}

#[derive(Clone)]
pub struct ServiceQueryEngine {
    catalog: Arc<ServiceCatalog>,
}

impl ServiceQueryEngine {
    pub fn new(catalog: Arc<ServiceCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn list(
        &self,
        filter: &ServiceFilter,
        sort: Option<(SortField, SortOrder)>,
        pagination: Pagination,
    ) -> Page {
        let mut items: Vec<ServiceRecord> =
            self.catalog.all().await.into_iter().filter(|r| filter.matches(r)).collect();

        let (field, order) = sort.unwrap_or((SortField::CreatedAt, SortOrder::Desc));
        items.sort_by(|a, b| {
            let ord = match field {
                SortField::Title => a.title.cmp(&b.title),
                SortField::Price => {
                    a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal)
                }
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = items.len();
        let (skip, limit) = pagination.normalize();
        let items: Vec<ServiceRecord> = items.into_iter().skip(skip).take(limit).collect();
        Page { items, info: PageInfo::new(total, pagination) }
    }

    pub async fn stats(&self, filter: &ServiceFilter) -> CatalogStats {
        let items: Vec<ServiceRecord> =
            self.catalog.all().await.into_iter().filter(|r| filter.matches(r)).collect();
        let cutoff = Utc::now() - Duration::days(30);
        let created_last_30_days = items.iter().filter(|r| r.created_at >= cutoff).count();
        let average_price = if items.is_empty() {
            0.0
        } else {
            items.iter().map(|r| r.price).sum::<f64>() / items.len() as f64
        };
        let categories: BTreeSet<Category> = items.iter().map(|r| r.category).collect();
        CatalogStats {
            created_last_30_days,
            average_price,
            categories: categories.into_iter().collect(),
        }
    }

    /// Up to `limit` other published records in the same category.
    pub async fn related(&self, record: &ServiceRecord, limit: usize) -> Vec<ServiceRecord> {
        let filter = ServiceFilter::published().with_category(record.category);
        let id = record.id;
        self.catalog
            .all()
            .await
            .into_iter()
            .filter(|r| r.id != id && filter.matches(r))
            .take(limit)
            .collect()
    }

    /// Distinct categories among non-archived records.
    pub async fn categories_in_use(&self) -> Vec<Category> {
        let filter = ServiceFilter::default();
        let set: BTreeSet<Category> = self
            .catalog
            .all()
            .await
            .into_iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.category)
            .collect();
        set.into_iter().collect()
    }

    /// Published records flagged as featured.
    pub async fn featured(&self) -> Vec<ServiceRecord> {
        let filter = ServiceFilter::published().featured_only();
        self.catalog.all().await.into_iter().filter(|r| filter.matches(r)).collect()
    }

    /// Fetch with related records for the public detail view.
    pub async fn detail(
        &self,
        id: Uuid,
        related_limit: usize,
    ) -> Result<(ServiceRecord, Vec<ServiceRecord>), crate::errors::ServiceError> {
        let record = self.catalog.get(id).await?;
        let related = self.related(&record, related_limit).await;
        Ok((record, related))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::Actor;
    use crate::catalog::store::ServiceCatalog;
    use models::payload::ServicePayload;

    fn actor() -> Actor {
        Actor { id: Uuid::new_v4(), email: "admin@firm.example".into(), is_admin: true }
    }

    fn payload(title: &str, category: &str, price: f64) -> ServicePayload {
        ServicePayload {
            title: Some(title.into()),
            short_description: Some(format!("{title} in brief")),
            description: Some(format!("All about {title}")),
            full_description: Some("Full text".into()),
            category: Some(category.into()),
            price: Some(price),
            ..Default::default()
        }
    }

    async fn seeded() -> (Arc<ServiceCatalog>, ServiceQueryEngine, Actor) {
        let path = std::env::temp_dir().join(format!("query_{}.json", Uuid::new_v4()));
        let catalog = ServiceCatalog::open(path).await.unwrap();
        let actor = actor();
        for (title, cat, price, publish) in [
            ("Carbon Audit", "audit", 1000.0, true),
            ("Waste Assessment", "assessment", 2000.0, true),
            ("Process Audit", "audit", 3000.0, true),
            ("Strategy Workshop", "training", 4000.0, false),
        ] {
            let mut p = payload(title, cat, price);
            p.is_published = Some(publish);
            catalog.create(&p, &actor).await.unwrap();
        }
        let engine = ServiceQueryEngine::new(Arc::clone(&catalog));
        (catalog, engine, actor)
    }

    #[tokio::test]
    async fn filters_compose_category_search_and_price() {
        let (_, engine, _) = seeded().await;

        let by_category = ServiceFilter::default().with_category(Category::Audit);
        let page = engine.list(&by_category, None, Pagination::default()).await;
        assert_eq!(page.items.len(), 2);

        let by_search = ServiceFilter::default().matching("WASTE");
        let page = engine.list(&by_search, None, Pagination::default()).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Waste Assessment");

        let by_price = ServiceFilter::default().price_between(Some(1500.0), Some(3500.0));
        let page = engine.list(&by_price, None, Pagination::default()).await;
        assert_eq!(page.items.len(), 2);

        let published = ServiceFilter::published();
        let page = engine.list(&published, None, Pagination::default()).await;
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn archived_records_are_excluded_by_default_but_admin_opt_in_sees_them() {
        let (catalog, engine, actor) = seeded().await;
        let page = engine.list(&ServiceFilter::default(), None, Pagination::default()).await;
        let victim = page.items[0].clone();
        catalog.soft_delete(victim.id, &actor).await.unwrap();

        let after = engine.list(&ServiceFilter::default(), None, Pagination::default()).await;
        assert_eq!(after.info.total, 3);
        assert!(after.items.iter().all(|r| r.id != victim.id));

        let admin_view =
            engine.list(&ServiceFilter::default().include_archived(), None, Pagination::default()).await;
        assert_eq!(admin_view.info.total, 4);
    }

    #[tokio::test]
    async fn sorting_and_pagination_shape() {
        let (_, engine, _) = seeded().await;
        let page = engine
            .list(
                &ServiceFilter::default(),
                Some((SortField::Price, SortOrder::Asc)),
                Pagination { page: 1, limit: 2 },
            )
            .await;
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].price, 1000.0);
        assert_eq!(page.info.total, 4);
        assert_eq!(page.info.pages, 2);

        let second = engine
            .list(
                &ServiceFilter::default(),
                Some((SortField::Price, SortOrder::Asc)),
                Pagination { page: 2, limit: 2 },
            )
            .await;
        assert_eq!(second.items[0].price, 3000.0);
        assert_eq!(second.info.page, 2);
    }

    #[tokio::test]
    async fn stats_cover_count_mean_and_categories() {
        let (_, engine, _) = seeded().await;
        let stats = engine.stats(&ServiceFilter::default()).await;
        assert_eq!(stats.created_last_30_days, 4);
        assert!((stats.average_price - 2500.0).abs() < f64::EPSILON);
        assert_eq!(
            stats.categories,
            vec![Category::Audit, Category::Assessment, Category::Training]
        );

        let scoped = engine.stats(&ServiceFilter::default().with_category(Category::Audit)).await;
        assert_eq!(scoped.created_last_30_days, 2);
        assert!((scoped.average_price - 2000.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn related_returns_same_category_published_others() {
        let (catalog, engine, _) = seeded().await;
        let all = catalog.all().await;
        let carbon = all.iter().find(|r| r.title == "Carbon Audit").unwrap();
        let related = engine.related(carbon, 3).await;
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Process Audit");
    }

    #[tokio::test]
    async fn sort_field_parsing_accepts_wire_names() {
        assert_eq!(SortField::parse("createdAt"), Some(SortField::CreatedAt));
        assert_eq!(SortField::parse("created_at"), Some(SortField::CreatedAt));
        assert_eq!(SortField::parse("PRICE"), Some(SortField::Price));
        assert_eq!(SortField::parse("bogus"), None);
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("anything-else"), SortOrder::Asc);
    }
}
