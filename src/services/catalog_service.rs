// src/services/catalog_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogStore,
    models::catalog::{CatalogFilter, CatalogItem, CatalogItemUpdate, NewCatalogItem},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list_items(&self, filter: &CatalogFilter) -> Result<Vec<CatalogItem>, AppError> {
        self.store.list(filter).await
    }

    /// Busca por nome OU marca, sem diferenciar maiúsculas.
    pub async fn search_items(&self, term: &str) -> Result<Vec<CatalogItem>, AppError> {
        let filter = CatalogFilter {
            search: Some(term.to_string()),
            ..Default::default()
        };
        self.store.list(&filter).await
    }

    pub async fn get_item(&self, id: Uuid) -> Result<CatalogItem, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or(AppError::CatalogItemNotFound(id))
    }

    /// Item que pode entrar num orçamento: existe e está ativo.
    pub async fn get_active_item(&self, id: Uuid) -> Result<CatalogItem, AppError> {
        let item = self.get_item(id).await?;
        if !item.is_active {
            return Err(AppError::CatalogItemNotFound(id));
        }
        Ok(item)
    }

    pub async fn create_item(&self, item: NewCatalogItem) -> Result<Uuid, AppError> {
        let id = self.store.insert(&item).await?;
        tracing::info!("Item de catálogo '{}' criado com id {}", item.name, id);
        Ok(id)
    }

    pub async fn update_item(&self, id: Uuid, changes: CatalogItemUpdate) -> Result<(), AppError> {
        if !self.store.update(id, &changes).await? {
            return Err(AppError::CatalogItemNotFound(id));
        }
        Ok(())
    }

    /// Soft delete: o item continua no banco, só sai das listagens.
    pub async fn deactivate_item(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.set_active(id, false).await? {
            return Err(AppError::CatalogItemNotFound(id));
        }
        tracing::info!("Item de catálogo {} desativado", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, UnconfiguredStore};
    use crate::models::catalog::{CatalogCategory, CatalogTab, CatalogUnit};
    use rust_decimal::Decimal;

    fn service(store: &MemoryStore) -> CatalogService {
        CatalogService::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn deactivated_items_leave_listings_but_stay_stored() {
        let store = MemoryStore::new();
        let cable = store.add_catalog_item("Cabo 2,5mm", Decimal::new(349, 2), CatalogCategory::WiresCables);
        store.add_catalog_item("Disjuntor 20A", Decimal::new(2890, 2), CatalogCategory::Breakers);
        let catalog = service(&store);

        catalog.deactivate_item(cable.id).await.unwrap();

        let listed = catalog.list_items(&CatalogFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Disjuntor 20A");

        let stored = catalog.get_item(cable.id).await.unwrap();
        assert!(!stored.is_active);
        assert!(matches!(
            catalog.get_active_item(cable.id).await,
            Err(AppError::CatalogItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_is_sorted_and_filtered_by_tab() {
        let store = MemoryStore::new();
        store.add_catalog_item("Tomada", Decimal::ONE, CatalogCategory::General);
        store.add_catalog_item("Instalação de chuveiro", Decimal::new(150, 0), CatalogCategory::Services);
        store.add_catalog_item("Cabo", Decimal::ONE, CatalogCategory::WiresCables);
        let catalog = service(&store);

        let all = catalog.list_items(&CatalogFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Cabo", "Instalação de chuveiro", "Tomada"]);

        let services = catalog
            .list_items(&CatalogFilter { tab: Some(CatalogTab::Services), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(services.len(), 1);
        assert!(services[0].is_service());
    }

    #[tokio::test]
    async fn create_update_and_search() {
        let store = MemoryStore::new();
        let catalog = service(&store);

        let id = catalog
            .create_item(NewCatalogItem {
                name: "Luminária LED".into(),
                brand: "Philips".into(),
                price: Decimal::new(8990, 2),
                unit: CatalogUnit::Unit,
                category: CatalogCategory::Lighting,
                icon: None,
            })
            .await
            .unwrap();

        catalog
            .update_item(id, CatalogItemUpdate { price: Some(Decimal::new(7990, 2)), ..Default::default() })
            .await
            .unwrap();

        let found = catalog.search_items("philips").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].price, Decimal::new(7990, 2));
        assert_eq!(found[0].icon, crate::models::catalog::DEFAULT_ICON);
    }

    #[tokio::test]
    async fn missing_items_are_reported() {
        let catalog = service(&MemoryStore::new());
        let id = Uuid::new_v4();
        assert!(matches!(
            catalog.update_item(id, CatalogItemUpdate::default()).await,
            Err(AppError::CatalogItemNotFound(_))
        ));
        assert!(matches!(catalog.deactivate_item(id).await, Err(AppError::CatalogItemNotFound(_))));
    }

    #[tokio::test]
    async fn unconfigured_store_fails_every_call() {
        let catalog = CatalogService::new(Arc::new(UnconfiguredStore));
        assert!(matches!(
            catalog.list_items(&CatalogFilter::default()).await,
            Err(AppError::StoreNotConfigured)
        ));
        assert!(matches!(catalog.get_item(Uuid::new_v4()).await, Err(AppError::StoreNotConfigured)));
    }
}
