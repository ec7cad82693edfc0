//! Category endpoints

use super::client::ApiClient;
use super::dto::CategoryName;
use super::error::ApiResult;
use super::session::TokenStore;
use super::transport::Transport;
use crate::models::{Category, Id};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.get("/categories/").await
    }

    pub async fn create_category(&self, name: &str) -> ApiResult<Category> {
        let body = CategoryName {
            name: name.trim().to_string(),
        };
        self.post("/categories/", &body).await
    }

    pub async fn rename_category(&self, id: Id, name: &str) -> ApiResult<Category> {
        let body = CategoryName {
            name: name.trim().to_string(),
        };
        self.patch(&format!("/categories/{}/", id), &body).await
    }

    /// Rejected with 400 while products still reference the category
    pub async fn delete_category(&self, id: Id) -> ApiResult<()> {
        self.delete(&format!("/categories/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{product, FakeBackend, BASE};
    use crate::api::{ApiClient, ApiError, MemoryTokenStore};
    use crate::messages;

    #[tokio::test]
    async fn test_delete_category_with_products_is_rejected_and_reported() {
        let backend = FakeBackend::new()
            .with_category(1, "Bebidas")
            .with_category(2, "Vacía")
            .with_product(product(10, "COCA350", "Coca-Cola", 990, 5, Some(1)));
        let api = ApiClient::new(BASE, backend, MemoryTokenStore::with_tokens("acc", None));

        let err = api.delete_category(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(Some(_))));
        assert_eq!(
            messages::DELETE_CATEGORY.describe(&err),
            "No se puede eliminar: la categoría tiene productos asociados."
        );

        let remaining = api.list_categories().await.unwrap();
        assert!(remaining.iter().any(|c| c.id == 1));

        api.delete_category(2).await.unwrap();
        let remaining = api.list_categories().await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn test_rejection_without_detail_uses_fallback() {
        let err = ApiError::from_response(400, "{}");
        assert_eq!(
            messages::DELETE_CATEGORY.describe(&err),
            "Esta categoria no puede ser borrada porque tiene productos asociados."
        );
    }

    #[tokio::test]
    async fn test_create_and_rename() {
        let backend = FakeBackend::new();
        let api = ApiClient::new(BASE, backend, MemoryTokenStore::with_tokens("acc", None));

        let created = api.create_category("  Lácteos ").await.unwrap();
        assert_eq!(created.name, "Lácteos");
        let renamed = api.rename_category(created.id, "Lácteos y huevos").await.unwrap();
        assert_eq!(renamed.name, "Lácteos y huevos");
    }
}
