//! Product endpoints

use super::client::ApiClient;
use super::dto::{NewProduct, ProductUpdate, TopSellerUpdate};
use super::error::ApiResult;
use super::session::TokenStore;
use super::transport::Transport;
use crate::models::{Id, Product};

/// Outcome of resolving a scanned or typed product code
#[derive(Debug, Clone, PartialEq)]
pub enum CodeLookup {
    /// Exact (case-insensitive) code match
    Found(Product),
    /// No exact match; whatever the search returned instead
    Candidates(Vec<Product>),
}

/// Case-insensitive exact match on the product code
pub fn find_exact_code<'a>(products: &'a [Product], code: &str) -> Option<&'a Product> {
    let wanted = code.trim().to_lowercase();
    products.iter().find(|p| p.code.to_lowercase() == wanted)
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        self.get("/products/").await
    }

    /// Backend search over code and name
    pub async fn search_products(&self, query: &str) -> ApiResult<Vec<Product>> {
        self.get(&format!("/products/?search={}", urlencoding::encode(query)))
            .await
    }

    pub async fn lookup_code(&self, code: &str) -> ApiResult<CodeLookup> {
        let found = self.search_products(code.trim()).await?;
        Ok(match find_exact_code(&found, code) {
            Some(product) => CodeLookup::Found(product.clone()),
            None => CodeLookup::Candidates(found),
        })
    }

    pub async fn create_product(&self, product: &NewProduct) -> ApiResult<Product> {
        self.post("/products/", product).await
    }

    pub async fn update_product(&self, id: Id, update: &ProductUpdate) -> ApiResult<Product> {
        self.patch(&format!("/products/{}/", id), update).await
    }

    pub async fn set_top_seller(&self, id: Id, top_seller: bool) -> ApiResult<Product> {
        self.patch(&format!("/products/{}/", id), &TopSellerUpdate { top_seller })
            .await
    }

    pub async fn delete_product(&self, id: Id) -> ApiResult<()> {
        self.delete(&format!("/products/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{product, FakeBackend, BASE};
    use crate::api::MemoryTokenStore;

    #[tokio::test]
    async fn test_lookup_code_exact_match_ignores_case() {
        let backend = FakeBackend::new()
            .with_product(product(1, "COCA350", "Coca-Cola 350ml", 990, 12, None))
            .with_product(product(2, "COCA350Z", "Coca-Cola Zero 350ml", 990, 8, None));
        let api = ApiClient::new(BASE, backend, MemoryTokenStore::with_tokens("acc", None));

        match api.lookup_code("coca350").await.unwrap() {
            CodeLookup::Found(p) => assert_eq!(p.id, 1),
            other => panic!("expected exact match, got {:?}", other),
        }

        match api.lookup_code("coca").await.unwrap() {
            CodeLookup::Candidates(list) => assert_eq!(list.len(), 2),
            other => panic!("expected candidates, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_query_is_encoded() {
        let backend = FakeBackend::new();
        let api = ApiClient::new(BASE, backend, MemoryTokenStore::with_tokens("acc", None));
        api.search_products("pan & leche").await.unwrap();
        assert_eq!(
            api.transport().calls()[0].1,
            "/products/?search=pan%20%26%20leche"
        );
    }
}
