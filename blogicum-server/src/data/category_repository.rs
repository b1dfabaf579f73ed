use async_trait::async_trait;

use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::location::Location;

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    async fn get_category(&self, id: i64) -> Result<Option<Category>, DomainError>;
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
}

#[async_trait]
pub(crate) trait LocationRepository: Send + Sync {
    async fn get_location(&self, id: i64) -> Result<Option<Location>, DomainError>;
}
