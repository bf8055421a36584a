//! Permission view registry: idempotent find-or-create over `(permission, resource)` pairs.

use std::sync::Arc;

use custodian_core::AppResult;
use custodian_domain::{PermissionView, PermissionViewKey, PermissionViewSelection};

use crate::PermissionViewRepository;

/// Application service owning permission view identity.
#[derive(Clone)]
pub struct PermissionRegistryService {
    repository: Arc<dyn PermissionViewRepository>,
}

impl PermissionRegistryService {
    /// Creates a registry service over a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionViewRepository>) -> Self {
        Self { repository }
    }

    /// Returns the view for the pair, registering it on first reference.
    pub async fn find_or_create(
        &self,
        permission_name: &str,
        resource_name: &str,
    ) -> AppResult<PermissionView> {
        let key = PermissionViewKey::new(permission_name, resource_name)?;
        self.find_or_create_key(&key).await
    }

    /// Returns the view for an already validated key, registering it on first reference.
    pub async fn find_or_create_key(&self, key: &PermissionViewKey) -> AppResult<PermissionView> {
        if let Some(permission_view) = self.repository.find_permission_view(key).await? {
            return Ok(permission_view);
        }

        self.repository.insert_permission_view(key).await
    }

    /// Resolves every pair of the selection in input order, registering missing ones.
    ///
    /// All pairs are validated before anything is registered.
    pub async fn find_or_create_batch(
        &self,
        selection: PermissionViewSelection,
    ) -> AppResult<Vec<PermissionView>> {
        let keys = selection.into_keys()?;
        let mut permission_views = Vec::with_capacity(keys.len());

        for key in &keys {
            permission_views.push(self.find_or_create_key(key).await?);
        }

        Ok(permission_views)
    }

    /// Resolves the already registered pairs of the selection in input order.
    ///
    /// Unknown pairs are skipped and nothing is registered.
    pub async fn find_batch(
        &self,
        selection: PermissionViewSelection,
    ) -> AppResult<Vec<PermissionView>> {
        let keys = selection.into_keys()?;
        let mut permission_views = Vec::with_capacity(keys.len());

        for key in &keys {
            if let Some(permission_view) = self.repository.find_permission_view(key).await? {
                permission_views.push(permission_view);
            }
        }

        Ok(permission_views)
    }

    /// Lists all registered permission views.
    pub async fn list(&self) -> AppResult<Vec<PermissionView>> {
        self.repository.list_permission_views().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use custodian_core::AppError;
    use custodian_domain::{PermissionView, PermissionViewSelection};

    use crate::test_fakes::FakePermissionViewRepository;

    use super::PermissionRegistryService;

    fn service() -> (PermissionRegistryService, Arc<FakePermissionViewRepository>) {
        let repository = Arc::new(FakePermissionViewRepository::default());
        (PermissionRegistryService::new(repository.clone()), repository)
    }

    fn pair(permission: &str, resource: &str) -> (String, String) {
        (permission.to_owned(), resource.to_owned())
    }

    #[tokio::test]
    async fn find_or_create_is_idempotent() {
        let (service, repository) = service();

        let first = service.find_or_create("can_read", "Dashboard").await;
        let second = service.find_or_create("can_read", "Dashboard").await;

        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("find_or_create should succeed");
        };
        assert_eq!(first.id(), second.id());
        assert_eq!(repository.views.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn find_or_create_rejects_empty_names() {
        let (service, repository) = service();

        let missing_permission = service.find_or_create("", "Dashboard").await;
        let missing_resource = service.find_or_create("can_read", "").await;

        assert!(matches!(missing_permission, Err(AppError::InvalidArgument(_))));
        assert!(matches!(missing_resource, Err(AppError::InvalidArgument(_))));
        assert!(repository.views.lock().await.is_empty());
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let (service, _) = service();
        assert!(service.find_or_create("can_write", "Chart").await.is_ok());

        let views = service
            .find_or_create_batch(PermissionViewSelection::from(vec![
                pair("can_read", "Dashboard"),
                pair("can_write", "Chart"),
                pair("can_export", "Chart"),
            ]))
            .await;

        let names = views
            .unwrap_or_default()
            .iter()
            .map(|view| view.key().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "can_read on Dashboard".to_owned(),
                "can_write on Chart".to_owned(),
                "can_export on Chart".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn batch_accepts_bare_pair() {
        let (service, _) = service();

        let single = service
            .find_or_create_batch(PermissionViewSelection::from(pair("can_read", "Dashboard")))
            .await;
        let listed = service
            .find_or_create_batch(PermissionViewSelection::from(vec![pair(
                "can_read",
                "Dashboard",
            )]))
            .await;

        let single_ids = single
            .unwrap_or_default()
            .iter()
            .map(PermissionView::id)
            .collect::<Vec<_>>();
        let listed_ids = listed
            .unwrap_or_default()
            .iter()
            .map(PermissionView::id)
            .collect::<Vec<_>>();
        assert_eq!(single_ids.len(), 1);
        assert_eq!(single_ids, listed_ids);
    }

    #[tokio::test]
    async fn batch_with_invalid_pair_registers_nothing() {
        let (service, repository) = service();

        let result = service
            .find_or_create_batch(PermissionViewSelection::from(vec![
                pair("can_read", "Dashboard"),
                pair("can_write", " "),
            ]))
            .await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        assert!(repository.views.lock().await.is_empty());
    }

    #[tokio::test]
    async fn find_batch_skips_unknown_pairs() {
        let (service, repository) = service();
        assert!(service.find_or_create("can_read", "Dashboard").await.is_ok());

        let views = service
            .find_batch(PermissionViewSelection::from(vec![
                pair("can_read", "Dashboard"),
                pair("can_delete", "Dashboard"),
            ]))
            .await;

        assert_eq!(views.map(|views| views.len()).ok(), Some(1));
        assert_eq!(repository.views.lock().await.len(), 1);
    }
}
