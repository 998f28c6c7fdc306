use crate::domain::entities::PostRecord;

use super::service::AdminPostService;
use super::types::AdminPostError;

impl AdminPostService {
    /// Every post, drafts included, newest first.
    pub async fn list(&self) -> Result<Vec<PostRecord>, AdminPostError> {
        self.reader.list_all().await.map_err(AdminPostError::from)
    }

    pub async fn find(&self, id: i64) -> Result<PostRecord, AdminPostError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPostError::NotFound)
    }
}
