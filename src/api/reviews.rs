//! Listing reviews
//!
//! Generic create and delete by review id, plus the caller's own review
//! addressed through the listing (`/laptops/{uuid}/reviews/mine/`).

use laptophub_protocol::{Review, ReviewInput, ReviewPatch};
use validator::Validate;

use crate::client::{require_token, ApiClient, Failure};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `reviews.*`
#[derive(Debug)]
pub struct ReviewsApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn reviews(&self) -> ReviewsApi<'_, T> {
        ReviewsApi { client: self }
    }
}

fn mine_path(uuid: &str) -> String {
    format!("/laptops/{}/reviews/mine/", uuid)
}

impl<'a, T: Transport> ReviewsApi<'a, T> {
    /// POST /laptops/{uuid}/reviews/
    pub async fn create(&self, uuid: &str, token: &str, review: &ReviewInput) -> Result<Review> {
        let token = require_token(token)?;
        review.validate()?;
        let request = ApiRequest::post(format!("/laptops/{}/reviews/", uuid))
            .bearer(token)
            .json(review)?;
        self.client.fetch(request, Failure::Normalized).await
    }

    /// DELETE /reviews/{id}/
    pub async fn destroy(&self, review_id: u64, token: &str) -> Result<()> {
        let token = require_token(token)?;
        let request = ApiRequest::delete(format!("/reviews/{}/", review_id)).bearer(token);
        self.client.perform(request, Failure::Normalized).await
    }

    /// GET /laptops/{uuid}/reviews/mine/
    pub async fn get_mine(&self, uuid: &str, token: &str) -> Result<Review> {
        let token = require_token(token)?;
        let request = ApiRequest::get(mine_path(uuid)).bearer(token);
        self.client.fetch(request, Failure::Normalized).await
    }

    /// PATCH /laptops/{uuid}/reviews/mine/
    pub async fn update_mine(&self, uuid: &str, token: &str, patch: &ReviewPatch) -> Result<Review> {
        let token = require_token(token)?;
        patch.validate()?;
        let request = ApiRequest::patch(mine_path(uuid))
            .bearer(token)
            .json(patch)?;
        self.client.fetch(request, Failure::Normalized).await
    }

    /// DELETE /laptops/{uuid}/reviews/mine/
    pub async fn delete_mine(&self, uuid: &str, token: &str) -> Result<()> {
        let token = require_token(token)?;
        let request = ApiRequest::delete(mine_path(uuid)).bearer(token);
        self.client.perform(request, Failure::Normalized).await
    }
}
