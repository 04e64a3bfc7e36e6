// TLS file endpoints
//
// Status, upload and delete for the `cert` / `key` slots. The slot travels
// as the `type` query parameter.

use tracing::debug;
use url::Url;

use crate::client::PanelClient;
use crate::error::Error;
use crate::models::{MessageResponse, SslSlot, SslStatusResponse, SslUploadRequest};

impl PanelClient {
    fn slot_url(&self, path: &str, slot: SslSlot) -> Result<Url, Error> {
        let mut url = self.plugin_url(path)?;
        url.query_pairs_mut().append_pair("type", slot.as_ref());
        Ok(url)
    }

    /// Existence and metadata for both slots.
    ///
    /// `GET /api/ssl/status`
    pub async fn ssl_status(&self) -> Result<SslStatusResponse, Error> {
        let url = self.plugin_url("api/ssl/status")?;
        debug!("fetching ssl status");
        self.get(url).await
    }

    /// Upload one TLS file.
    ///
    /// `PUT /api/ssl/upload?type={slot}` with `{filename, fileData, size}`
    pub async fn upload_ssl(
        &self,
        slot: SslSlot,
        request: &SslUploadRequest,
    ) -> Result<MessageResponse, Error> {
        let url = self.slot_url("api/ssl/upload", slot)?;
        debug!(%slot, filename = %request.filename, size = request.size, "uploading ssl file");
        self.put(url, request).await
    }

    /// Delete one TLS file.
    ///
    /// `DELETE /api/ssl/delete?type={slot}`
    pub async fn delete_ssl(&self, slot: SslSlot) -> Result<MessageResponse, Error> {
        let url = self.slot_url("api/ssl/delete", slot)?;
        debug!(%slot, "deleting ssl file");
        self.delete(url).await
    }
}
