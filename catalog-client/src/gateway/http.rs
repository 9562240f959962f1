//! HTTP gateway for the remote catalog API

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::models::{
    BulkTarget, CategoryFields, CategoryUpdate, FilePayload, ImportReport, ProductFields,
    ProductUpdate, RawCategory, RawProduct,
};

use super::CatalogGateway;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for the remote catalog API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    /// Create a new gateway from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)));
        Self::handle_response(request.send().await?).await
    }

    async fn patch_empty(&self, path: &str) -> ClientResult<()> {
        let request = self.authorized(self.client.patch(self.url(path)));
        Self::handle_empty(request.send().await?).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.authorized(self.client.delete(self.url(path)));
        Self::handle_empty(request.send().await?).await
    }

    async fn send_multipart<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        form: Form,
    ) -> ClientResult<T> {
        let response = self.authorized(request).multipart(form).send().await?;
        Self::handle_response(response).await
    }

    async fn download(&self, path: &str, fallback_name: &str) -> ClientResult<FilePayload> {
        let request = self.authorized(self.client.get(self.url(path)));
        let response = Self::check_status(request.send().await?).await?;

        let headers = response.headers();
        let file_name = headers
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name)
            .unwrap_or_else(|| fallback_name.to_string());
        let content_type = headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?;
        let payload = FilePayload::new(file_name, bytes.to_vec());
        Ok(match content_type {
            Some(ct) => payload.with_content_type(ct),
            None => payload,
        })
    }

    /// Map non-success statuses to client errors
    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        // Prefer the envelope message when the body is one
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            .ok()
            .filter(|r| !r.message.is_empty())
            .map(|r| r.message)
            .unwrap_or(text);

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            _ => ClientError::Internal(format!("{status}: {message}")),
        })
    }

    /// Decode an `ApiResponse<T>` envelope and unwrap its data
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let envelope: ApiResponse<T> = Self::decode(response).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing response data".to_string()))
    }

    async fn handle_empty(response: reqwest::Response) -> ClientResult<()> {
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<ApiResponse<T>> {
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(ApiResponse {
                code: None,
                message: String::new(),
                data: None,
                details: None,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        if !envelope.is_success() {
            return Err(ClientError::Api {
                code: envelope.error_code(),
                message: envelope.message,
            });
        }
        Ok(envelope)
    }
}

/// Build the multipart body shared by create and edit calls
fn entity_form<T: Serialize>(data: &T, images: &[FilePayload]) -> ClientResult<Form> {
    let mut form = Form::new().text("data", serde_json::to_string(data)?);
    for image in images {
        form = form.part("images", file_part(image)?);
    }
    Ok(form)
}

fn file_part(file: &FilePayload) -> ClientResult<Part> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)
        .map_err(|e| ClientError::Validation(format!("invalid content type for {}: {e}", file.file_name)))
}

fn disposition_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

fn enc(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn list_categories(&self, merchant_id: &str) -> ClientResult<Vec<RawCategory>> {
        self.get(&format!("/api/merchants/{}/categories", enc(merchant_id)))
            .await
    }

    async fn create_category(
        &self,
        merchant_id: &str,
        fields: &CategoryFields,
        images: &[FilePayload],
    ) -> ClientResult<RawCategory> {
        let request = self
            .client
            .post(self.url(&format!("/api/merchants/{}/categories", enc(merchant_id))));
        self.send_multipart(request, entity_form(fields, images)?).await
    }

    async fn update_category(
        &self,
        id: &str,
        update: &CategoryUpdate,
        images: &[FilePayload],
    ) -> ClientResult<RawCategory> {
        let request = self.client.put(self.url(&format!("/api/categories/{}", enc(id))));
        self.send_multipart(request, entity_form(update, images)?).await
    }

    async fn delete_category(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/categories/{}", enc(id))).await
    }

    async fn toggle_category_active(&self, id: &str) -> ClientResult<()> {
        self.patch_empty(&format!("/api/categories/{}/toggle-active", enc(id)))
            .await
    }

    async fn archive_category(&self, id: &str) -> ClientResult<()> {
        self.patch_empty(&format!("/api/categories/{}/archive", enc(id)))
            .await
    }

    async fn unarchive_category(&self, id: &str) -> ClientResult<()> {
        self.patch_empty(&format!("/api/categories/{}/unarchive", enc(id)))
            .await
    }

    async fn list_products(
        &self,
        merchant_id: &str,
        category_id: &str,
    ) -> ClientResult<Vec<RawProduct>> {
        self.get(&format!(
            "/api/merchants/{}/categories/{}/products",
            enc(merchant_id),
            enc(category_id)
        ))
        .await
    }

    async fn create_product(
        &self,
        merchant_id: &str,
        category_id: &str,
        fields: &ProductFields,
        images: &[FilePayload],
    ) -> ClientResult<RawProduct> {
        let request = self.client.post(self.url(&format!(
            "/api/merchants/{}/categories/{}/products",
            enc(merchant_id),
            enc(category_id)
        )));
        self.send_multipart(request, entity_form(fields, images)?).await
    }

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
        images: &[FilePayload],
    ) -> ClientResult<RawProduct> {
        let request = self.client.put(self.url(&format!("/api/products/{}", enc(id))));
        self.send_multipart(request, entity_form(update, images)?).await
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/products/{}", enc(id))).await
    }

    async fn toggle_product_active(&self, id: &str) -> ClientResult<RawProduct> {
        let request = self.authorized(
            self.client
                .patch(self.url(&format!("/api/products/{}/toggle-active", enc(id)))),
        );
        Self::handle_response(request.send().await?).await
    }

    async fn archive_product(&self, id: &str) -> ClientResult<()> {
        self.patch_empty(&format!("/api/products/{}/archive", enc(id)))
            .await
    }

    async fn unarchive_product(&self, id: &str) -> ClientResult<()> {
        self.patch_empty(&format!("/api/products/{}/unarchive", enc(id)))
            .await
    }

    async fn import_catalog(
        &self,
        merchant_id: &str,
        target: BulkTarget,
        file: &FilePayload,
    ) -> ClientResult<ImportReport> {
        let request = self.client.post(self.url(&format!(
            "/api/merchants/{}/import/{}",
            enc(merchant_id),
            target.as_str()
        )));
        let form = Form::new().part("file", file_part(file)?);
        self.send_multipart(request, form).await
    }

    async fn export_catalog(&self, merchant_id: &str) -> ClientResult<FilePayload> {
        self.download(
            &format!("/api/merchants/{}/export", enc(merchant_id)),
            "catalog-export.xlsx",
        )
        .await
    }

    async fn download_template(&self) -> ClientResult<FilePayload> {
        self.download("/api/catalog/template", "catalog-template.xlsx")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_file_name() {
        assert_eq!(
            disposition_file_name(r#"attachment; filename="menu-2024.xlsx""#),
            Some("menu-2024.xlsx".to_string())
        );
        assert_eq!(disposition_file_name("attachment"), None);
        assert_eq!(disposition_file_name(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_ids_are_encoded() {
        assert_eq!(enc("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_base_url_trimmed() {
        let gateway = HttpGateway::new(&ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(gateway.url("/api/x"), "http://localhost:8080/api/x");
    }
}
