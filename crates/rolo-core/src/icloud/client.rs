//! Remote contacts service: the `ContactsService` seam and its HTTP client.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{ICloudContact, ICloudGroup, RemoteSnapshot};
use super::token::SyncSession;
use crate::error::{Error, Result};
use crate::util::{compact_text, is_http_url, normalize_text_option};

const CLIENT_VERSION: &str = "2.1";
const LOCALE: &str = "en_US";
const ORDER: &str = "last,first";
const ORIGIN: &str = "https://www.icloud.com";

/// Operations rolo needs from the remote contacts service.
///
/// Every call takes the session explicitly: it supplies the tokens sent with
/// the request and absorbs the sync token returned by it.
#[async_trait]
pub trait ContactsService: Send + Sync {
    /// Fetch every contact and group. Establishes the session's pref token.
    async fn get_contacts_and_groups(&self, session: &mut SyncSession) -> Result<RemoteSnapshot>;

    /// Create contacts. Contacts without an id are assigned one; the
    /// contacts as sent are returned.
    async fn create_contacts(
        &self,
        session: &mut SyncSession,
        contacts: Vec<ICloudContact>,
    ) -> Result<Vec<ICloudContact>>;

    async fn update_contacts(
        &self,
        session: &mut SyncSession,
        contacts: Vec<ICloudContact>,
    ) -> Result<()>;

    async fn create_group(&self, session: &mut SyncSession, group: ICloudGroup) -> Result<()>;

    async fn update_group(&self, session: &mut SyncSession, group: ICloudGroup) -> Result<()>;

    async fn delete_group(&self, session: &mut SyncSession, group: ICloudGroup) -> Result<()>;
}

/// Connection settings for the contacts web service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ICloudSettings {
    /// Contacts web service root, e.g. `https://p28-contactsws.icloud.com`
    #[serde(default)]
    pub service_root: Option<String>,
    /// Extra query parameters sent with every call (`dsid` and friends)
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Authenticated session cookie header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl fmt::Debug for ICloudSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ICloudSettings")
            .field("service_root", &self.service_root)
            .field("params", &self.params.keys().collect::<Vec<_>>())
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ICloudSettings {
    /// Trim text fields and drop empty ones.
    pub fn normalize(&mut self) {
        self.service_root = normalize_text_option(self.service_root.take());
        self.cookie = normalize_text_option(self.cookie.take());
        self.params = std::mem::take(&mut self.params)
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.trim().to_string();
                (!key.is_empty()).then(|| (key, value.trim().to_string()))
            })
            .collect();
    }
}

/// HTTP implementation of [`ContactsService`].
#[derive(Clone)]
pub struct ICloudContactsClient {
    contacts_endpoint: String,
    params: BTreeMap<String, String>,
    cookie: Option<String>,
    client: Client,
}

impl fmt::Debug for ICloudContactsClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ICloudContactsClient")
            .field("contacts_endpoint", &self.contacts_endpoint)
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ICloudContactsClient {
    pub fn new(settings: &ICloudSettings) -> Result<Self> {
        let service_root = settings.service_root.as_deref().ok_or_else(|| {
            Error::InvalidInput("icloud.service_root is not configured".to_string())
        })?;

        Ok(Self {
            contacts_endpoint: contacts_endpoint(service_root)?,
            params: base_params(&settings.params),
            cookie: settings.cookie.clone(),
            client: Client::builder().build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.contacts_endpoint)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Origin", ORIGIN)
            .header("Accept", "application/json");
        match &self.cookie {
            Some(cookie) => request.header("Cookie", cookie),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorized(request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(parse_api_error(status, &body)));
        }
        Ok(response.json::<T>().await?)
    }

    async fn post_card(
        &self,
        session: &mut SyncSession,
        path: &str,
        method: Option<&'static str>,
        body: CardBody<'_>,
    ) -> Result<()> {
        let params = write_params(&self.params, session, method);
        let response: WriteResponse = self
            .send(self.client.post(self.url(path)).query(&params).json(&body))
            .await?;
        session.update_sync_token(&response.sync_token)
    }
}

#[async_trait]
impl ContactsService for ICloudContactsClient {
    async fn get_contacts_and_groups(&self, session: &mut SyncSession) -> Result<RemoteSnapshot> {
        let startup: StartupResponse = self
            .send(self.client.get(self.url("startup")).query(&self.params))
            .await?;
        session.set_pref_token(startup.pref_token);
        session.update_sync_token(&startup.sync_token)?;

        let params = listing_params(&self.params, session);
        let listing: ContactsResponse = self
            .send(self.client.get(self.url("contacts")).query(&params))
            .await?;

        tracing::info!(
            "Fetched {} remote contacts and {} groups",
            listing.contacts.len(),
            startup.groups.len()
        );
        Ok(RemoteSnapshot {
            contacts: listing.contacts,
            groups: startup.groups,
        })
    }

    async fn create_contacts(
        &self,
        session: &mut SyncSession,
        mut contacts: Vec<ICloudContact>,
    ) -> Result<Vec<ICloudContact>> {
        assign_contact_ids(&mut contacts);
        self.post_card(session, "contacts/card", None, CardBody::Contacts(&contacts))
            .await?;
        Ok(contacts)
    }

    async fn update_contacts(
        &self,
        session: &mut SyncSession,
        mut contacts: Vec<ICloudContact>,
    ) -> Result<()> {
        for contact in &mut contacts {
            session.clamp_etag_in_place(&mut contact.etag)?;
        }
        self.post_card(session, "contacts/card", Some("PUT"), CardBody::Contacts(&contacts))
            .await
    }

    async fn create_group(&self, session: &mut SyncSession, group: ICloudGroup) -> Result<()> {
        let body = CardBody::Groups(std::slice::from_ref(&group));
        self.post_card(session, "groups/card", None, body).await
    }

    async fn update_group(&self, session: &mut SyncSession, mut group: ICloudGroup) -> Result<()> {
        session.clamp_etag_in_place(&mut group.etag)?;
        let body = CardBody::Groups(std::slice::from_ref(&group));
        self.post_card(session, "groups/card", Some("PUT"), body)
            .await
    }

    async fn delete_group(&self, session: &mut SyncSession, mut group: ICloudGroup) -> Result<()> {
        session.clamp_etag_in_place(&mut group.etag)?;
        let body = CardBody::Groups(std::slice::from_ref(&group));
        self.post_card(session, "groups/card", Some("DELETE"), body)
            .await
    }
}

/// Request body of the `card` endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CardBody<'a> {
    Contacts(&'a [ICloudContact]),
    Groups(&'a [ICloudGroup]),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartupResponse {
    pref_token: String,
    sync_token: String,
    #[serde(default)]
    groups: Vec<ICloudGroup>,
}

#[derive(Debug, Deserialize)]
struct ContactsResponse {
    #[serde(default)]
    contacts: Vec<ICloudContact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteResponse {
    sync_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ICloudErrorResponse {
    error_reason: Option<String>,
    reason: Option<String>,
    error: Option<String>,
}

/// `{service_root}/co`, validated.
pub fn contacts_endpoint(service_root: &str) -> Result<String> {
    let trimmed = service_root.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "iCloud service root must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidInput(
            "iCloud service root must include http:// or https://".to_string(),
        ));
    }
    Ok(format!("{trimmed}/co"))
}

/// Configured parameters plus the fixed client identification.
fn base_params(configured: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut params = configured.clone();
    params.insert("clientVersion".to_string(), CLIENT_VERSION.to_string());
    params.insert("locale".to_string(), LOCALE.to_string());
    params.insert("order".to_string(), ORDER.to_string());
    params
}

fn with_tokens(base: &BTreeMap<String, String>, session: &SyncSession) -> BTreeMap<String, String> {
    let mut params = base.clone();
    params.insert("prefToken".to_string(), session.pref_token().to_string());
    params.insert("syncToken".to_string(), session.sync_token());
    params
}

fn listing_params(base: &BTreeMap<String, String>, session: &SyncSession) -> BTreeMap<String, String> {
    let mut params = with_tokens(base, session);
    params.insert("limit".to_string(), "0".to_string());
    params.insert("offset".to_string(), "0".to_string());
    params
}

fn write_params(
    base: &BTreeMap<String, String>,
    session: &SyncSession,
    method: Option<&str>,
) -> BTreeMap<String, String> {
    let mut params = with_tokens(base, session);
    if let Some(method) = method {
        params.insert("method".to_string(), method.to_string());
    }
    params
}

fn assign_contact_ids(contacts: &mut [ICloudContact]) {
    for contact in contacts {
        if contact.contact_id.is_none() {
            contact.contact_id = Some(new_remote_id());
        }
    }
}

/// Fresh identifier in the service's format (uppercase UUID v4).
pub fn new_remote_id() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ICloudErrorResponse>(body) {
        if let Some(message) = payload.error_reason.or(payload.reason).or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn session() -> SyncSession {
        let mut session = SyncSession::new();
        session.set_pref_token("pref");
        session.update_sync_token("HSC=abc@S=7").unwrap();
        session
    }

    #[test]
    fn contacts_endpoint_requires_http_root() {
        assert_eq!(
            contacts_endpoint("https://p28-contactsws.icloud.com/ ").unwrap(),
            "https://p28-contactsws.icloud.com/co"
        );
        assert!(contacts_endpoint("  ").is_err());
        assert!(contacts_endpoint("p28-contactsws.icloud.com").is_err());
    }

    #[test]
    fn base_params_keep_configured_values() {
        let configured = BTreeMap::from([("dsid".to_string(), "123".to_string())]);
        let params = base_params(&configured);
        assert_eq!(params["dsid"], "123");
        assert_eq!(params["clientVersion"], "2.1");
        assert_eq!(params["locale"], "en_US");
        assert_eq!(params["order"], "last,first");
    }

    #[test]
    fn write_params_carry_tokens_and_method() {
        let base = base_params(&BTreeMap::new());
        let params = write_params(&base, &session(), Some("PUT"));
        assert_eq!(params["prefToken"], "pref");
        assert_eq!(params["syncToken"], "HSC=abc@S=7");
        assert_eq!(params["method"], "PUT");
        assert!(!write_params(&base, &session(), None).contains_key("method"));

        let listing = listing_params(&base, &session());
        assert_eq!(listing["limit"], "0");
        assert_eq!(listing["offset"], "0");
    }

    #[test]
    fn card_bodies_wrap_payload_lists() {
        let groups = [ICloudGroup {
            group_id: "G".into(),
            name: "CTY".into(),
            ..ICloudGroup::default()
        }];
        let body = CardBody::Groups(&groups);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"groups": [{"groupId": "G", "name": "CTY", "contactIds": []}]})
        );

        let body = CardBody::Contacts(&[]);
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"contacts": []}));
    }

    #[test]
    fn new_contacts_get_uppercase_ids() {
        let mut contacts = vec![
            ICloudContact::default(),
            ICloudContact {
                contact_id: Some("KEEP".into()),
                ..ICloudContact::default()
            },
        ];
        assign_contact_ids(&mut contacts);

        let generated = contacts[0].contact_id.as_deref().unwrap();
        assert_eq!(generated.len(), 36);
        assert_eq!(generated, generated.to_uppercase());
        assert_eq!(contacts[1].contact_id.as_deref(), Some("KEEP"));
    }

    #[test]
    fn api_errors_prefer_reason_field() {
        let message = parse_api_error(
            StatusCode::CONFLICT,
            r#"{"errorCode": "CONFLICT", "errorReason": "etag mismatch"}"#,
        );
        assert_eq!(message, "etag mismatch (409)");
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
    }

    #[test]
    fn client_requires_service_root() {
        assert!(ICloudContactsClient::new(&ICloudSettings::default()).is_err());
    }

    #[test]
    fn settings_debug_redacts_cookie() {
        let settings = ICloudSettings {
            service_root: Some("https://example.com".into()),
            params: BTreeMap::from([("dsid".to_string(), "secret-dsid".to_string())]),
            cookie: Some("X-APPLE-WEBAUTH-TOKEN=secret".into()),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn settings_normalize_drops_blank_values() {
        let mut settings = ICloudSettings {
            service_root: Some("  ".into()),
            params: BTreeMap::from([
                (" dsid ".to_string(), " 42 ".to_string()),
                (String::new(), "x".to_string()),
            ]),
            cookie: Some(" c=1 ".into()),
        };
        settings.normalize();
        assert_eq!(settings.service_root, None);
        assert_eq!(settings.cookie.as_deref(), Some("c=1"));
        assert_eq!(
            settings.params,
            BTreeMap::from([("dsid".to_string(), "42".to_string())])
        );
    }
}
