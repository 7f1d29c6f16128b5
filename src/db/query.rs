use std::fmt::Display;

use reqwest::{header, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::auth::session::Session;
use crate::db::client::{send, Backend};
use crate::error::AppResult;

const OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// One request against a remote table, built up the same way the data API
/// spells it: `select`, column filters, `order`, then a verb.
pub struct Query<'a> {
    backend: &'a Backend,
    table: String,
    params: Vec<(String, String)>,
    session: Option<&'a Session>,
    single: bool,
}

impl<'a> Query<'a> {
    pub(crate) fn new(backend: &'a Backend, table: &str) -> Self {
        Self {
            backend,
            table: table.to_string(),
            params: Vec::new(),
            session: None,
            single: false,
        }
    }

    /// Run as `session`'s user instead of anonymously.
    pub fn auth(mut self, session: Option<&'a Session>) -> Self {
        self.session = session;
        self
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.retain(|(k, _)| k != "select");
        self.params.push(("select".into(), columns.into()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.into(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.params.push(("order".into(), format!("{}.{}", column, dir)));
        self
    }

    /// Expect exactly one row; zero or several rows is a rejection.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> AppResult<T> {
        let builder = self.request(Method::GET);
        let response = send(builder).await?;
        Ok(response.json::<T>().await?)
    }

    /// Insert `body` and return the stored representation.
    pub async fn insert<B, T>(self, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(body);
        let response = send(builder).await?;
        Ok(response.json::<T>().await?)
    }

    /// Patch every row matching the filters and return the new rows.
    pub async fn update<B, T>(self, patch: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::PATCH)
            .header("Prefer", "return=representation")
            .json(patch);
        let response = send(builder).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn delete(self) -> AppResult<()> {
        let builder = self
            .request(Method::DELETE)
            .header("Prefer", "return=minimal");
        send(builder).await?;
        Ok(())
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        let url = self.backend.config().rest_url(&self.table);
        tracing::debug!(table = %self.table, method = %method, params = ?self.params, "Backend request");

        let mut builder = self
            .backend
            .http()
            .request(method, url)
            .query(&self.params);
        if self.single {
            builder = builder.header(header::ACCEPT, OBJECT_MEDIA_TYPE);
        }
        self.backend.authorize(builder, self.session)
    }
}
