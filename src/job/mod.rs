//! Job identity and the job definition threaded through the role pages
//!
//! Nothing here is stored server-side. A `JobId` is minted once and then
//! round-tripped through the browser in URLs; a `JobDefinition` is rebuilt
//! from request parameters on every coordinator request.

use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};

pub mod view;

pub use view::View;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque job identifier, safe to embed as a URL path segment.
///
/// Only ASCII alphanumerics are accepted. Uniqueness is not enforced; two
/// unrelated jobs may end up sharing an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Validate an id received from a request path.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Error::InvalidJobId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Encode a number in lowercase base 36.
    pub fn from_number(mut n: u64) -> Self {
        if n == 0 {
            return Self("0".to_string());
        }

        let mut digits = Vec::new();
        while n > 0 {
            digits.push(BASE36_DIGITS[(n % 36) as usize]);
            n /= 36;
        }
        digits.reverse();

        // Every byte comes from BASE36_DIGITS
        Self(digits.into_iter().map(char::from).collect())
    }

    /// Decode the id as a base-36 number. `None` if it does not fit in a `u64`.
    pub fn to_number(&self) -> Option<u64> {
        u64::from_str_radix(&self.0, 36).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The three perspectives on a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creation,
    Coordinator,
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creation => "creation",
            Role::Coordinator => "coordinator",
            Role::Worker => "worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinator parameters as they arrive on the wire.
///
/// Every field is optional. Missing values are not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobForm {
    pub mapper: Option<String>,
    pub reducer: Option<String>,
    pub dataurl: Option<String>,
}

impl JobForm {
    /// Collect the coordinator fields from decoded key/value pairs.
    ///
    /// The first value of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> JobForm
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = JobForm::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "mapper" => &mut form.mapper,
                "reducer" => &mut form.reducer,
                "dataurl" => &mut form.dataurl,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        form
    }

    /// Combine body and query parameters, field by field, body first.
    pub fn merge(body: JobForm, query: JobForm) -> JobForm {
        JobForm {
            mapper: body.mapper.or(query.mapper),
            reducer: body.reducer.or(query.reducer),
            dataurl: body.dataurl.or(query.dataurl),
        }
    }
}

/// Mapper, reducer and data source of one job, bound to its id.
///
/// Built fresh for every request. The same id can carry a different
/// definition on the next request; nothing ties the two together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDefinition {
    pub id: JobId,
    pub mapper_code: String,
    pub reducer_code: String,
    pub data_url: String,
}

impl JobDefinition {
    pub fn new(
        id: JobId,
        mapper_code: impl Into<String>,
        reducer_code: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            mapper_code: mapper_code.into(),
            reducer_code: reducer_code.into(),
            data_url: data_url.into(),
        }
    }

    pub fn from_form(id: JobId, form: JobForm) -> Self {
        Self {
            id,
            mapper_code: form.mapper.unwrap_or_default(),
            reducer_code: form.reducer.unwrap_or_default(),
            data_url: form.dataurl.unwrap_or_default(),
        }
    }
}
