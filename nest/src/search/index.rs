//! RediSearch index management and `FT.SEARCH` execution over RedisJSON documents.

use std::borrow::Cow;

use redis::{Value, aio::ConnectionManager, cmd};
use serde::de::DeserializeOwned;

use super::{FilterCondition, SearchResult, SortOrder, query_string};
use crate::errors::RepoError;

/// RediSearch's default MAXSEARCHRESULTS; larger LIMITs are rejected by the server.
pub const MAX_SEARCH_RESULTS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Tag,
    Text,
    Numeric,
}

impl FieldKind {
    const fn keyword(self) -> &'static str {
        match self {
            FieldKind::Tag => "TAG",
            FieldKind::Text => "TEXT",
            FieldKind::Numeric => "NUMERIC",
        }
    }
}

/// Separator for TAG fields holding one whole value. RediSearch splits on `,` unless told
/// otherwise; the unit separator never appears in user-entered text.
pub const WHOLE_VALUE_SEPARATOR: char = '\u{1f}';

/// One JSONPath projected into the index under `name`.
#[derive(Debug, Clone, Copy)]
pub struct IndexField {
    pub path: &'static str,
    pub name: &'static str,
    pub kind: FieldKind,
    pub sortable: bool,
    /// TAG only: `SEPARATOR` character; `None` keeps the server default.
    pub separator: Option<char>,
    /// TAG only: match with case preserved.
    pub case_sensitive: bool,
}

#[derive(Debug, Clone)]
pub struct IndexDefinition {
    pub name: String,
    pub key_prefix: String,
    pub fields: &'static [IndexField],
}

impl IndexDefinition {
    fn create_command(&self) -> redis::Cmd {
        let mut command = cmd("FT.CREATE");
        command
            .arg(&self.name)
            .arg("ON")
            .arg("JSON")
            .arg("PREFIX")
            .arg(1)
            .arg(&self.key_prefix)
            .arg("SCHEMA");
        for field in self.fields {
            command.arg(field.path).arg("AS").arg(field.name).arg(field.kind.keyword());
            if field.kind == FieldKind::Tag {
                if let Some(separator) = field.separator {
                    command.arg("SEPARATOR").arg(separator.to_string());
                }
                if field.case_sensitive {
                    command.arg("CASESENSITIVE");
                }
            }
            if field.sortable {
                command.arg("SORTABLE");
            }
        }
        command
    }
}

/// Create the index unless it already exists.
pub async fn ensure_index(conn: &mut ConnectionManager, definition: &IndexDefinition) -> Result<(), RepoError> {
    match definition.create_command().query_async::<()>(conn).await {
        Ok(()) => {
            log::info!("created search index {}", definition.name);
            Ok(())
        }
        Err(err) if err.to_string().contains("Index already exists") => {
            log::debug!("search index {} already present", definition.name);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// A single `FT.SEARCH` invocation returning whole JSON documents.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub index: &'a str,
    pub condition: &'a FilterCondition,
    pub sort_by: Option<(&'static str, SortOrder)>,
    pub limit: u64,
}

impl<'a> SearchRequest<'a> {
    pub fn new(index: &'a str, condition: &'a FilterCondition) -> Self {
        Self {
            index,
            condition,
            sort_by: None,
            limit: MAX_SEARCH_RESULTS,
        }
    }

    pub fn sorted_by(mut self, field: &'static str, order: SortOrder) -> Self {
        self.sort_by = Some((field, order));
        self
    }

    fn command(&self) -> redis::Cmd {
        let query = query_string(self.condition);
        log::debug!("FT.SEARCH {} {}", self.index, query);

        let mut command = cmd("FT.SEARCH");
        command.arg(self.index).arg(query);
        if let Some((field, order)) = self.sort_by {
            command.arg("SORTBY").arg(field).arg(order.keyword());
        }
        command
            .arg("LIMIT")
            .arg(0)
            .arg(self.limit)
            .arg("RETURN")
            .arg(1)
            .arg("$")
            .arg("DIALECT")
            .arg(3);
        command
    }
}

pub async fn run_search<T: DeserializeOwned>(
    conn: &mut ConnectionManager,
    request: &SearchRequest<'_>,
) -> Result<SearchResult<T>, RepoError> {
    let reply: Value = request.command().query_async(conn).await?;
    parse_search_reply(reply)
}

/// Decode the RESP2 reply `[total, key, [field, value, ...], key, [...], ...]`.
fn parse_search_reply<T: DeserializeOwned>(reply: Value) -> Result<SearchResult<T>, RepoError> {
    let Value::Array(entries) = reply else {
        return Err(malformed(format!("expected an array, got {reply:?}")));
    };
    let mut entries = entries.into_iter();

    let total = match entries.next() {
        Some(Value::Int(total)) => u64::try_from(total).map_err(|_| malformed("negative total"))?,
        Some(other) => return Err(malformed(format!("expected a total count, got {other:?}"))),
        None => return Ok(SearchResult { items: Vec::new(), total: 0 }),
    };

    let mut items = Vec::new();
    while let Some(_key) = entries.next() {
        let Some(Value::Array(fields)) = entries.next() else {
            return Err(malformed("document without a field list"));
        };
        let json = fields
            .chunks(2)
            .find_map(|pair| match pair {
                [name, value] if text_of(name).as_deref() == Some("$") => text_of(value),
                _ => None,
            })
            .ok_or_else(|| malformed("document without a `$` field"))?;
        items.push(decode_document(&json)?);
    }

    Ok(SearchResult { items, total })
}

/// Deserialize a RedisJSON payload. `$`-path reads come back wrapped in a one-element array.
pub fn decode_document<T: DeserializeOwned>(json: &str) -> Result<T, RepoError> {
    match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Array(mut wrapped) if wrapped.len() == 1 => Ok(serde_json::from_value(wrapped.remove(0))?),
        document => Ok(serde_json::from_value(document)?),
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes.clone()).ok(),
        Value::SimpleString(text) => Some(text.clone()),
        Value::VerbatimString { text, .. } => Some(text.clone()),
        _ => None,
    }
}

fn malformed(detail: impl Into<Cow<'static, str>>) -> RepoError {
    let detail = detail.into();
    RepoError::Other {
        message: Cow::Owned(format!("malformed FT.SEARCH reply: {detail}")),
    }
}
