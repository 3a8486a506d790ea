//! Conversion between typed documents and raw store bodies.
//!
//! Body layout: `{ "name": .., "changelog": [..], ..payload fields }`.

use super::error::{RepoError, RepoResult};
use crate::model::changelog::ChangelogEntry;
use crate::model::document::{Document, DocumentPayload};
use crate::store::RawDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
struct BodyRef<'a, P> {
    name: &'a str,
    changelog: &'a [ChangelogEntry],
    #[serde(flatten)]
    payload: &'a P,
}

#[derive(Deserialize)]
struct BodyOwned<P> {
    name: String,
    #[serde(default)]
    changelog: Vec<ChangelogEntry>,
    #[serde(flatten)]
    payload: P,
}

pub(crate) fn encode_body<P: DocumentPayload>(
    name: &str,
    changelog: &[ChangelogEntry],
    payload: &P,
) -> RepoResult<Value> {
    serde_json::to_value(BodyRef {
        name,
        changelog,
        payload,
    })
    .map_err(|err| RepoError::InvalidData(format!("failed to encode {}: {err}", P::KIND)))
}

pub(crate) fn encode<P: DocumentPayload>(document: &Document<P>) -> RepoResult<RawDocument> {
    Ok(RawDocument {
        internal_id: document.internal_id,
        revision: document.revision.clone(),
        name: document.name.clone(),
        body: encode_body(&document.name, &document.changelog, &document.payload)?,
    })
}

pub(crate) fn decode<P: DocumentPayload>(raw: RawDocument) -> RepoResult<Document<P>> {
    let body: BodyOwned<P> = serde_json::from_value(raw.body).map_err(|err| {
        RepoError::InvalidData(format!(
            "{} {} does not decode: {err}",
            P::KIND,
            raw.internal_id
        ))
    })?;

    Ok(Document {
        internal_id: raw.internal_id,
        revision: raw.revision,
        name: body.name,
        changelog: body.changelog,
        payload: body.payload,
    })
}
