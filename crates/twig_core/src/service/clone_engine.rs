//! Clone Engine: seeds a new twiglet from an existing one.
//!
//! # Invariants
//! - Graph data (`nodes`, `links`) and the model reference are copied
//!   verbatim; the copy owns its own values.
//! - Name and description come from the caller, never from the source.
//! - The clone starts a fresh single-entry changelog.

use crate::model::document::Document;
use crate::model::twiglet::TwigletPayload;
use crate::repo::entity_repo::{DocumentDraft, TwigletRepository};
use crate::repo::error::RepoResult;
use crate::store::DocumentStore;
use log::info;

/// Parameters of one clone operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub source_name: String,
    pub new_name: String,
    pub new_description: String,
    pub commit_message: String,
}

/// Builds the payload of a clone of `source`.
pub fn cloned_payload(source: &TwigletPayload, new_description: &str) -> TwigletPayload {
    TwigletPayload {
        description: new_description.to_string(),
        model: source.model.clone(),
        nodes: source.nodes.clone(),
        links: source.links.clone(),
    }
}

/// Creates `request.new_name` as a copy of `request.source_name`.
///
/// # Errors
/// - `NotFound` if the source does not exist.
/// - `DuplicateName` if the target name is taken.
pub fn clone_from<S: DocumentStore>(
    twiglets: &TwigletRepository<S>,
    request: &CloneRequest,
    actor: &str,
) -> RepoResult<Document<TwigletPayload>> {
    let source = twiglets.find_by_name(&request.source_name)?;
    let payload = cloned_payload(&source.payload, &request.new_description);
    let clone = twiglets.create(
        DocumentDraft::new(request.new_name.as_str(), payload),
        &request.commit_message,
        actor,
    )?;
    info!(
        "event=twiglet_clone module=service status=ok source={} target={} nodes={} links={}",
        source.name,
        clone.name,
        clone.payload.nodes.len(),
        clone.payload.links.len()
    );
    Ok(clone)
}

#[cfg(test)]
mod tests {
    use super::cloned_payload;
    use crate::model::twiglet::TwigletPayload;
    use serde_json::json;

    #[test]
    fn cloned_payload_takes_graph_but_not_description() {
        let source = TwigletPayload {
            description: "source description".to_string(),
            model: "bsc".to_string(),
            nodes: vec![json!({ "a": "node" })],
            links: vec![json!({ "a": "link" })],
        };

        let mut copy = cloned_payload(&source, "fresh");
        assert_eq!(copy.description, "fresh");
        assert_eq!(copy.model, "bsc");
        assert_eq!(copy.nodes, source.nodes);

        copy.nodes[0]["a"] = json!("changed");
        assert_eq!(source.nodes[0], json!({ "a": "node" }));
    }
}
