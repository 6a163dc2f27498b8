// crates/relink-core/src/resolution.rs
//
// The hand-off to a human. The engine emits `missing_files`; whatever dialog
// the UI shows sends back one decision per file it wants to act on.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::asset::MediaAsset;
use crate::reference::SavedMediaReference;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionAction {
    /// User pointed at the file's new location.
    Found,
    /// User dropped the reference from the project.
    Remove,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDecision {
    #[serde(rename = "ref")]
    pub reference: SavedMediaReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path:  Option<PathBuf>,
    pub action:    ResolutionAction,
}

impl ResolutionDecision {
    pub fn found(reference: SavedMediaReference, new_path: impl Into<PathBuf>) -> Self {
        Self { reference, new_path: Some(new_path.into()), action: ResolutionAction::Found }
    }

    pub fn remove(reference: SavedMediaReference) -> Self {
        Self { reference, new_path: None, action: ResolutionAction::Remove }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub found_files:   Vec<MediaAsset>,
    pub removed_files: Vec<SavedMediaReference>,
}

impl ResolutionOutcome {
    /// Apply a batch of decisions. A `found` decision without a path can't
    /// produce an asset and is treated as a removal.
    pub fn from_decisions(decisions: Vec<ResolutionDecision>) -> Self {
        let mut out = Self::default();
        for d in decisions {
            match (d.action, d.new_path) {
                (ResolutionAction::Found, Some(path)) => {
                    out.found_files.push(MediaAsset::from_reference(&d.reference, &path));
                }
                (ResolutionAction::Found, None) => {
                    log::warn!("[resolve] '{}' marked found without a path, removing", d.reference.name);
                    out.removed_files.push(d.reference);
                }
                (ResolutionAction::Remove, _) => out.removed_files.push(d.reference),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference(name: &str) -> SavedMediaReference {
        serde_json::from_value(json!({
            "id": name,
            "originalPath": format!("/old/{name}"),
            "name": name,
            "size": 1,
            "lastModified": 0
        }))
        .unwrap()
    }

    #[test]
    fn decisions_split_into_found_and_removed() {
        let out = ResolutionOutcome::from_decisions(vec![
            ResolutionDecision::found(reference("a.mp4"), "/new/a.mp4"),
            ResolutionDecision::remove(reference("b.mp4")),
            ResolutionDecision { reference: reference("c.mp4"), new_path: None, action: ResolutionAction::Found },
        ]);
        assert_eq!(out.found_files.len(), 1);
        assert_eq!(out.found_files[0].path, PathBuf::from("/new/a.mp4"));
        let removed: Vec<_> = out.removed_files.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(removed, ["b.mp4", "c.mp4"]);
    }

    #[test]
    fn decision_wire_format_uses_ref_key() {
        let d: ResolutionDecision = serde_json::from_value(json!({
            "ref": reference("a.mp4"),
            "newPath": "/x/a.mp4",
            "action": "found"
        }))
        .unwrap();
        assert_eq!(d.action, ResolutionAction::Found);
        assert_eq!(d.new_path, Some(PathBuf::from("/x/a.mp4")));
    }
}
