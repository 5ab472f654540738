//! In-memory reference store.
//!
//! [`InMemoryRefStore`] keeps all refs in a `HashMap` behind a `RwLock`. It
//! implements the full [`RefStore`] trait and backs every Cairn repository
//! handle; refs live as long as the handle.

use std::collections::HashMap;
use std::sync::RwLock;

use cairn_types::ObjectId;

use crate::error::{RefError, Result};
use crate::names::{validate_branch_name, validate_tag_name};
use crate::traits::RefStore;
use crate::types::{Head, Ref};

#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<HashMap<String, Ref>>,
    head: RwLock<Option<Head>>,
}

impl InMemoryRefStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> RefError {
    RefError::LockPoisoned(e.to_string())
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>> {
        let refs = self.refs.read().map_err(poisoned)?;
        Ok(refs.get(name).cloned())
    }

    fn write_ref(&self, name: &str, reference: &Ref) -> Result<()> {
        match reference {
            Ref::Branch { name: bname, .. } => validate_branch_name(bname)?,
            Ref::Tag { name: tname, .. } => validate_tag_name(tname)?,
            Ref::Stash { .. } => {}
        }

        let mut refs = self.refs.write().map_err(poisoned)?;

        if let Some(existing) = refs.get(name) {
            if existing.is_tag() {
                return Err(RefError::TagImmutable {
                    name: name.to_string(),
                });
            }
        }

        refs.insert(name.to_string(), reference.clone());
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> Result<bool> {
        {
            let head = self.head.read().map_err(poisoned)?;
            if let Some(Head::Symbolic(current)) = head.as_ref() {
                if name == format!("refs/heads/{current}") {
                    return Err(RefError::DeleteCurrentBranch {
                        name: current.clone(),
                    });
                }
            }
        }

        let mut refs = self.refs.write().map_err(poisoned)?;
        Ok(refs.remove(name).is_some())
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>> {
        let refs = self.refs.read().map_err(poisoned)?;
        let mut result: Vec<(String, Ref)> = refs
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        result.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(result)
    }

    fn head(&self) -> Result<Option<Head>> {
        let head = self.head.read().map_err(poisoned)?;
        Ok(head.clone())
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        let mut head = self.head.write().map_err(poisoned)?;
        *head = Some(Head::Symbolic(branch.to_string()));
        Ok(())
    }

    fn set_head_detached(&self, commit: ObjectId) -> Result<()> {
        let mut head = self.head.write().map_err(poisoned)?;
        *head = Some(Head::Detached(commit));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STASH_REF;

    fn oid(b: u8) -> ObjectId {
        ObjectId::from_hash([b; 32])
    }

    #[test]
    fn create_and_read_branch_ref() {
        let store = InMemoryRefStore::new();
        store
            .write_ref("refs/heads/main", &Ref::branch("main", oid(10)))
            .unwrap();

        let read = store.read_ref("refs/heads/main").unwrap().unwrap();
        assert!(read.is_branch());
        assert_eq!(read.target(), &oid(10));
        assert!(store.read_ref("refs/heads/nope").unwrap().is_none());
    }

    #[test]
    fn delete_ref_reports_existence() {
        let store = InMemoryRefStore::new();
        store
            .write_ref("refs/heads/feature", &Ref::branch("feature", oid(20)))
            .unwrap();
        assert!(store.delete_ref("refs/heads/feature").unwrap());
        assert!(!store.delete_ref("refs/heads/feature").unwrap());
    }

    #[test]
    fn cannot_delete_current_branch() {
        let store = InMemoryRefStore::new();
        store
            .write_ref("refs/heads/main", &Ref::branch("main", oid(1)))
            .unwrap();
        store.set_head("main").unwrap();
        let err = store.delete_ref("refs/heads/main").unwrap_err();
        assert!(matches!(err, RefError::DeleteCurrentBranch { name } if name == "main"));
    }

    #[test]
    fn tags_are_immutable() {
        let store = InMemoryRefStore::new();
        let tag = Ref::Tag {
            name: "v1.0".into(),
            target: oid(1),
            message: "first".into(),
        };
        store.write_ref("refs/tags/v1.0", &tag).unwrap();
        let err = store.write_ref("refs/tags/v1.0", &tag).unwrap_err();
        assert!(matches!(err, RefError::TagImmutable { .. }));
        assert_eq!(store.tags().unwrap().len(), 1);
    }

    #[test]
    fn invalid_branch_name_rejected() {
        let store = InMemoryRefStore::new();
        let err = store
            .write_ref("refs/heads/bad..name", &Ref::branch("bad..name", oid(1)))
            .unwrap_err();
        assert!(matches!(err, RefError::InvalidName { .. }));
        assert!(store.set_head("has space").is_err());
    }

    #[test]
    fn stash_ref_moves_freely() {
        let store = InMemoryRefStore::new();
        store.write_ref(STASH_REF, &Ref::Stash { log: oid(1) }).unwrap();
        store.write_ref(STASH_REF, &Ref::Stash { log: oid(2) }).unwrap();
        assert_eq!(store.read_ref(STASH_REF).unwrap().unwrap().target(), &oid(2));
        assert!(store.delete_ref(STASH_REF).unwrap());
    }

    #[test]
    fn list_refs_by_prefix_sorted() {
        let store = InMemoryRefStore::new();
        store.write_ref("refs/heads/b", &Ref::branch("b", oid(2))).unwrap();
        store.write_ref("refs/heads/a", &Ref::branch("a", oid(1))).unwrap();
        store.write_ref(STASH_REF, &Ref::Stash { log: oid(3) }).unwrap();

        let names: Vec<String> = store.branches().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["refs/heads/a", "refs/heads/b"]);
        assert_eq!(store.list_refs("").unwrap().len(), 3);
    }

    #[test]
    fn resolve_unborn_branch() {
        let store = InMemoryRefStore::new();
        assert!(store.resolve_head().unwrap().is_none());
        store.set_head("main").unwrap();
        assert_eq!(store.current_branch().unwrap().as_deref(), Some("main"));
        assert!(store.resolve_head().unwrap().is_none());
    }

    #[test]
    fn advance_symbolic_head_moves_branch() {
        let store = InMemoryRefStore::new();
        store.set_head("main").unwrap();
        store.advance_head(oid(5)).unwrap();
        assert_eq!(store.resolve_head().unwrap(), Some(oid(5)));
        assert_eq!(store.head().unwrap(), Some(Head::Symbolic("main".into())));
    }

    #[test]
    fn advance_detached_head() {
        let store = InMemoryRefStore::new();
        store.set_head_detached(oid(1)).unwrap();
        store.advance_head(oid(2)).unwrap();
        assert_eq!(store.head().unwrap(), Some(Head::Detached(oid(2))));
        assert!(store.current_branch().unwrap().is_none());
    }
}
