//! Lazy cross-references between model nodes

use crate::model::NodeId;
use std::fmt;
use std::marker::PhantomData;

/// A named pointer to another node that may or may not have been resolved
///
/// The target is a [`NodeId`], never an owning handle: dereferencing goes
/// through a [`ModelIndex`](crate::model::ModelIndex). An unresolved reference
/// has no target and usually carries the linker's error message.
pub struct Reference<T> {
    ref_text: String,
    target: Option<NodeId>,
    error: Option<String>,
    marker: PhantomData<fn() -> T>,
}

impl<T> Reference<T> {
    /// A reference that has not been linked yet
    pub fn unresolved(ref_text: impl Into<String>) -> Self {
        Self {
            ref_text: ref_text.into(),
            target: None,
            error: None,
            marker: PhantomData,
        }
    }

    /// A reference already pointing at its target
    pub fn resolved(ref_text: impl Into<String>, target: NodeId) -> Self {
        Self {
            ref_text: ref_text.into(),
            target: Some(target),
            error: None,
            marker: PhantomData,
        }
    }

    /// A reference whose resolution failed
    pub fn failed(ref_text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            ref_text: ref_text.into(),
            target: None,
            error: Some(error.into()),
            marker: PhantomData,
        }
    }

    /// The textual identifier as written in the model
    pub fn ref_text(&self) -> &str {
        &self.ref_text
    }

    /// Resolved target, if any
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Resolution failure message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    /// Point the reference at a target, clearing any previous error
    pub fn resolve(&mut self, target: NodeId) {
        self.target = Some(target);
        self.error = None;
    }

    /// Record a resolution failure, clearing any previous target
    pub fn fail(&mut self, error: impl Into<String>) {
        self.target = None;
        self.error = Some(error.into());
    }
}

impl<T> Clone for Reference<T> {
    fn clone(&self) -> Self {
        Self {
            ref_text: self.ref_text.clone(),
            target: self.target,
            error: self.error.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Reference<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ref_text == other.ref_text && self.target == other.target && self.error == other.error
    }
}

impl<T> Eq for Reference<T> {}

impl<T> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("ref_text", &self.ref_text)
            .field("target", &self.target)
            .field("error", &self.error)
            .finish()
    }
}
