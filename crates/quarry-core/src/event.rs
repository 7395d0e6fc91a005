//! Change-notification boundary.
//!
//! Translator code MUST NOT depend on sinks. Edits flow through
//! [`Editor`], which is the only bridge between tree mutation and whatever
//! is listening (undo history, UI refresh).

use crate::row::{EditOp, RowError, RowPath, RowRoot};

///
/// ChangeKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeKind {
    ChildAdded,
    ChildRemoved,
    AttributePathChanged,
    CollectionOperatorChanged,
    AttributeOperatorChanged,
    AttributeValueChanged,
    PropertyChanged,
    ClassUnderQualificationChanged,
}

///
/// RowChange
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowChange {
    pub kind: ChangeKind,
    pub row: RowPath,
}

impl RowChange {
    #[must_use]
    pub const fn new(kind: ChangeKind, row: RowPath) -> Self {
        Self { kind, row }
    }
}

///
/// ChangeSink
///
/// Delivered around every successful edit: `before` with the intended
/// change, `after` with the applied one. A failed edit delivers neither.
///

pub trait ChangeSink {
    fn before(&mut self, change: &RowChange);
    fn after(&mut self, change: &RowChange);
}

///
/// NullSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn before(&mut self, _change: &RowChange) {}
    fn after(&mut self, _change: &RowChange) {}
}

/// Record every delivered event, in order. Test and undo-history helper.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub before: Vec<RowChange>,
    pub after: Vec<RowChange>,
}

impl ChangeSink for RecordingSink {
    fn before(&mut self, change: &RowChange) {
        self.before.push(change.clone());
    }

    fn after(&mut self, change: &RowChange) {
        self.after.push(change.clone());
    }
}

///
/// Editor
///

pub struct Editor<'a, S: ChangeSink> {
    root: &'a mut RowRoot,
    sink: &'a mut S,
}

impl<'a, S: ChangeSink> Editor<'a, S> {
    pub const fn new(root: &'a mut RowRoot, sink: &'a mut S) -> Self {
        Self { root, sink }
    }

    /// Apply one edit, notifying the sink before and after. The addressed
    /// row is checked first, so a sink does not see `before` for an edit
    /// that cannot resolve its target.
    pub fn apply(&mut self, op: EditOp) -> Result<RowChange, RowError> {
        if let Some(row) = op_target(&op)
            && self.root.row(row).is_none()
        {
            return Err(RowError::UnknownRow { row: row.clone() });
        }

        self.sink.before(&op.change());

        let change = self.root.apply(op)?;
        self.sink.after(&change);

        Ok(change)
    }
}

const fn op_target(op: &EditOp) -> Option<&RowPath> {
    match op {
        EditOp::AddChild { parent, .. } => Some(parent),
        EditOp::RemoveChild { row }
        | EditOp::SetAttributePath { row, .. }
        | EditOp::SetCollectionOperator { row, .. }
        | EditOp::SetCollectionOperator2 { row, .. }
        | EditOp::SetAttributeOperator { row, .. }
        | EditOp::SetAttributeValue { row, .. }
        | EditOp::SetProperty { row, .. } => Some(row),
        EditOp::SetClassUnderQualification { .. } => None,
    }
}
