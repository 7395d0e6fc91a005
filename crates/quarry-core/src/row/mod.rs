//! The edit tree: a mutable, row-oriented view of a query under
//! construction. Rows own their children; there are no parent pointers.
//! Anything that needs to address a row does so with a [`RowPath`], and
//! every edit returns a [`RowChange`] describing what happened, which is
//! what the undo/UI layers subscribe to.
//!
//! [`RowChange`]: crate::event::RowChange

#[cfg(test)]
mod tests;

use crate::{
    event::{ChangeKind, RowChange},
    path::AttributePath,
    value::Value,
};
use crate::expr::names;
use derive_more::{Deref, DerefMut, IntoIterator};
use quarry_schema::{AttributeType, Sentinel};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// RowPath
///
/// Child-index chain addressing a row from the root. The root itself is
/// the empty path.
///

#[derive(
    Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, IntoIterator, PartialEq, Serialize,
)]
pub struct RowPath(#[into_iterator(owned, ref)] Vec<usize>);

impl RowPath {
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut out = self.0.clone();
        out.push(index);

        Self(out)
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for RowPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl std::fmt::Display for RowPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{index}")?;
        }

        Ok(())
    }
}

///
/// CollectionOperator
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CollectionOperator {
    Count,
    Any,
    All,
    None,
}

impl CollectionOperator {
    /// ANY/ALL/NONE quantify over children; COUNT pairs with a numeric
    /// comparison instead.
    #[must_use]
    pub const fn is_compound(self) -> bool {
        matches!(self, Self::Any | Self::All | Self::None)
    }
}

impl std::fmt::Display for CollectionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Count => "count",
            Self::Any => "any",
            Self::All => "all",
            Self::None => "none",
        };

        write!(f, "{s}")
    }
}

///
/// AttributeOperator
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AttributeOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Matches,
    NotMatches,
    MatchesCi,
    NotMatchesCi,
    IsNull,
    IsNotNull,
    IsTrue,
    IsFalse,
}

impl AttributeOperator {
    /// Whether the operator compares against a user-supplied value.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(
            self,
            Self::IsNull | Self::IsNotNull | Self::IsTrue | Self::IsFalse
        )
    }

    /// The expression-tree spelling for the plain comparison operators.
    /// The null checks and boolean collapses have multi-node encodings and
    /// no single symbol.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        match self {
            Self::Eq => Some(names::EQ),
            Self::Ne => Some(names::NE),
            Self::Lt => Some(names::LT),
            Self::Lte => Some(names::LTE),
            Self::Gt => Some(names::GT),
            Self::Gte => Some(names::GTE),
            Self::Matches => Some(names::MATCHES),
            Self::NotMatches => Some(names::NOT_MATCHES),
            Self::MatchesCi => Some(names::MATCHES_CI),
            Self::NotMatchesCi => Some(names::NOT_MATCHES_CI),
            Self::IsNull | Self::IsNotNull | Self::IsTrue | Self::IsFalse => None,
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            names::EQ => Some(Self::Eq),
            names::NE => Some(Self::Ne),
            names::LT => Some(Self::Lt),
            names::LTE => Some(Self::Lte),
            names::GT => Some(Self::Gt),
            names::GTE => Some(Self::Gte),
            names::MATCHES => Some(Self::Matches),
            names::NOT_MATCHES => Some(Self::NotMatches),
            names::MATCHES_CI => Some(Self::MatchesCi),
            names::NOT_MATCHES_CI => Some(Self::NotMatchesCi),
            _ => None,
        }
    }
}

///
/// KeyedProperty
///
/// User-supplied key name and value type for a keyed-map attribute row.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyedProperty {
    pub name: String,
    pub ty: AttributeType,
}

impl KeyedProperty {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: AttributeType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

///
/// RowData
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RowData {
    pub attribute_path: AttributePath,
    pub collection_operator: Option<CollectionOperator>,
    /// Second-level quantifier: set only when a quantified to-many
    /// attribute's elements are themselves quantified.
    pub collection_operator2: Option<CollectionOperator>,
    pub attribute_operator: Option<AttributeOperator>,
    pub attribute_value: Option<Value>,
    /// Key name and value type; meaningful only when the childmost
    /// attribute is a keyed-map kind.
    pub prop: Option<KeyedProperty>,
    pub children: Vec<RowData>,
}

impl RowData {
    #[must_use]
    pub fn new(attribute_path: AttributePath) -> Self {
        Self {
            attribute_path,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_collection_operator(mut self, op: CollectionOperator) -> Self {
        self.collection_operator = Some(op);
        self
    }

    #[must_use]
    pub fn with_collection_operator2(mut self, op: CollectionOperator) -> Self {
        self.collection_operator2 = Some(op);
        self
    }

    #[must_use]
    pub fn with_comparison(mut self, op: AttributeOperator, value: impl Into<Value>) -> Self {
        self.attribute_operator = Some(op);
        self.attribute_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_operator(mut self, op: AttributeOperator) -> Self {
        self.attribute_operator = Some(op);
        self
    }

    #[must_use]
    pub fn with_prop(mut self, prop: KeyedProperty) -> Self {
        self.prop = Some(prop);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self.collection_operator, Some(op) if op.is_compound())
    }

    fn descend(&self, path: &[usize]) -> Option<&Self> {
        match path {
            [] => Some(self),
            [head, rest @ ..] => self.children.get(*head)?.descend(rest),
        }
    }

    fn descend_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        match path {
            [] => Some(self),
            [head, rest @ ..] => self.children.get_mut(*head)?.descend_mut(rest),
        }
    }
}

///
/// RowRoot
///
/// The root of an edit tree. Owns the class under qualification; the root
/// row is the only row allowed an empty attribute path.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RowRoot {
    pub class_under_qualification: String,
    pub row: RowData,
}

impl RowRoot {
    /// A fresh tree quantifying `class` with the given root operator.
    #[must_use]
    pub fn new(class: impl Into<String>, operator: CollectionOperator) -> Self {
        Self {
            class_under_qualification: class.into(),
            row: RowData::default().with_collection_operator(operator),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: RowData) -> Self {
        self.row.children.push(child);
        self
    }

    #[must_use]
    pub fn row(&self, path: &RowPath) -> Option<&RowData> {
        self.row.descend(path)
    }

    #[must_use]
    pub fn row_mut(&mut self, path: &RowPath) -> Option<&mut RowData> {
        self.row.descend_mut(path)
    }

    /// Apply one edit command, returning a description of the change.
    /// The tree is untouched when the command fails.
    pub fn apply(&mut self, op: EditOp) -> Result<RowChange, RowError> {
        let change = op.change();

        match op {
            EditOp::AddChild { parent, row } => {
                let parent_row = self.row_checked_mut(&parent)?;
                parent_row.children.push(row);

                let index = parent_row.children.len() - 1;
                return Ok(RowChange::new(ChangeKind::ChildAdded, parent.child(index)));
            }
            EditOp::RemoveChild { row } => {
                let (parent, index) = split_parent(&row)?;
                let parent_row = self.row_checked_mut(&parent)?;

                if index >= parent_row.children.len() {
                    return Err(RowError::UnknownRow { row });
                }
                parent_row.children.remove(index);
            }
            EditOp::SetAttributePath { row, path } => {
                self.row_checked_mut(&row)?.attribute_path = path;
            }
            EditOp::SetCollectionOperator { row, op } => {
                self.row_checked_mut(&row)?.collection_operator = op;
            }
            EditOp::SetCollectionOperator2 { row, op } => {
                self.row_checked_mut(&row)?.collection_operator2 = op;
            }
            EditOp::SetAttributeOperator { row, op } => {
                let data = self.row_checked_mut(&row)?;
                data.attribute_operator = op;

                // operators without a value drop any stale value
                if !op.is_some_and(AttributeOperator::takes_value) {
                    data.attribute_value = None;
                }
            }
            EditOp::SetAttributeValue { row, value } => {
                self.row_checked_mut(&row)?.attribute_value = value;
            }
            EditOp::SetProperty { row, prop } => {
                self.row_checked_mut(&row)?.prop = prop;
            }
            EditOp::SetClassUnderQualification { class } => {
                self.class_under_qualification = class;
            }
        }

        Ok(change)
    }

    fn row_checked_mut(&mut self, path: &RowPath) -> Result<&mut RowData, RowError> {
        self.row_mut(path).ok_or_else(|| RowError::UnknownRow {
            row: path.clone(),
        })
    }

    /// Check the whole tree against the structural invariants. Encoding is
    /// only defined over trees this accepts.
    pub fn validate(&self) -> Result<(), RowError> {
        validate_row(&self.row, &RowPath::root())
    }
}

fn split_parent(path: &RowPath) -> Result<(RowPath, usize), RowError> {
    match path.split_last() {
        Some((index, parent)) => Ok((RowPath::from(parent.to_vec()), *index)),
        None => Err(RowError::RootRemoval),
    }
}

fn validate_row(row: &RowData, at: &RowPath) -> Result<(), RowError> {
    if !row.attribute_path.is_legal() {
        return Err(RowError::SelectAttribute { row: at.clone() });
    }

    // the keyed per-user form is compound but carries its comparison
    // inline instead of in child rows
    let keyed_per_user = row
        .attribute_path
        .childmost()
        .is_some_and(|a| a.ty == AttributeType::PerUserParametersMap);

    if row.is_compound() && row.children.is_empty() && !keyed_per_user {
        return Err(RowError::EmptyCompoundRow { row: at.clone() });
    }

    if keyed_per_user && !row.children.is_empty() {
        return Err(RowError::UnexpectedChildren { row: at.clone() });
    }

    if !at.is_root() && row.attribute_path.is_empty() {
        return Err(RowError::EmptyAttributePath { row: at.clone() });
    }

    if let Some(op) = row.attribute_operator
        && !op.takes_value()
        && row.attribute_value.is_some()
    {
        return Err(RowError::ValueForValuelessOperator { row: at.clone() });
    }

    if row.collection_operator2.is_some() {
        let first_compound = row
            .collection_operator
            .is_some_and(CollectionOperator::is_compound);
        let second_compound = row
            .collection_operator2
            .is_some_and(CollectionOperator::is_compound);
        let childmost_ok = row.attribute_path.childmost().is_some_and(|a| {
            a.cardinality.is_to_many() && !a.ty.is_map_family()
        });

        if !(first_compound && second_compound && childmost_ok) {
            return Err(RowError::MisplacedSecondOperator { row: at.clone() });
        }
    }

    // keyed-map rows must carry a compound quantifier when per-user scoped
    if row
        .attribute_path
        .childmost()
        .is_some_and(|a| a.ty == AttributeType::PerUserParametersMap)
        && !row.is_compound()
    {
        return Err(RowError::MissingQuantifier { row: at.clone() });
    }

    // null sentinels are only meaningful as the childmost segment
    for (i, attr) in row.attribute_path.iter().enumerate() {
        if matches!(
            attr.sentinel(),
            Some(Sentinel::IsNull | Sentinel::IsNotNull)
        ) && i + 1 != row.attribute_path.len()
        {
            return Err(RowError::MisplacedSentinel { row: at.clone() });
        }
    }

    for (index, child) in row.children.iter().enumerate() {
        validate_row(child, &at.child(index))?;
    }

    Ok(())
}

///
/// EditOp
///
/// Edit commands over the tree. An explicit command enum (rather than ad
/// hoc mutation) is what lets the event layer describe every change.
///

#[derive(Clone, Debug, PartialEq)]
pub enum EditOp {
    AddChild { parent: RowPath, row: RowData },
    RemoveChild { row: RowPath },
    SetAttributePath { row: RowPath, path: AttributePath },
    SetCollectionOperator {
        row: RowPath,
        op: Option<CollectionOperator>,
    },
    SetCollectionOperator2 {
        row: RowPath,
        op: Option<CollectionOperator>,
    },
    SetAttributeOperator {
        row: RowPath,
        op: Option<AttributeOperator>,
    },
    SetAttributeValue { row: RowPath, value: Option<Value> },
    SetProperty {
        row: RowPath,
        prop: Option<KeyedProperty>,
    },
    SetClassUnderQualification { class: String },
}

impl EditOp {
    /// The change this command will report if it succeeds. AddChild is the
    /// one op whose final row path is known only after application.
    #[must_use]
    pub fn change(&self) -> RowChange {
        match self {
            Self::AddChild { parent, .. } => {
                RowChange::new(ChangeKind::ChildAdded, parent.clone())
            }
            Self::RemoveChild { row } => RowChange::new(ChangeKind::ChildRemoved, row.clone()),
            Self::SetAttributePath { row, .. } => {
                RowChange::new(ChangeKind::AttributePathChanged, row.clone())
            }
            Self::SetCollectionOperator { row, .. } | Self::SetCollectionOperator2 { row, .. } => {
                RowChange::new(ChangeKind::CollectionOperatorChanged, row.clone())
            }
            Self::SetAttributeOperator { row, .. } => {
                RowChange::new(ChangeKind::AttributeOperatorChanged, row.clone())
            }
            Self::SetAttributeValue { row, .. } => {
                RowChange::new(ChangeKind::AttributeValueChanged, row.clone())
            }
            Self::SetProperty { row, .. } => {
                RowChange::new(ChangeKind::PropertyChanged, row.clone())
            }
            Self::SetClassUnderQualification { .. } => RowChange::new(
                ChangeKind::ClassUnderQualificationChanged,
                RowPath::root(),
            ),
        }
    }
}

///
/// RowError
///
/// Structural invariant violations, each naming the offending row.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RowError {
    #[error("no row at {row}")]
    UnknownRow { row: RowPath },

    #[error("the root row cannot be removed")]
    RootRemoval,

    #[error("row {row} still contains the attribute placeholder")]
    SelectAttribute { row: RowPath },

    #[error("compound row {row} has no children")]
    EmptyCompoundRow { row: RowPath },

    #[error("non-root row {row} has an empty attribute path")]
    EmptyAttributePath { row: RowPath },

    #[error("row {row} carries a value for a valueless operator")]
    ValueForValuelessOperator { row: RowPath },

    #[error("row {row} has a second collection operator outside a quantified to-many chain")]
    MisplacedSecondOperator { row: RowPath },

    #[error("keyed per-user row {row} has no compound quantifier")]
    MissingQuantifier { row: RowPath },

    #[error("row {row} has a null sentinel before the end of its path")]
    MisplacedSentinel { row: RowPath },

    #[error("keyed per-user row {row} cannot have child rows")]
    UnexpectedChildren { row: RowPath },
}
