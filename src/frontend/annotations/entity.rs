//! Program entities that attributes attach to.

use std::fmt;

use crate::frontend::symbols::TypeHandle;

/// A compile-time handle to a declared construct.
///
/// Every variant is scoped to exactly one type. Entities are produced by the targeting builders, which only hand out
/// `Method`/`Property` entities for members they resolved against the declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProgramEntity {
    Type(TypeHandle),
    Constructor(TypeHandle),
    Method { owner: TypeHandle, name: String },
    Property { owner: TypeHandle, name: String },
}

impl ProgramEntity {
    /// The type this entity belongs to.
    pub fn owner(&self) -> &TypeHandle {
        match self {
            ProgramEntity::Type(owner) | ProgramEntity::Constructor(owner) => owner,
            ProgramEntity::Method { owner, .. } | ProgramEntity::Property { owner, .. } => owner,
        }
    }

    /// Member key for `Method`/`Property` entities.
    pub fn member_name(&self) -> Option<&str> {
        match self {
            ProgramEntity::Method { name, .. } | ProgramEntity::Property { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ProgramEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramEntity::Type(owner) => write!(f, "type {owner}"),
            ProgramEntity::Constructor(owner) => write!(f, "constructor of {owner}"),
            ProgramEntity::Method { owner, name } => write!(f, "method {owner}.{name}"),
            ProgramEntity::Property { owner, name } => write!(f, "property {owner}.{name}"),
        }
    }
}
