//! NXSchema Core Types
//!
//! This crate provides the model produced by reading a NeXus definition
//! language XML Schema. It includes:
//!
//! - **Names**: string-interned construct names ([`name::Name`])
//! - **Kinds**: the construct vocabulary ([`kind::ConstructKind`])
//! - **Nodes**: parsed constructs and the [`node::SchemaNode`] capability
//! - **Catalog**: the immutable, cross-referenced result ([`catalog::Catalog`])

pub mod catalog;
pub mod kind;
pub mod name;
pub mod node;

pub use catalog::{Catalog, FlattenMode};
pub use kind::ConstructKind;
pub use name::Name;
pub use node::{
    Attribute, AttributeGroup, ComplexType, DEFAULT_ATTRIBUTE_TYPE, Element, Group, Node, NodeId,
    NodeKey, Occurs, SchemaNode, SimpleType,
};
