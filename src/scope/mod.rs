//! Lexical scope tree.
//!
//! A [`ScopeTree`] is built once per successful parse and only read after
//! that. Each [`Scope`] owns the occurrences found directly inside it; nested
//! functions and catch clauses get child scopes. The four `walk_down_*`
//! traversals fold over every scope in pre-order.

mod builder;

use crate::parsing::SyntaxTree;
use crate::types::{Range, TokenValue};
use serde::Serialize;

pub use builder::MAX_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Global,
    Function,
    Catch,
}

/// Which occurrence list a traversal yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Identifiers,
    Properties,
    Literals,
}

/// Which attribute of a record keys the sifted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAttribute {
    /// Source text of the node.
    Name,
    /// Literal value; records without one are skipped.
    Value,
}

/// One occurrence of an identifier, property or literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TokenValue>,
    pub range: Range,
}

impl ScopeNode {
    pub fn key(&self, attribute: KeyAttribute) -> Option<TokenValue> {
        match attribute {
            KeyAttribute::Name => Some(TokenValue::String(self.name.clone())),
            KeyAttribute::Value => self.value.clone(),
        }
    }
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub name: String,
    pub range: Range,
}

/// A non-computed `object.property` access on a plain identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Association {
    pub object: ScopeNode,
    pub property: ScopeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scope {
    pub kind: ScopeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub range: Range,
    pub bindings: Vec<Binding>,
    pub identifiers: Vec<ScopeNode>,
    pub properties: Vec<ScopeNode>,
    pub literals: Vec<ScopeNode>,
    pub associations: Vec<Association>,
    pub children: Vec<Scope>,
}

impl Scope {
    pub fn new(kind: ScopeKind, name: Option<String>, range: Range) -> Self {
        Self {
            kind,
            name,
            range,
            bindings: Vec::new(),
            identifiers: Vec::new(),
            properties: Vec::new(),
            literals: Vec::new(),
            associations: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn records(&self, walk: Walk) -> &[ScopeNode] {
        match walk {
            Walk::Identifiers => &self.identifiers,
            Walk::Properties => &self.properties,
            Walk::Literals => &self.literals,
        }
    }

    /// Whether `name` is declared directly in this scope.
    pub fn binds(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.range.contains(offset)
    }
}

/// Pre-order iterator over a scope and all of its descendants.
pub struct Scopes<'a> {
    stack: Vec<&'a Scope>,
}

impl<'a> Iterator for Scopes<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let scope = self.stack.pop()?;
        self.stack.extend(scope.children.iter().rev());
        Some(scope)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScopeTree {
    root: Scope,
}

impl ScopeTree {
    pub fn build(tree: &SyntaxTree) -> Self {
        Self {
            root: builder::build(tree),
        }
    }

    pub fn from_root(root: Scope) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Scope {
        &self.root
    }

    pub fn scopes(&self) -> Scopes<'_> {
        Scopes {
            stack: vec![&self.root],
        }
    }

    /// Fold `f` over every record of the given kind in every scope.
    pub fn walk_down<A, F>(&self, walk: Walk, init: A, f: F) -> A
    where
        F: FnMut(A, &ScopeNode) -> A,
    {
        self.scopes()
            .flat_map(|scope| scope.records(walk))
            .fold(init, f)
    }

    pub fn walk_down_identifiers<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, &ScopeNode) -> A,
    {
        self.walk_down(Walk::Identifiers, init, f)
    }

    pub fn walk_down_properties<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, &ScopeNode) -> A,
    {
        self.walk_down(Walk::Properties, init, f)
    }

    pub fn walk_down_literals<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, &ScopeNode) -> A,
    {
        self.walk_down(Walk::Literals, init, f)
    }

    pub fn walk_down_associations<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, &Association) -> A,
    {
        self.scopes()
            .flat_map(|scope| scope.associations.iter())
            .fold(init, f)
    }

    /// Deepest scope whose range contains `offset`; the root otherwise.
    pub fn innermost_at(&self, offset: usize) -> &Scope {
        let mut current = &self.root;
        while let Some(child) = current.children.iter().find(|c| c.contains(offset)) {
            current = child;
        }
        current
    }
}
