//! Tree node definitions.

use serde::{Deserialize, Serialize};

/// How a program should be interpreted at the module level.
///
/// `Module` is the default kind; a program parsed under any other kind is
/// excluded from build caching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Module,
    Script,
}

impl SourceKind {
    /// Get the lowercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Module => "module",
            SourceKind::Script => "script",
        }
    }
}

/// Declaration keyword for variable declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Let,
    Const,
    Var,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Let => "let",
            DeclKind::Const => "const",
            DeclKind::Var => "var",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
    Gt,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
        }
    }
}

/// A node in the source tree.
///
/// Statements and expressions share one enum so that visitors can dispatch
/// on a single [`NodeKind`]. Statement-position variants carry the original
/// source line (when known) for source mapping; nodes synthesized by passes
/// leave it unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Program {
        kind: SourceKind,
        body: Vec<Node>,
    },
    ImportDecl {
        names: Vec<String>,
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
    },
    VarDecl {
        kind: DeclKind,
        name: String,
        init: Option<Box<Node>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
    },
    FnDecl {
        name: String,
        params: Vec<String>,
        body: Vec<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
    },
    Return {
        arg: Option<Box<Node>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
    },
    ExprStmt {
        expr: Box<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
    },
    Ident {
        name: String,
    },
    Number {
        value: f64,
    },
    Str {
        value: String,
    },
    Bool {
        value: bool,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
}

/// Discriminant of a [`Node`], used as the visitor dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    ImportDecl,
    VarDecl,
    FnDecl,
    Return,
    ExprStmt,
    Ident,
    Number,
    Str,
    Bool,
    Binary,
    Call,
    Assign,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::ImportDecl => "ImportDecl",
            NodeKind::VarDecl => "VarDecl",
            NodeKind::FnDecl => "FnDecl",
            NodeKind::Return => "Return",
            NodeKind::ExprStmt => "ExprStmt",
            NodeKind::Ident => "Ident",
            NodeKind::Number => "Number",
            NodeKind::Str => "Str",
            NodeKind::Bool => "Bool",
            NodeKind::Binary => "Binary",
            NodeKind::Call => "Call",
            NodeKind::Assign => "Assign",
        }
    }
}

impl Node {
    /// The dispatch kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program { .. } => NodeKind::Program,
            Node::ImportDecl { .. } => NodeKind::ImportDecl,
            Node::VarDecl { .. } => NodeKind::VarDecl,
            Node::FnDecl { .. } => NodeKind::FnDecl,
            Node::Return { .. } => NodeKind::Return,
            Node::ExprStmt { .. } => NodeKind::ExprStmt,
            Node::Ident { .. } => NodeKind::Ident,
            Node::Number { .. } => NodeKind::Number,
            Node::Str { .. } => NodeKind::Str,
            Node::Bool { .. } => NodeKind::Bool,
            Node::Binary { .. } => NodeKind::Binary,
            Node::Call { .. } => NodeKind::Call,
            Node::Assign { .. } => NodeKind::Assign,
        }
    }

    /// Returns true for declarations the hoisting pass moves to the top of
    /// their enclosing body.
    pub fn is_hoistable(&self) -> bool {
        matches!(self, Node::ImportDecl { .. } | Node::FnDecl { .. })
    }

    /// Returns true for nodes that occupy statement position.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Node::ImportDecl { .. }
                | Node::VarDecl { .. }
                | Node::FnDecl { .. }
                | Node::Return { .. }
                | Node::ExprStmt { .. }
        )
    }

    /// The original source line of a statement, when the parser recorded one.
    pub fn original_line(&self) -> Option<u32> {
        match self {
            Node::ImportDecl { line, .. }
            | Node::VarDecl { line, .. }
            | Node::FnDecl { line, .. }
            | Node::Return { line, .. }
            | Node::ExprStmt { line, .. } => *line,
            _ => None,
        }
    }

    /// The module kind of a program node, `None` for any other node.
    pub fn source_kind(&self) -> Option<SourceKind> {
        match self {
            Node::Program { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let node = Node::VarDecl {
            kind: DeclKind::Let,
            name: "x".into(),
            init: Some(Box::new(Node::Number { value: 1.0 })),
            line: Some(1),
        };
        assert_eq!(node.kind(), NodeKind::VarDecl);
        assert!(node.is_statement());
        assert!(!node.is_hoistable());
    }

    #[test]
    fn test_hoistable_nodes() {
        let import = Node::ImportDecl {
            names: vec!["a".into()],
            source: "mod".into(),
            line: None,
        };
        let func = Node::FnDecl {
            name: "f".into(),
            params: vec![],
            body: vec![],
            line: None,
        };
        assert!(import.is_hoistable());
        assert!(func.is_hoistable());
    }

    #[test]
    fn test_serde_tagging() {
        let node = Node::Ident { name: "x".into() };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Ident");
        assert_eq!(json["name"], "x");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_source_kind_default() {
        assert_eq!(SourceKind::default(), SourceKind::Module);
        assert_eq!(SourceKind::Module.as_str(), "module");
    }
}
