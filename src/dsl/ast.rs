use super::types::DslType;
use super::value::Value;
use std::collections::HashMap;

pub type NodeId = usize;

/// A tagged AST node. Children are referenced by arena index rather than boxed,
/// so composing and editing trees never walks a chain of heap allocations.
#[derive(Debug, Clone)]
pub enum Node {
    Literal {
        value: Value,
        inferred_type: Option<DslType>,
    },
    Variable {
        name: String,
        inferred_type: Option<DslType>,
    },
    Primitive {
        name: String,
        args: Vec<NodeId>,
    },
    Compose {
        operations: Vec<NodeId>,
    },
    Lambda {
        params: Vec<(String, Option<DslType>)>,
        body: NodeId,
    },
    Apply {
        function: NodeId,
        args: Vec<NodeId>,
    },
    Let {
        name: String,
        value: NodeId,
        body: NodeId,
    },
    Cond {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    Map {
        function: NodeId,
        list_expr: NodeId,
    },
    Filter {
        predicate: NodeId,
        list_expr: NodeId,
    },
}

/// An arena of AST nodes plus the index of the program's root node.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub fn push_root(node: Node) -> Self {
        Ast {
            nodes: vec![node],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `node` to the arena and returns its id. Used by builders that already
    /// hold ids of children allocated in this same arena.
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Copies every node of `other` into `self`, remapping child ids by the offset at
    /// which they land, and returns the id of `other`'s (copied) root within `self`.
    pub fn splice(&mut self, other: &Ast) -> NodeId {
        let offset = self.nodes.len();
        for node in &other.nodes {
            self.nodes.push(remap(node, offset));
        }
        offset + other.root
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id] {
            Node::Literal { .. } | Node::Variable { .. } => vec![],
            Node::Primitive { args, .. } => args.clone(),
            Node::Compose { operations } => operations.clone(),
            Node::Lambda { body, .. } => vec![*body],
            Node::Apply { function, args } => {
                let mut c = vec![*function];
                c.extend(args);
                c
            }
            Node::Let { value, body, .. } => vec![*value, *body],
            Node::Cond {
                condition,
                then_branch,
                else_branch,
            } => vec![*condition, *then_branch, *else_branch],
            Node::Map {
                function,
                list_expr,
            } => vec![*function, *list_expr],
            Node::Filter {
                predicate,
                list_expr,
            } => vec![*predicate, *list_expr],
        }
    }

    pub fn depth_of(&self, id: NodeId) -> usize {
        let children = self.children(id);
        1 + children
            .iter()
            .map(|&c| self.depth_of(c))
            .max()
            .unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.depth_of(self.root)
    }

    pub fn size_of(&self, id: NodeId) -> usize {
        1 + self
            .children(id)
            .iter()
            .map(|&c| self.size_of(c))
            .sum::<usize>()
    }

    pub fn size(&self) -> usize {
        self.size_of(self.root)
    }

    /// Pre-order traversal of node ids reachable from `id`.
    pub fn walk(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        for child in self.children(id) {
            out.extend(self.walk(child));
        }
        out
    }

    /// Returns a new tree where `f` may rewrite any node. When `f(self, id)` returns
    /// `None` ("no change"), children are transformed recursively and the node is
    /// reconstructed only if something beneath it changed; otherwise it's copied as-is.
    pub fn transform(&self, f: &mut impl FnMut(&Ast, NodeId) -> Option<Node>) -> Ast {
        let mut new_ast = Ast {
            nodes: Vec::new(),
            root: 0,
        };
        let mut cache = HashMap::new();
        let root = self.transform_rec(self.root, f, &mut new_ast, &mut cache);
        new_ast.root = root;
        new_ast
    }

    fn transform_rec(
        &self,
        id: NodeId,
        f: &mut impl FnMut(&Ast, NodeId) -> Option<Node>,
        out: &mut Ast,
        cache: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if let Some(&cached) = cache.get(&id) {
            return cached;
        }
        let new_node = if let Some(rewritten) = f(self, id) {
            rewritten
        } else {
            self.rebuild_with_transformed_children(id, f, out, cache)
        };
        let new_id = out.push(new_node);
        cache.insert(id, new_id);
        new_id
    }

    fn rebuild_with_transformed_children(
        &self,
        id: NodeId,
        f: &mut impl FnMut(&Ast, NodeId) -> Option<Node>,
        out: &mut Ast,
        cache: &mut HashMap<NodeId, NodeId>,
    ) -> Node {
        let mut t = |child: NodeId| self.transform_rec(child, f, out, cache);
        match self.nodes[id].clone() {
            Node::Literal { .. } | Node::Variable { .. } => self.nodes[id].clone(),
            Node::Primitive { name, args } => Node::Primitive {
                name,
                args: args.into_iter().map(&mut t).collect(),
            },
            Node::Compose { operations } => Node::Compose {
                operations: operations.into_iter().map(&mut t).collect(),
            },
            Node::Lambda { params, body } => Node::Lambda {
                params,
                body: t(body),
            },
            Node::Apply { function, args } => Node::Apply {
                function: t(function),
                args: args.into_iter().map(&mut t).collect(),
            },
            Node::Let { name, value, body } => Node::Let {
                name,
                value: t(value),
                body: t(body),
            },
            Node::Cond {
                condition,
                then_branch,
                else_branch,
            } => Node::Cond {
                condition: t(condition),
                then_branch: t(then_branch),
                else_branch: t(else_branch),
            },
            Node::Map {
                function,
                list_expr,
            } => Node::Map {
                function: t(function),
                list_expr: t(list_expr),
            },
            Node::Filter {
                predicate,
                list_expr,
            } => Node::Filter {
                predicate: t(predicate),
                list_expr: t(list_expr),
            },
        }
    }

    /// Deep-clones just the subtree rooted at `id` into a fresh, root-normalized `Ast`.
    pub fn subtree(&self, id: NodeId) -> Ast {
        self.transform_sub(id)
    }

    fn transform_sub(&self, id: NodeId) -> Ast {
        let mut out = Ast {
            nodes: Vec::new(),
            root: 0,
        };
        let mut cache = HashMap::new();
        let root = self.copy_rec(id, &mut out, &mut cache);
        out.root = root;
        out
    }

    fn copy_rec(&self, id: NodeId, out: &mut Ast, cache: &mut HashMap<NodeId, NodeId>) -> NodeId {
        self.transform_rec(id, &mut |_, _| None, out, cache)
    }
}

fn remap(node: &Node, offset: usize) -> Node {
    let shift = |id: &NodeId| id + offset;
    match node.clone() {
        Node::Literal {
            value,
            inferred_type,
        } => Node::Literal {
            value,
            inferred_type,
        },
        Node::Variable {
            name,
            inferred_type,
        } => Node::Variable {
            name,
            inferred_type,
        },
        Node::Primitive { name, args } => Node::Primitive {
            name,
            args: args.iter().map(shift).collect(),
        },
        Node::Compose { operations } => Node::Compose {
            operations: operations.iter().map(shift).collect(),
        },
        Node::Lambda { params, body } => Node::Lambda {
            params,
            body: shift(&body),
        },
        Node::Apply { function, args } => Node::Apply {
            function: shift(&function),
            args: args.iter().map(shift).collect(),
        },
        Node::Let { name, value, body } => Node::Let {
            name,
            value: shift(&value),
            body: shift(&body),
        },
        Node::Cond {
            condition,
            then_branch,
            else_branch,
        } => Node::Cond {
            condition: shift(&condition),
            then_branch: shift(&then_branch),
            else_branch: shift(&else_branch),
        },
        Node::Map {
            function,
            list_expr,
        } => Node::Map {
            function: shift(&function),
            list_expr: shift(&list_expr),
        },
        Node::Filter {
            predicate,
            list_expr,
        } => Node::Filter {
            predicate: shift(&predicate),
            list_expr: shift(&list_expr),
        },
    }
}

// --- Construction helpers -------------------------------------------------

pub fn primitive(name: impl Into<String>, args: Vec<Ast>) -> Ast {
    let mut out = Ast {
        nodes: Vec::new(),
        root: 0,
    };
    let arg_ids = args.iter().map(|a| out.splice(a)).collect();
    let root = out.push(Node::Primitive {
        name: name.into(),
        args: arg_ids,
    });
    out.root = root;
    out
}

pub fn compose(ops: Vec<Ast>) -> Ast {
    let mut out = Ast {
        nodes: Vec::new(),
        root: 0,
    };
    let op_ids = ops.iter().map(|a| out.splice(a)).collect();
    let root = out.push(Node::Compose { operations: op_ids });
    out.root = root;
    out
}

pub fn literal(value: Value) -> Ast {
    Ast::push_root(Node::Literal {
        value,
        inferred_type: None,
    })
}

pub fn variable(name: impl Into<String>) -> Ast {
    Ast::push_root(Node::Variable {
        name: name.into(),
        inferred_type: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_and_depth_of_compose() {
        let ast = compose(vec![primitive("identity", vec![]), primitive("reflect_h", vec![])]);
        assert_eq!(ast.size(), 3);
        assert_eq!(ast.depth(), 2);
    }

    #[test]
    fn walk_is_preorder() {
        let ast = primitive("rotate90", vec![literal(Value::Int(1))]);
        let order = ast.walk(ast.root());
        assert_eq!(order.len(), 2);
        assert_eq!(order[0], ast.root());
    }

    #[test]
    fn transform_reuses_unchanged_children() {
        let ast = compose(vec![primitive("identity", vec![]), primitive("reflect_h", vec![])]);
        let rewritten = ast.transform(&mut |tree, id| match tree.get(id) {
            Node::Primitive { name, .. } if name == "reflect_h" => Some(Node::Primitive {
                name: "reflect_v".to_string(),
                args: vec![],
            }),
            _ => None,
        });
        match rewritten.get(rewritten.root()) {
            Node::Compose { operations } => {
                assert!(matches!(
                    rewritten.get(operations[0]),
                    Node::Primitive { name, .. } if name == "identity"
                ));
                assert!(matches!(
                    rewritten.get(operations[1]),
                    Node::Primitive { name, .. } if name == "reflect_v"
                ));
            }
            other => panic!("expected Compose, got {:?}", other),
        }
    }
}
