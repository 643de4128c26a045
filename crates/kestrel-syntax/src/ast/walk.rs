//! Grammar-agnostic tree walks built on [`NodeRef::children`].

use super::{AstNode, NodeRef};

/// Depth-first, parent-before-children iterator.
pub struct Preorder<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

/// Visit `root` and all its descendants in source order.
pub fn preorder<N: AstNode + ?Sized>(root: &N) -> Preorder<'_> {
    Preorder {
        stack: vec![root.as_node()],
    }
}
