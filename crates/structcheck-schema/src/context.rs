use std::sync::Arc;

use structcheck_value::{PathSegment, Value};

/// Position of the value currently being checked.
///
/// Threaded through the recursion of one check and discarded afterwards.
/// Ancestors are shared, so cloning a context copies pointers, not values.
#[derive(Debug, Clone, Default)]
pub struct Context {
    path: Vec<PathSegment>,
    branch: Vec<Arc<Value>>,
}

impl Context {
    /// Context for checking `value` as the root.
    pub fn root(value: &Value) -> Self {
        Self {
            path: Vec::new(),
            branch: vec![Arc::new(value.clone())],
        }
    }

    /// Segments from the root to the current value.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Ancestor values from the root to the current value, inclusive.
    pub fn branch(&self) -> &[Arc<Value>] {
        &self.branch
    }

    /// Key of the current value within its parent.
    pub fn key(&self) -> Option<&PathSegment> {
        self.path.last()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub(crate) fn enter(&mut self, key: PathSegment, value: Arc<Value>) {
        self.path.push(key);
        self.branch.push(value);
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
        self.branch.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_branch_holds_the_value() {
        let ctx = Context::root(&Value::from("x"));
        assert!(ctx.path().is_empty());
        assert_eq!(ctx.branch(), &[Arc::new(Value::from("x"))]);
        assert_eq!(ctx.key(), None);
    }

    #[test]
    fn enter_and_leave_are_balanced() {
        let mut ctx = Context::root(&Value::Null);
        ctx.enter(PathSegment::from("a"), Arc::new(Value::from(1)));
        ctx.enter(PathSegment::from(0), Arc::new(Value::from(2)));
        assert_eq!(ctx.depth(), 2);
        assert_eq!(ctx.key(), Some(&PathSegment::Index(0)));
        assert_eq!(ctx.branch().len(), 3);

        ctx.leave();
        ctx.leave();
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.branch(), &[Arc::new(Value::Null)]);
    }

    #[test]
    fn clones_share_ancestors() {
        let root = Value::Array((0..1000).map(Value::from).collect());
        let ctx = Context::root(&root);
        let scoped = ctx.clone();
        assert!(Arc::ptr_eq(&ctx.branch()[0], &scoped.branch()[0]));
    }
}
