use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::lang::value::{Value, ValueType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecursionToParent {
    Always,
    Never,
}

impl RecursionToParent {
    pub fn should_recurse(&self) -> bool {
        match self {
            RecursionToParent::Always => true,
            RecursionToParent::Never => false,
        }
    }
}

/// A scope and prototype registry.
///
/// Lookups that miss locally continue on the dynamic parent (`up`) first, then on the
/// lexical parent (`left`). Either axis can be closed off with its limit flag.
#[derive(Debug, Default)]
pub struct Frame {
    binds: RefCell<HashMap<String, Value>>,
    type_binds: RefCell<HashMap<ValueType, Rc<Frame>>>,

    up: Option<Rc<Frame>>,
    left: Option<Rc<Frame>>,
    up_limit: bool,
    left_limit: bool,
}

impl Frame {
    pub fn new() -> Frame {
        Frame::default()
    }

    fn with_parents(left: Option<Rc<Frame>>, up: Option<Rc<Frame>>) -> Frame {
        Frame {
            left, up,
            ..Frame::default()
        }
    }

    /// A child for dynamic scoping: same lexical parent, `self` as dynamic parent.
    pub fn down(self: &Rc<Self>) -> Frame {
        Frame::with_parents(self.left.as_ref().map(Rc::clone), Some(Rc::clone(self)))
    }

    /// A child for lexical scoping: `self` as lexical parent, no dynamic parent.
    pub fn right(self: &Rc<Self>) -> Frame {
        Frame::with_parents(Some(Rc::clone(self)), None)
    }

    pub fn set_up_limit(mut self) -> Frame {
        self.up_limit = true;
        self
    }

    pub fn set_left_limit(mut self) -> Frame {
        self.left_limit = true;
        self
    }

    pub fn up(&self) -> Option<&Rc<Frame>> {
        self.up.as_ref()
    }

    pub fn left(&self) -> Option<&Rc<Frame>> {
        self.left.as_ref()
    }

    pub fn bind(&self, name: impl Into<String>, value: Value) -> &Self {
        self.binds.borrow_mut().insert(name.into(), value);
        self
    }

    pub fn bind_type(&self, value_type: ValueType, prototype: Rc<Frame>) -> &Self {
        self.type_binds.borrow_mut().insert(value_type, prototype);
        self
    }

    pub fn find(&self, name: &str, recursion: RecursionToParent) -> Option<Value> {
        self.resolve(recursion, |frame| frame.binds.borrow().get(name).cloned())
    }

    pub fn find_type(&self, value_type: ValueType, recursion: RecursionToParent) -> Option<Rc<Frame>> {
        self.resolve(recursion, |frame| frame.type_binds.borrow().get(&value_type).map(Rc::clone))
    }

    fn resolve<T>(&self, recursion: RecursionToParent, lookup: impl Fn(&Frame) -> Option<T>) -> Option<T> {
        let mut frame = self;

        loop {
            if let Some(found) = lookup(frame) {
                return Some(found);
            }

            if !recursion.should_recurse() {
                return None;
            }

            frame = frame.parent()?;
        }
    }

    /// The next frame a lookup continues on, if any.
    fn parent(&self) -> Option<&Frame> {
        match (&self.up, &self.left) {
            (Some(up), _) if !self.up_limit => Some(up.as_ref()),
            (_, Some(left)) if !self.left_limit => Some(left.as_ref()),
            _ => None,
        }
    }
}
