//! Evaluation environment.
//! 求值环境。

use crate::value::{TypeTag, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A binding key: an identifier, or a unique symbol minted by `context`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(Rc<str>),
    Symbol(u64),
}

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

impl Key {
    pub fn name(name: &str) -> Key {
        Key::Name(Rc::from(name))
    }

    /// A fresh symbol, distinct from every other key.
    pub fn symbol() -> Key {
        Key::Symbol(NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::name(name)
    }
}

/// Bindings produced by a pattern match, in binding order.
pub type Bindings = Vec<(Key, Value)>;

/// Per-type method tables added by `extend`.
/// 由 `extend` 添加的按类型方法表。
#[derive(Clone, Default)]
pub struct Extensions {
    by_type: HashMap<TypeTag, Rc<HashMap<String, Value>>>,
}

impl Extensions {
    pub fn lookup(&self, tag: TypeTag, method: &str) -> Option<Value> {
        self.by_type.get(&tag)?.get(method).cloned()
    }

    /// A copy of this table with `methods` merged into the entry for `tag`.
    pub fn merged(&self, tag: TypeTag, methods: Vec<(String, Value)>) -> Extensions {
        let mut table = self.by_type.get(&tag).map(|t| (**t).clone()).unwrap_or_default();
        table.extend(methods);
        let mut by_type = self.by_type.clone();
        by_type.insert(tag, Rc::new(table));
        Extensions { by_type }
    }
}

/// One immutable layer of bindings.
struct Frame {
    bindings: HashMap<Key, Value>,
    extensions: Option<Rc<Extensions>>,
    parent: Option<Rc<Frame>>,
}

impl Frame {
    fn layer(parent: Option<Rc<Frame>>, bindings: Bindings) -> Rc<Frame> {
        Rc::new(Frame {
            bindings: bindings.into_iter().collect(),
            extensions: None,
            parent,
        })
    }

    fn lookup(frame: &Option<Rc<Frame>>, key: &Key) -> Option<Value> {
        let mut current = frame.as_ref();
        while let Some(frame) = current {
            if let Some(value) = frame.bindings.get(key) {
                return Some(value.clone());
            }
            current = frame.parent.as_ref();
        }
        None
    }

    fn extensions(frame: &Option<Rc<Frame>>) -> Option<Rc<Extensions>> {
        let mut current = frame.as_ref();
        while let Some(frame) = current {
            if let Some(extensions) = &frame.extensions {
                return Some(extensions.clone());
            }
            current = frame.parent.as_ref();
        }
        None
    }
}

/// The session's global scope. Top-level statements replace its root frame,
/// and every environment reads the current root, so globals are late-bound.
/// 会话的全局作用域。
#[derive(Default)]
pub struct GlobalScope {
    root: RefCell<Option<Rc<Frame>>>,
}

impl GlobalScope {
    pub fn new() -> Rc<GlobalScope> {
        Rc::new(GlobalScope::default())
    }

    pub fn bind(&self, bindings: Bindings) {
        let parent = self.root.borrow().clone();
        *self.root.borrow_mut() = Some(Frame::layer(parent, bindings));
    }

    pub fn bind_extensions(&self, extensions: Extensions) {
        let parent = self.root.borrow().clone();
        *self.root.borrow_mut() = Some(Rc::new(Frame {
            bindings: HashMap::new(),
            extensions: Some(Rc::new(extensions)),
            parent,
        }));
    }

    /// Layer the local frames of `scope` onto the root, oldest first. Used to
    /// publish the bindings of a top-level statement once it has succeeded.
    pub fn commit(&self, scope: &Environment) {
        let mut layers = Vec::new();
        let mut current = scope.local.clone();
        while let Some(frame) = current {
            current = frame.parent.clone();
            layers.push(frame);
        }
        if layers.is_empty() {
            return;
        }

        let mut root = self.root();
        for frame in layers.into_iter().rev() {
            root = Some(Rc::new(Frame {
                bindings: frame.bindings.clone(),
                extensions: frame.extensions.clone(),
                parent: root,
            }));
        }
        *self.root.borrow_mut() = root;
    }

    fn root(&self) -> Option<Rc<Frame>> {
        self.root.borrow().clone()
    }
}

/// A lexical environment: local frames on top of the global scope.
#[derive(Clone)]
pub struct Environment {
    local: Option<Rc<Frame>>,
    global: Rc<GlobalScope>,
}

impl Environment {
    /// The environment of top-level code.
    pub fn global(global: Rc<GlobalScope>) -> Self {
        Self { local: None, global }
    }

    pub fn lookup(&self, key: &Key) -> Option<Value> {
        Frame::lookup(&self.local, key).or_else(|| Frame::lookup(&self.global.root(), key))
    }

    /// Look up an identifier.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(&Key::name(name))
    }

    /// A child environment with `bindings` layered on top.
    pub fn extend(&self, bindings: Bindings) -> Environment {
        if bindings.is_empty() {
            return self.clone();
        }
        Environment {
            local: Some(Frame::layer(self.local.clone(), bindings)),
            global: self.global.clone(),
        }
    }

    /// A child environment with its own extension table.
    pub fn with_extensions(&self, extensions: Extensions) -> Environment {
        Environment {
            local: Some(Rc::new(Frame {
                bindings: HashMap::new(),
                extensions: Some(Rc::new(extensions)),
                parent: self.local.clone(),
            })),
            global: self.global.clone(),
        }
    }

    /// The extension table in effect here.
    pub fn extensions(&self) -> Rc<Extensions> {
        Frame::extensions(&self.local)
            .or_else(|| Frame::extensions(&self.global.root()))
            .unwrap_or_default()
    }

    pub fn extension(&self, tag: TypeTag, method: &str) -> Option<Value> {
        self.extensions().lookup(tag, method)
    }
}

/// Where statements put their bindings: the global scope at top level, or
/// the scope of the enclosing block.
#[derive(Clone)]
pub enum Binder {
    Global(Rc<GlobalScope>),
    Block(Rc<RefCell<Environment>>),
}

impl Binder {
    /// A block scope nested in `env`.
    pub fn block(env: Environment) -> Binder {
        Binder::Block(Rc::new(RefCell::new(env)))
    }

    pub fn bind(&self, bindings: Bindings) {
        match self {
            Binder::Global(global) => global.bind(bindings),
            Binder::Block(scope) => {
                let extended = scope.borrow().extend(bindings);
                *scope.borrow_mut() = extended;
            }
        }
    }

    pub fn bind_extensions(&self, extensions: Extensions) {
        match self {
            Binder::Global(global) => global.bind_extensions(extensions),
            Binder::Block(scope) => {
                let extended = scope.borrow().with_extensions(extensions);
                *scope.borrow_mut() = extended;
            }
        }
    }

    /// The environment statements in this scope currently see.
    pub fn environment(&self) -> Environment {
        match self {
            Binder::Global(global) => Environment::global(global.clone()),
            Binder::Block(scope) => scope.borrow().clone(),
        }
    }
}
