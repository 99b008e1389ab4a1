//! Runtime values.
//! 运行时值。

use crate::context::Context;
use crate::coroutine::Coroutine;
use crate::env::{Environment, Key};
use crate::error::{EvalError, Result};
use crate::stream::Stream;
use futures::future::{FutureExt, LocalBoxFuture};
use rill_syntax::FunctionExpr;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A runtime value.
/// 运行时值。
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(Str),
    Boolean(bool),
    Tuple(Rc<Tuple>),
    Array(Rc<Vec<Value>>),
    Dict(Rc<Dict>),
    Range(Rc<RangeValue>),
    Function(Rc<Function>),
    Builtin(Rc<Builtin>),
    Type(TypeRef),
    Stream(Rc<Stream>),
    Coroutine(Rc<Coroutine>),
    Cell(Rc<ContextCell>),
    /// Continuation marker returned from a `let` body.
    Loop(Rc<Value>),
}

impl Value {
    pub const TRUE: Value = Value::Boolean(true);
    pub const FALSE: Value = Value::Boolean(false);

    pub fn boolean(b: bool) -> Value {
        if b { Value::TRUE } else { Value::FALSE }
    }

    /// The empty tuple `()`, used as the "no value" sentinel.
    pub fn empty() -> Value {
        Value::Tuple(Tuple::empty())
    }

    pub fn is_empty_tuple(&self) -> bool {
        matches!(self, Value::Tuple(t) if t.is_empty() && t.tag.is_none())
    }

    pub fn string(text: impl Into<String>) -> Value {
        Value::String(Str::new(text))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(items))
    }

    pub fn tuple(fields: Vec<Value>) -> Value {
        Value::Tuple(Tuple::new(fields))
    }

    /// A host function value.
    pub fn host<F, Fut>(name: impl Into<String>, func: F) -> Value
    where
        F: Fn(Value, Context) -> Fut + 'static,
        Fut: Future<Output = Result<Value>> + 'static,
    {
        Value::Builtin(Rc::new(Builtin::new(name, func)))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Tuple(t) => match &t.tag {
                Some(st) => TypeTag::Struct(st.id),
                None => TypeTag::Tuple,
            },
            Value::Array(_) => TypeTag::Array,
            Value::Dict(_) => TypeTag::Dict,
            Value::Range(_) => TypeTag::Range,
            Value::Function(_) | Value::Builtin(_) => TypeTag::Function,
            Value::Type(_) => TypeTag::Type,
            Value::Stream(_) => TypeTag::Stream,
            Value::Coroutine(_) => TypeTag::Coroutine,
            Value::Cell(_) => TypeTag::Context,
            Value::Loop(_) => TypeTag::Loop,
        }
    }

    /// The type of this value as a first-class type reference.
    pub fn type_ref(&self) -> TypeRef {
        match self {
            Value::Tuple(t) => match &t.tag {
                Some(st) => TypeRef::Struct(st.clone()),
                None => TypeRef::Builtin(TypeTag::Tuple),
            },
            other => TypeRef::Builtin(other.type_tag()),
        }
    }

    pub fn type_name(&self) -> String {
        self.type_ref().name()
    }

    /// A tuple's fields, or the value itself as a single field.
    pub fn fields(&self) -> Vec<Value> {
        match self {
            Value::Tuple(t) => t.fields.clone(),
            other => vec![other.clone()],
        }
    }

    /// Source-like rendering. Strings are quoted.
    /// 类源码的表示形式。
    pub fn inspect(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => format!("{:?}", s.as_str()),
            Value::Boolean(b) => b.to_string(),
            Value::Tuple(t) => t.inspect(),
            Value::Array(items) => {
                let inner: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Dict(d) => {
                let inner: Vec<String> = d
                    .entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("#{{{}}}", inner.join(", "))
            }
            Value::Range(r) => {
                if r.stride == 1.0 {
                    format!("{}..{}", r.from.inspect(), r.to.inspect())
                } else {
                    format!("{}..{} by {}", r.from.inspect(), r.to.inspect(), format_number(r.stride))
                }
            }
            Value::Function(f) => match f.name() {
                Some(name) => format!("<function {name}>"),
                None => "<function>".to_string(),
            },
            Value::Builtin(b) => format!("<builtin {}>", b.name),
            Value::Type(t) => t.name(),
            Value::Stream(_) => "<stream>".to_string(),
            Value::Coroutine(_) => "<coroutine>".to_string(),
            Value::Cell(_) => "<context>".to_string(),
            Value::Loop(inner) => format!("loop({})", inner.inspect()),
        }
    }

    /// Display rendering: strings are raw, everything else inspects.
    /// 显示用的字符串形式。
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.as_str().to_string(),
            other => other.inspect(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

/// Integers print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// An immutable string with its code points materialized, so `size` and
/// `at` index by character.
#[derive(Clone)]
pub struct Str(Rc<StrData>);

struct StrData {
    text: Box<str>,
    chars: Box<[char]>,
}

impl Str {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let chars = text.chars().collect();
        Str(Rc::new(StrData {
            text: text.into_boxed_str(),
            chars,
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    pub fn chars(&self) -> &[char] {
        &self.0.chars
    }

    /// Number of code points.
    pub fn size(&self) -> usize {
        self.0.chars.len()
    }
}

thread_local! {
    static EMPTY_TUPLE: Rc<Tuple> = Rc::new(Tuple {
        fields: Vec::new(),
        names: Vec::new(),
        tag: None,
    });
}

/// Tuple, optionally with field names and a struct tag.
/// 元组，可带字段名和结构体标签。
pub struct Tuple {
    fields: Vec<Value>,
    /// Empty, or one entry per field.
    names: Vec<Option<Rc<str>>>,
    tag: Option<Rc<StructType>>,
}

impl Tuple {
    /// The shared empty tuple.
    pub fn empty() -> Rc<Tuple> {
        EMPTY_TUPLE.with(Rc::clone)
    }

    pub fn new(fields: Vec<Value>) -> Rc<Tuple> {
        if fields.is_empty() {
            return Tuple::empty();
        }
        Rc::new(Tuple {
            fields,
            names: Vec::new(),
            tag: None,
        })
    }

    /// A tuple where some fields carry names.
    pub fn named(fields: Vec<(Option<String>, Value)>) -> Rc<Tuple> {
        if fields.iter().all(|(name, _)| name.is_none()) {
            return Tuple::new(fields.into_iter().map(|(_, v)| v).collect());
        }
        let (names, fields) = fields
            .into_iter()
            .map(|(name, value)| (name.map(Rc::from), value))
            .unzip();
        Rc::new(Tuple {
            fields,
            names,
            tag: None,
        })
    }

    /// An instance of a struct type.
    pub fn tagged(tag: Rc<StructType>, fields: Vec<Value>) -> Rc<Tuple> {
        let names = tag.fields.iter().map(|name| Some(Rc::from(name.as_str()))).collect();
        Rc::new(Tuple {
            fields,
            names,
            tag: Some(tag),
        })
    }

    /// Same names and tag, new field values.
    pub fn with_fields(&self, fields: Vec<Value>) -> Rc<Tuple> {
        if self.names.is_empty() && self.tag.is_none() {
            return Tuple::new(fields);
        }
        Rc::new(Tuple {
            fields,
            names: self.names.clone(),
            tag: self.tag.clone(),
        })
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).and_then(|name| name.as_deref())
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .and_then(|index| self.fields.get(index))
    }

    pub fn tag(&self) -> Option<&Rc<StructType>> {
        self.tag.as_ref()
    }

    fn inspect(&self) -> String {
        let inner: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, value)| match self.name_at(i) {
                Some(name) => format!("{name}: {}", value.inspect()),
                None => value.inspect(),
            })
            .collect();
        let prefix = self.tag.as_ref().map(|t| t.name()).unwrap_or_default();
        if self.fields.len() == 1 && self.names.is_empty() && self.tag.is_none() {
            format!("({},)", inner[0])
        } else {
            format!("{prefix}({})", inner.join(", "))
        }
    }
}

/// Insertion-ordered dictionary. Keys are identified by their `inspect()`
/// rendering, so `1` and `"1"` are distinct keys.
#[derive(Clone, Default)]
pub struct Dict {
    entries: Vec<(Value, Value)>,
    index: HashMap<String, usize>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its position.
    pub fn insert(&mut self, key: Value, value: Value) {
        let id = key.inspect();
        match self.index.get(&id) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index.get(&key.inspect()).map(|&slot| &self.entries[slot].1)
    }

    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.get(&Value::string(key))
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.index.contains_key(&key.inspect())
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `other` override entries of `self`.
    pub fn merge(&self, other: &Dict) -> Dict {
        let mut merged = self.clone();
        for (k, v) in &other.entries {
            merged.insert(k.clone(), v.clone());
        }
        merged
    }
}

impl FromIterator<(Value, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// `from..to`, inclusive at both ends. `stride` is a magnitude; direction
/// comes from the endpoints.
pub struct RangeValue {
    pub from: Value,
    pub to: Value,
    pub stride: f64,
}

impl RangeValue {
    pub fn new(from: Value, to: Value) -> Self {
        Self { from, to, stride: 1.0 }
    }
}

/// A closure: function literal plus the environment it was created in.
pub struct Function {
    pub expr: Rc<FunctionExpr>,
    pub env: Environment,
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        self.expr.name.as_deref()
    }
}

pub type HostFuture = LocalBoxFuture<'static, Result<Value>>;
type HostFn = dyn Fn(Value, Context) -> HostFuture;

/// A function implemented by the host.
/// 宿主实现的函数。
pub struct Builtin {
    pub name: String,
    func: Box<HostFn>,
}

impl Builtin {
    pub fn new<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value, Context) -> Fut + 'static,
        Fut: Future<Output = Result<Value>> + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(move |arg, ctx| func(arg, ctx).boxed_local()),
        }
    }

    pub async fn call(&self, arg: Value, ctx: Context) -> Result<Value> {
        (self.func)(arg, ctx).await
    }
}

/// Runtime type tag. Struct types get a unique id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Number,
    String,
    Boolean,
    Tuple,
    Array,
    Dict,
    Range,
    Function,
    Type,
    Stream,
    Coroutine,
    Context,
    Loop,
    Struct(u64),
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Number => "Number",
            TypeTag::String => "String",
            TypeTag::Boolean => "Boolean",
            TypeTag::Tuple => "Tuple",
            TypeTag::Array => "Array",
            TypeTag::Dict => "Dict",
            TypeTag::Range => "Range",
            TypeTag::Function => "Function",
            TypeTag::Type => "Type",
            TypeTag::Stream => "Stream",
            TypeTag::Coroutine => "Coroutine",
            TypeTag::Context => "Context",
            TypeTag::Loop => "Loop",
            TypeTag::Struct(_) => "Struct",
        }
    }
}

/// A first-class type value.
#[derive(Clone)]
pub enum TypeRef {
    Builtin(TypeTag),
    Struct(Rc<StructType>),
}

impl TypeRef {
    pub fn tag(&self) -> TypeTag {
        match self {
            TypeRef::Builtin(tag) => *tag,
            TypeRef::Struct(st) => TypeTag::Struct(st.id),
        }
    }

    pub fn name(&self) -> String {
        match self {
            TypeRef::Builtin(tag) => tag.name().to_string(),
            TypeRef::Struct(st) => st.name(),
        }
    }

    /// Whether `value` is an instance of this type. Struct instances are
    /// also Tuples.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            TypeRef::Builtin(TypeTag::Tuple) => matches!(value, Value::Tuple(_)),
            TypeRef::Builtin(tag) => value.type_tag() == *tag,
            TypeRef::Struct(st) => {
                matches!(value, Value::Tuple(t) if t.tag.as_ref().is_some_and(|tag| tag.id == st.id))
            }
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

static NEXT_STRUCT_ID: AtomicU64 = AtomicU64::new(1);

/// A nominal record type created by `struct`.
/// 由 `struct` 创建的具名记录类型。
pub struct StructType {
    pub id: u64,
    name: OnceCell<String>,
    /// Field names in declaration order.
    pub fields: Vec<String>,
    /// Per field: a type to check against, or a default value.
    pub specs: Vec<FieldSpec>,
}

#[derive(Clone)]
pub enum FieldSpec {
    Any,
    Typed(TypeRef),
    Default(Value),
}

impl StructType {
    /// Build a struct type from a descriptor tuple such as
    /// `(x: Number, y: Number, label: "")` or `("x", "y")`.
    pub fn from_descriptor(descriptor: &Value) -> Result<StructType> {
        let Value::Tuple(tuple) = descriptor else {
            return Err(EvalError::Type(format!(
                "struct expects a tuple of fields, found {}",
                descriptor.inspect()
            )));
        };
        let mut fields = Vec::with_capacity(tuple.len());
        let mut specs = Vec::with_capacity(tuple.len());
        for (i, value) in tuple.fields().iter().enumerate() {
            match (tuple.name_at(i), value) {
                (Some(name), Value::Type(t)) => {
                    fields.push(name.to_string());
                    specs.push(FieldSpec::Typed(t.clone()));
                }
                (Some(name), default) => {
                    fields.push(name.to_string());
                    specs.push(FieldSpec::Default(default.clone()));
                }
                (None, Value::String(name)) => {
                    fields.push(name.as_str().to_string());
                    specs.push(FieldSpec::Any);
                }
                (None, other) => {
                    return Err(EvalError::Type(format!(
                        "struct field {i} must be named, found {}",
                        other.inspect()
                    )));
                }
            }
        }
        Ok(StructType {
            id: NEXT_STRUCT_ID.fetch_add(1, Ordering::Relaxed),
            name: OnceCell::new(),
            fields,
            specs,
        })
    }

    pub fn name(&self) -> String {
        match self.name.get() {
            Some(name) => name.clone(),
            None => format!("Struct{}", self.id),
        }
    }

    /// Give an anonymous struct type its name; later names are ignored.
    pub fn name_once(&self, name: &str) {
        let _ = self.name.set(name.to_string());
    }
}

/// A context cell: a symbol key and the value seen where it is unbound.
pub struct ContextCell {
    pub key: Key,
    pub initial: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tuple_is_singleton() {
        let (Value::Tuple(a), Value::Tuple(b)) = (Value::empty(), Value::tuple(Vec::new())) else {
            panic!("expected tuples");
        };
        assert!(Rc::ptr_eq(&a, &b));
        assert!(Value::empty().is_empty_tuple());
    }

    #[test]
    fn inspect_formats() {
        assert_eq!(Value::Number(3.0).inspect(), "3");
        assert_eq!(Value::Number(2.5).inspect(), "2.5");
        assert_eq!(Value::Number(f64::NAN).inspect(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).inspect(), "-Infinity");
        assert_eq!(Value::string("hi").inspect(), "\"hi\"");
        assert_eq!(Value::string("hi").to_text(), "hi");
        assert_eq!(Value::tuple(vec![1.0.into()]).inspect(), "(1,)");
        assert_eq!(Value::tuple(vec![1.0.into(), "a".into()]).inspect(), "(1, \"a\")");
        assert_eq!(Value::empty().inspect(), "()");
        let named = Value::Tuple(Tuple::named(vec![(Some("x".into()), 1.0.into())]));
        assert_eq!(named.inspect(), "(x: 1)");
        let dict: Dict = [("a".into(), Value::Number(1.0))].into_iter().collect();
        assert_eq!(Value::Dict(Rc::new(dict)).inspect(), "#{\"a\": 1}");
        let range = RangeValue::new(1.0.into(), 5.0.into());
        assert_eq!(Value::Range(Rc::new(range)).inspect(), "1..5");
    }

    #[test]
    fn str_counts_code_points() {
        let s = Str::new("héllo");
        assert_eq!(s.size(), 5);
        assert_eq!(s.chars()[1], 'é');
    }

    #[test]
    fn dict_keys_by_inspect() {
        let mut dict = Dict::new();
        dict.insert(Value::Number(1.0), "number".into());
        dict.insert(Value::string("1"), "string".into());
        dict.insert(Value::Number(1.0), "replaced".into());
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&Value::Number(1.0)).map(Value::to_text).as_deref(), Some("replaced"));
        assert_eq!(dict.entries()[0].0.inspect(), "1");
    }

    #[test]
    fn struct_types_are_nominal() {
        let descriptor = Value::Tuple(Tuple::named(vec![
            (Some("x".into()), Value::Type(TypeRef::Builtin(TypeTag::Number))),
            (Some("y".into()), Value::Number(0.0)),
        ]));
        let point = Rc::new(StructType::from_descriptor(&descriptor).unwrap());
        point.name_once("Point");
        point.name_once("Other");
        assert_eq!(point.name(), "Point");

        let instance = Value::Tuple(Tuple::tagged(point.clone(), vec![1.0.into(), 2.0.into()]));
        assert_eq!(instance.inspect(), "Point(x: 1, y: 2)");
        assert!(TypeRef::Struct(point.clone()).admits(&instance));
        assert!(TypeRef::Builtin(TypeTag::Tuple).admits(&instance));
        assert!(!TypeRef::Struct(point).admits(&Value::tuple(vec![1.0.into(), 2.0.into()])));
    }
}
