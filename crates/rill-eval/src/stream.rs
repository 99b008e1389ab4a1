//! Lazy sequences.
//!
//! Every iterable value (Array, String, Dict, Range, Tuple, Stream) can be
//! viewed as a [`Stream`]: a restartable factory of `futures` streams plus
//! the [`Container`] that intermediate results materialize into. Sequence
//! operations build new streams without pulling anything; only terminal
//! operations (`reduce`, `count`, `toArray`, ...) drive the source.

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::eval::{apply, evaluate, invoke};
use crate::value::{Dict, RangeValue, Tuple, Value};
use futures::future;
use futures::stream::{self, LocalBoxStream, StreamExt, TryStreamExt};
use std::rc::Rc;

pub type ValueStream = LocalBoxStream<'static, Result<Value>>;

/// What a stream materializes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Array,
    String,
    Dict,
    Tuple,
}

/// A lazy, restartable sequence.
/// 惰性、可重新开始的序列。
pub struct Stream {
    container: Container,
    source: Box<dyn Fn() -> ValueStream>,
}

impl Stream {
    pub fn new(container: Container, source: impl Fn() -> ValueStream + 'static) -> Rc<Stream> {
        Rc::new(Stream {
            container,
            source: Box::new(source),
        })
    }

    /// A stream over already computed values.
    pub fn from_values(container: Container, items: Rc<Vec<Value>>) -> Rc<Stream> {
        Stream::new(container, move || {
            let items = items.clone();
            stream::iter(0..items.len()).map(move |i| Ok(items[i].clone())).boxed_local()
        })
    }

    /// Start a fresh pass over the sequence.
    pub fn open(&self) -> ValueStream {
        (self.source)()
    }

    pub fn container(&self) -> Container {
        self.container
    }

    /// Pull every element.
    pub async fn values(&self) -> Result<Vec<Value>> {
        self.open().try_collect().await
    }
}

/// View `value` as a stream, if it is iterable.
pub fn iterate(value: &Value, ctx: &Context) -> Option<Rc<Stream>> {
    match value {
        Value::Array(items) => Some(Stream::from_values(Container::Array, items.clone())),
        Value::Tuple(t) => Some(Stream::from_values(Container::Tuple, Rc::new(t.fields().to_vec()))),
        Value::String(s) => {
            let chars = s.chars().iter().map(|c| Value::string(c.to_string())).collect();
            Some(Stream::from_values(Container::String, Rc::new(chars)))
        }
        Value::Dict(d) => {
            let pairs = d
                .entries()
                .iter()
                .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
                .collect();
            Some(Stream::from_values(Container::Dict, Rc::new(pairs)))
        }
        Value::Range(r) => Some(range_stream(r.clone(), ctx.clone())),
        Value::Stream(s) => Some(s.clone()),
        _ => None,
    }
}

fn range_stream(range: Rc<RangeValue>, ctx: Context) -> Rc<Stream> {
    if let (Value::Number(from), Value::Number(to)) = (&range.from, &range.to) {
        let (from, to) = (*from, *to);
        let step = if to >= from { range.stride.abs() } else { -range.stride.abs() };
        return Stream::new(Container::Array, move || {
            stream::unfold(0u64, move |i| async move {
                let current = from + step * i as f64;
                let within = if step >= 0.0 { current <= to } else { current >= to };
                within.then(|| (Ok(Value::Number(current)), i + 1))
            })
            .boxed_local()
        });
    }

    // Non-numeric endpoints walk with `succ` while `<= to` holds.
    Stream::new(Container::Array, move || {
        let (to, ctx) = (range.to.clone(), ctx.clone());
        stream::unfold(Some(range.from.clone()), move |current| {
            let (to, ctx) = (to.clone(), ctx.clone());
            async move {
                let current = current?;
                match range_step(&current, to, &ctx).await {
                    Ok(Some(next)) => Some((Ok(current), Some(next))),
                    Ok(None) => None,
                    Err(error) => Some((Err(error), None)),
                }
            }
        })
        .boxed_local()
    })
}

/// The successor of `current`, or `None` once it passes `to`.
async fn range_step(current: &Value, to: Value, ctx: &Context) -> Result<Option<Value>> {
    let within = invoke(current, "<=", to, ctx).await?;
    if !truthy(&within) {
        return Ok(None);
    }
    invoke(current, "succ", Value::empty(), ctx).await.map(Some)
}

fn truthy(value: &Value) -> bool {
    matches!(value, Value::Boolean(true))
}

fn expect_boolean(value: Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(EvalError::NonBooleanCondition {
            type_name: other.type_name(),
            value: other.inspect(),
        }),
    }
}

/// Build a value of `container` kind from elements.
pub fn materialize(items: Vec<Value>, container: Container) -> Result<Value> {
    match container {
        Container::Array => Ok(Value::array(items)),
        Container::Tuple => Ok(Value::tuple(items)),
        Container::String => Ok(Value::string(items.iter().map(Value::to_text).collect::<String>())),
        Container::Dict => {
            let mut dict = Dict::new();
            for item in items {
                match &item {
                    Value::Tuple(pair) if pair.len() >= 2 => {
                        dict.insert(pair.fields()[0].clone(), pair.fields()[1].clone());
                    }
                    other => {
                        return Err(EvalError::Type(format!(
                            "dictionary entries must be (key, value) pairs, found {}",
                            other.inspect()
                        )));
                    }
                }
            }
            Ok(Value::Dict(Rc::new(dict)))
        }
    }
}

/// Sequence operation names, checked before building a stream view.
pub fn is_sequence_method(method: &str) -> bool {
    matches!(
        method,
        "map"
            | "flatMap"
            | "filter"
            | "reduce"
            | "take"
            | "skip"
            | "repeat"
            | "join"
            | "count"
            | "splitOn"
            | "splitAt"
            | "splitEvery"
            | "combos"
            | "some"
            | "every"
            | "find"
            | "includes"
            | "toArray"
            | "zip"
            | "each"
            | "first"
    )
}

fn count_arg(method: &str, arg: &Value) -> Result<usize> {
    match arg {
        Value::Number(n) if *n >= 0.0 && n.is_finite() => Ok(*n as usize),
        other => Err(EvalError::Type(format!(
            "`{method}` expects a non-negative count, found {}",
            other.inspect()
        ))),
    }
}

fn lazy(container: Container, source: impl Fn() -> ValueStream + 'static) -> Option<Value> {
    Some(Value::Stream(Stream::new(container, source)))
}

/// Run sequence operation `method` over `source`. `Ok(None)` means the
/// method is not a sequence operation.
pub async fn call(source: Rc<Stream>, method: &str, arg: Value, ctx: &Context) -> Result<Option<Value>> {
    let container = source.container();
    let result = match method {
        "map" => {
            let ctx = ctx.clone();
            lazy(container, move || {
                let (f, ctx) = (arg.clone(), ctx.clone());
                source
                    .open()
                    .and_then(move |item| {
                        let (f, ctx) = (f.clone(), ctx.clone());
                        async move { apply(&f, item, &ctx).await }
                    })
                    .boxed_local()
            })
        }

        "filter" => {
            let ctx = ctx.clone();
            lazy(container, move || {
                let (f, ctx) = (arg.clone(), ctx.clone());
                source
                    .open()
                    .try_filter_map(move |item| {
                        let (f, ctx) = (f.clone(), ctx.clone());
                        async move {
                            let keep = expect_boolean(apply(&f, item.clone(), &ctx).await?)?;
                            Ok(keep.then_some(item))
                        }
                    })
                    .boxed_local()
            })
        }

        "flatMap" => {
            let ctx = ctx.clone();
            lazy(container, move || {
                let (f, ctx) = (arg.clone(), ctx.clone());
                source
                    .open()
                    .and_then(move |item| {
                        let (f, ctx) = (f.clone(), ctx.clone());
                        async move {
                            let mapped = apply(&f, item, &ctx).await?;
                            Ok(match iterate(&mapped, &ctx) {
                                Some(inner) => inner.open(),
                                None => stream::once(future::ready(Ok(mapped))).boxed_local(),
                            })
                        }
                    })
                    .try_flatten()
                    .boxed_local()
            })
        }

        "take" => {
            let n = count_arg(method, &arg)?;
            lazy(container, move || source.open().take(n).boxed_local())
        }

        "skip" => {
            let n = count_arg(method, &arg)?;
            lazy(container, move || source.open().skip(n).boxed_local())
        }

        "repeat" => lazy(container, move || repeat(source.open())),

        "join" => {
            let joiner = if arg.is_empty_tuple() { Value::string("") } else { arg };
            Some(invoke(&joiner, "combine", Value::Stream(source), ctx).await?)
        }

        "count" => {
            let mut items = source.open();
            let mut count = 0usize;
            while let Some(item) = items.next().await {
                let item = item?;
                if arg.is_empty_tuple() || expect_boolean(apply(&arg, item, ctx).await?)? {
                    count += 1;
                }
            }
            Some(Value::Number(count as f64))
        }

        "some" | "every" | "find" => {
            let mut items = source.open();
            let mut found = None;
            while let Some(item) = items.next().await {
                let item = item?;
                let hit = expect_boolean(apply(&arg, item.clone(), ctx).await?)?;
                if hit != (method == "every") {
                    found = Some(item);
                    break;
                }
            }
            Some(match (method, found) {
                ("some", found) => Value::boolean(found.is_some()),
                ("every", found) => Value::boolean(found.is_none()),
                (_, Some(item)) => item,
                (_, None) => Value::empty(),
            })
        }

        "includes" => {
            let mut items = source.open();
            let mut found = false;
            while let Some(item) = items.next().await {
                if truthy(&invoke(&item?, "==", arg.clone(), ctx).await?) {
                    found = true;
                    break;
                }
            }
            Some(Value::boolean(found))
        }

        "reduce" => Some(reduce(&source, &arg, ctx).await?),

        "splitOn" => {
            let ctx = ctx.clone();
            lazy(Container::Array, move || split_on(source.open(), arg.clone(), ctx.clone(), container))
        }

        "splitAt" => {
            let index = count_arg(method, &arg)?;
            lazy(Container::Array, move || split_at(source.open(), index, container))
        }

        "splitEvery" => {
            let size = count_arg(method, &arg)?;
            if size == 0 {
                return Err(EvalError::Type("`splitEvery` expects a positive size".to_string()));
            }
            lazy(Container::Array, move || split_every(source.open(), size, container))
        }

        "combos" => lazy(Container::Array, move || combos(source.clone())),

        "zip" => {
            let Some(other) = iterate(&arg, ctx) else {
                return Err(EvalError::TypeMismatch {
                    expected: "an iterable".to_string(),
                    found: arg.inspect(),
                    type_name: arg.type_name(),
                });
            };
            lazy(Container::Array, move || {
                source
                    .open()
                    .zip(other.open())
                    .map(|(a, b)| -> Result<Value> { Ok(Value::tuple(vec![a?, b?])) })
                    .boxed_local()
            })
        }

        "each" => {
            let mut items = source.open();
            while let Some(item) = items.next().await {
                apply(&arg, item?, ctx).await?;
            }
            Some(Value::empty())
        }

        "first" => Some(match source.open().next().await {
            Some(item) => item?,
            None => Value::empty(),
        }),

        "toArray" => Some(Value::array(source.values().await?)),

        _ => None,
    };
    Ok(result)
}

/// Cycle the source forever, buffering its first pass. An empty source
/// stays empty.
fn repeat(upstream: ValueStream) -> ValueStream {
    stream::unfold(
        (Some(upstream), Vec::new(), 0usize),
        |(mut upstream, mut seen, index)| async move {
            if let Some(source) = upstream.as_mut() {
                match source.next().await {
                    Some(Ok(value)) => {
                        seen.push(value.clone());
                        return Some((Ok(value), (upstream, seen, index)));
                    }
                    Some(Err(error)) => return Some((Err(error), (None, Vec::new(), 0))),
                    None => upstream = None,
                }
            }
            if seen.is_empty() {
                return None;
            }
            let value = seen[index % seen.len()].clone();
            Some((Ok(value), (upstream, seen, index + 1)))
        },
    )
    .boxed_local()
}

/// Chunks separated by elements equal to `delimiter`. The chunk after the
/// last delimiter is always emitted, even when empty.
fn split_on(upstream: ValueStream, delimiter: Value, ctx: Context, container: Container) -> ValueStream {
    stream::unfold(Some(upstream), move |upstream| {
        let (delimiter, ctx) = (delimiter.clone(), ctx.clone());
        async move {
            let mut source = upstream?;
            let mut chunk = Vec::new();
            loop {
                match source.next().await {
                    Some(Ok(item)) => match invoke(&item, "==", delimiter.clone(), &ctx).await {
                        Ok(hit) if truthy(&hit) => {
                            return Some((materialize(chunk, container), Some(source)));
                        }
                        Ok(_) => chunk.push(item),
                        Err(error) => return Some((Err(error), None)),
                    },
                    Some(Err(error)) => return Some((Err(error), None)),
                    None => return Some((materialize(chunk, container), None)),
                }
            }
        }
    })
    .boxed_local()
}

/// Exactly two chunks: the first `index` elements and the rest.
fn split_at(upstream: ValueStream, index: usize, container: Container) -> ValueStream {
    stream::unfold((Some(upstream), true), move |(upstream, head)| async move {
        let mut source = upstream?;
        if !head {
            return Some(match source.try_collect::<Vec<_>>().await {
                Ok(rest) => (materialize(rest, container), (None, false)),
                Err(error) => (Err(error), (None, false)),
            });
        }
        let mut chunk = Vec::with_capacity(index);
        while chunk.len() < index {
            match source.next().await {
                Some(Ok(item)) => chunk.push(item),
                Some(Err(error)) => return Some((Err(error), (None, false))),
                None => break,
            }
        }
        Some((materialize(chunk, container), (Some(source), false)))
    })
    .boxed_local()
}

/// Consecutive chunks of `size`; the last may be shorter.
fn split_every(upstream: ValueStream, size: usize, container: Container) -> ValueStream {
    stream::unfold(Some(upstream), move |upstream| async move {
        let mut source = upstream?;
        let mut chunk = Vec::with_capacity(size);
        while chunk.len() < size {
            match source.next().await {
                Some(Ok(item)) => chunk.push(item),
                Some(Err(error)) => return Some((Err(error), None)),
                None if chunk.is_empty() => return None,
                None => return Some((materialize(chunk, container), None)),
            }
        }
        Some((materialize(chunk, container), Some(source)))
    })
    .boxed_local()
}

/// Every pair `(a, b)` with `a` before `b`. The source is pulled completely
/// before the first pair is produced.
fn combos(source: Rc<Stream>) -> ValueStream {
    stream::once(async move { source.values().await })
        .map_ok(|items| {
            let items = Rc::new(items);
            let n = items.len();
            let pairs = (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)));
            stream::iter(pairs.map(move |(i, j)| Ok(Value::tuple(vec![items[i].clone(), items[j].clone()]))))
        })
        .try_flatten()
        .boxed_local()
}

/// Fold with `reducer`. A reducer whose first parameter field has a default
/// is seeded with that default; otherwise the first element seeds the fold
/// and an empty source yields `()`.
async fn reduce(source: &Stream, reducer: &Value, ctx: &Context) -> Result<Value> {
    let mut items = source.open();

    let seed = match reducer {
        Value::Function(f) => match f.expr.param.first_field_default() {
            Some(default) => Some(evaluate(default, &ctx.with_env(f.env.clone())).await?),
            None => None,
        },
        _ => None,
    };

    let mut acc = match seed {
        Some(seed) => seed,
        None => match items.next().await {
            Some(first) => first?,
            None => return Ok(Value::empty()),
        },
    };

    while let Some(item) = items.next().await {
        acc = apply(reducer, Value::Tuple(Tuple::new(vec![acc, item?])), ctx).await?;
    }
    Ok(acc)
}
