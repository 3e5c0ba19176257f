use core::fmt;
use core::marker::PhantomData;
use std::sync::Arc;

use crate::{Interface, TypeKey, Value};

type Cast = Box<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

struct Capability {
    ty: TypeKey,
    cast: Cast,
}

/// A registered `(type, value)` pair.
///
/// Besides its own type, a binding may satisfy a number of interfaces; each
/// is recorded together with the upcast that turns the bound handle into a
/// handle of the interface type.
pub struct Binding {
    ty: TypeKey,
    value: Value,
    capabilities: Vec<Capability>,
}

impl Binding {
    pub(crate) fn new(ty: TypeKey, value: Value) -> Self {
        Binding {
            ty,
            value,
            capabilities: Vec::new(),
        }
    }

    pub(crate) fn with_capabilities<T: Implements>(value: Arc<T>) -> Self {
        let mut caps = Capabilities::new();
        T::capabilities(&mut caps);
        Binding {
            ty: TypeKey::of::<T>(),
            value: Value::new(value),
            capabilities: caps.list,
        }
    }

    pub fn ty(&self) -> TypeKey {
        self.ty
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether this binding is bound as `ty`, or declared to implement it.
    pub fn satisfies(&self, ty: &TypeKey) -> bool {
        self.ty == *ty || self.capabilities.iter().any(|cap| cap.ty == *ty)
    }

    /// The bound value viewed as the interface `ty`, if the binding declares it.
    pub(crate) fn upcast(&self, ty: &TypeKey) -> Option<Value> {
        self.capabilities
            .iter()
            .find(|cap| cap.ty == *ty)
            .and_then(|cap| (cap.cast)(&self.value))
    }

    /// The bound value as `ty`, either directly or through a capability.
    pub(crate) fn value_as(&self, ty: &TypeKey) -> Option<Value> {
        if self.ty == *ty {
            Some(self.value.clone())
        } else {
            self.upcast(ty)
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("ty", &self.ty)
            .field(
                "implements",
                &self.capabilities.iter().map(|cap| cap.ty).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Interfaces a value of type `T` is known to satisfy.
///
/// Filled in by [`Implements::capabilities`].
pub struct Capabilities<T> {
    list: Vec<Capability>,
    _marker: PhantomData<fn(T)>,
}

impl<T> Capabilities<T>
where
    T: Send + Sync + 'static,
{
    fn new() -> Self {
        Capabilities {
            list: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare that `T` implements `I`, with `upcast` performing the
    /// unsizing coercion, e.g. `|this| this as Arc<dyn Greeter>`.
    pub fn add<I>(&mut self, upcast: fn(Arc<T>) -> Arc<I>) -> &mut Self
    where
        I: ?Sized + Interface + Send + Sync,
    {
        self.list.push(Capability {
            ty: TypeKey::interface::<I>(),
            cast: Box::new(move |value: &Value| {
                value.downcast::<T>().map(|this| Value::new(upcast(this)))
            }),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Types that declare the interfaces they can be resolved as.
///
/// Usually derived:
/// ```ignore
/// #[derive(Implements)]
/// #[implements(dyn Greeter, dyn Named)]
/// struct English;
/// ```
pub trait Implements: Sized + Send + Sync + 'static {
    fn capabilities(caps: &mut Capabilities<Self>);
}
