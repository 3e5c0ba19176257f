use core::any::Any;
use core::fmt;
use std::sync::Arc;

use crate::TypeKey;

trait Handle: Send + Sync {
    fn dyn_clone(&self) -> Box<dyn Handle>;

    fn as_any(&self) -> &dyn Any;
}

impl<T> Handle for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn dyn_clone(&self) -> Box<dyn Handle> {
        Box::new(Arc::clone(self))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Type-erased shared handle to a registered value.
///
/// A `Value` always wraps an `Arc<T>`. Cloning it clones the handle; the
/// value behind it is never copied.
pub struct Value {
    ty: TypeKey,
    handle: Box<dyn Handle>,
}

impl Value {
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Value {
            ty: TypeKey::of::<T>(),
            handle: Box::new(value),
        }
    }

    pub fn of<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::new(Arc::new(value))
    }

    /// Type of the value behind the handle.
    pub fn ty(&self) -> TypeKey {
        self.ty
    }

    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + 'static,
    {
        self.handle.as_any().downcast_ref::<Arc<T>>().cloned()
    }

    pub fn is<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.handle.as_any().is::<Arc<T>>()
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Value {
            ty: self.ty,
            handle: self.handle.dyn_clone(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("ty", &self.ty).finish()
    }
}
