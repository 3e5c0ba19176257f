use std::sync::Arc;

use crate::{InjectError, Injector, Interface};

/// Types that can be looked up from an [`Injector`].
///
/// This is what struct fields marked `#[inject]` and the parameters of
/// [`Injector::invoke`] are resolved through.
pub trait Resolve: Sized {
    fn resolve(injector: &Injector) -> Result<Self, InjectError>;
}

impl<T> Resolve for Arc<T>
where
    T: ?Sized + 'static,
{
    fn resolve(injector: &Injector) -> Result<Self, InjectError> {
        injector.get::<T>()
    }
}

/// A slot that starts out empty. Resolution is still required: a missing
/// value is an error, not `None`.
impl<R: Resolve> Resolve for Option<R> {
    fn resolve(injector: &Injector) -> Result<Self, InjectError> {
        R::resolve(injector).map(Some)
    }
}

/// Every implementor of `I`; never fails.
impl<I> Resolve for Vec<Arc<I>>
where
    I: ?Sized + Interface,
{
    fn resolve(injector: &Injector) -> Result<Self, InjectError> {
        Ok(injector.get_all::<I>())
    }
}
