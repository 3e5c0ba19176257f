use std::sync::Arc;

use crate::{InjectError, Injector, Resolve, Value};

/// Callables whose arguments can all be resolved from an [`Injector`].
///
/// Implemented for every `FnOnce` of up to twelve arguments whose argument
/// types implement [`Resolve`]. `Args` is the tuple of argument types; it only
/// exists to keep the implementations apart and is always inferred.
pub trait Invocable<Args> {
    type Output;

    fn invoke(self, injector: &Injector) -> Result<Self::Output, InjectError>;
}

macro_rules! impl_invocable {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Invocable<($($arg,)*)> for Func
        where
            Func: FnOnce($($arg),*) -> Out,
            $($arg: Resolve,)*
        {
            type Output = Out;

            #[allow(non_snake_case, unused_variables)]
            fn invoke(self, injector: &Injector) -> Result<Out, InjectError> {
                $(let $arg = <$arg as Resolve>::resolve(injector)?;)*
                Ok((self)($($arg),*))
            }
        }
    };
}

impl_invocable!();
impl_invocable!(A1);
impl_invocable!(A1, A2);
impl_invocable!(A1, A2, A3);
impl_invocable!(A1, A2, A3, A4);
impl_invocable!(A1, A2, A3, A4, A5);
impl_invocable!(A1, A2, A3, A4, A5, A6);
impl_invocable!(A1, A2, A3, A4, A5, A6, A7);
impl_invocable!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_invocable!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_invocable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_invocable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_invocable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

/// Return types of factories passed to [`Injector::provide`].
///
/// Each produced [`Value`] becomes one binding, keyed by its own type. A
/// factory returning `Arc<dyn Trait>` therefore binds the trait object type.
pub trait IntoValues {
    fn into_values(self) -> Vec<Value>;
}

impl IntoValues for () {
    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

impl<T> IntoValues for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn into_values(self) -> Vec<Value> {
        vec![Value::new(self)]
    }
}

impl IntoValues for Value {
    fn into_values(self) -> Vec<Value> {
        vec![self]
    }
}

impl IntoValues for Vec<Value> {
    fn into_values(self) -> Vec<Value> {
        self
    }
}

macro_rules! impl_into_values {
    ($($out:ident),+) => {
        impl<$($out: IntoValues),+> IntoValues for ($($out,)+) {
            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<Value> {
                let ($($out,)+) = self;
                let mut values = Vec::new();
                $(values.extend($out.into_values());)+
                values
            }
        }
    };
}

impl_into_values!(R1);
impl_into_values!(R1, R2);
impl_into_values!(R1, R2, R3);
impl_into_values!(R1, R2, R3, R4);
impl_into_values!(R1, R2, R3, R4, R5);
impl_into_values!(R1, R2, R3, R4, R5, R6);
impl_into_values!(R1, R2, R3, R4, R5, R6, R7);
impl_into_values!(R1, R2, R3, R4, R5, R6, R7, R8);
