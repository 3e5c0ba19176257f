use crate::{InjectError, Injector};

/// Structs whose marked fields can be filled from an [`Injector`].
///
/// Derive it with `#[derive(Inject)]` and mark fields with `#[inject]`; each
/// marked field's type must implement [`Resolve`](crate::Resolve).
pub trait Apply {
    fn apply(&mut self, injector: &Injector) -> Result<(), InjectError>;
}

impl<T: ?Sized + Apply> Apply for &mut T {
    fn apply(&mut self, injector: &Injector) -> Result<(), InjectError> {
        (**self).apply(injector)
    }
}

impl<T: ?Sized + Apply> Apply for Box<T> {
    fn apply(&mut self, injector: &Injector) -> Result<(), InjectError> {
        (**self).apply(injector)
    }
}
