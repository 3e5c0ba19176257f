use thiserror::Error;

use crate::TypeKey;

/// Errors raised while resolving a value from an [`Injector`](crate::Injector).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    /// Nothing is bound for the type, neither locally nor in any parent.
    #[error("value not found for type `{0}`")]
    NotFound(TypeKey),

    /// A binding exists for the type but holds a value of another type.
    ///
    /// Only bindings added through [`Injector::set`](crate::Injector::set)
    /// can be in this state.
    #[error("value bound for type `{expected}` has type `{found}`")]
    TypeMismatch { expected: TypeKey, found: TypeKey },
}

impl InjectError {
    /// The type that was requested.
    pub fn ty(&self) -> TypeKey {
        match self {
            InjectError::NotFound(ty) => *ty,
            InjectError::TypeMismatch { expected, .. } => *expected,
        }
    }
}
