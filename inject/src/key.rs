use core::any::{type_name, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::size_of;

/// Marker for types that can be used as capabilities.
///
/// Implemented for trait object types, usually through the `#[interface]`
/// attribute:
/// ```ignore
/// #[inject::interface]
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
/// // expands to the trait plus
/// impl ::inject::Interface for dyn Greeter {}
/// ```
pub trait Interface: 'static {}

/// Runtime descriptor of a type.
///
/// Two keys are equal when they describe the same type; the name and the
/// flags do not take part in comparisons.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    sized: bool,
    interface: bool,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            // Pointers to unsized types carry metadata and are wider.
            sized: size_of::<*const T>() == size_of::<*const ()>(),
            interface: false,
        }
    }

    pub fn interface<I: ?Sized + Interface>() -> Self {
        TypeKey {
            interface: true,
            ..Self::of::<I>()
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this key was created for an [`Interface`] type.
    pub fn is_interface(&self) -> bool {
        self.interface
    }

    pub fn is_sized(&self) -> bool {
        self.sized
    }

    /// Whether the type may be an interface.
    ///
    /// Keys built with [`TypeKey::of`] for a trait object do not carry the
    /// interface flag, so any unsized type is given the benefit of the doubt.
    /// Sized types are interfaces only when keyed with
    /// [`TypeKey::interface`].
    pub fn may_be_interface(&self) -> bool {
        self.interface || !self.sized
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
