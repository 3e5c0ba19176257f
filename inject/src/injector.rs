use core::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::binding::Binding;
use crate::{Apply, Implements, InjectError, Interface, IntoValues, Invocable, TypeKey, Value};

/// Registry of values keyed by type.
///
/// Bindings are kept in insertion order and never replaced: when a type is
/// bound more than once, lookups return the first binding. A lookup that
/// finds nothing locally is forwarded to the parent, if any.
///
/// Registration needs `&mut self`, lookups only `&self`. Once configured, an
/// injector can be shared behind an [`Arc`], which is also how it is held as
/// a parent.
#[derive(Default)]
pub struct Injector {
    bindings: Vec<Binding>,
    parent: Option<Arc<Injector>>,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Arc<Injector>) -> Self {
        Injector {
            bindings: Vec::new(),
            parent: Some(parent),
        }
    }

    /// Set the injector consulted when a type is not bound here.
    pub fn set_parent(&mut self, parent: Arc<Injector>) {
        self.parent = Some(parent);
    }

    pub fn parent(&self) -> Option<&Arc<Injector>> {
        self.parent.as_ref()
    }

    /// Number of local bindings; the parent is not counted.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.bindings.iter()
    }

    fn push(&mut self, binding: Binding) -> &mut Self {
        trace!(ty = %binding.ty(), "binding value");
        self.bindings.push(binding);
        self
    }

    /// Bind `value` under its own type.
    pub fn map<T>(&mut self, value: T) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        self.map_shared(Arc::new(value))
    }

    /// Bind an existing handle under the type it points to.
    pub fn map_shared<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.push(Binding::new(TypeKey::of::<T>(), Value::new(value)))
    }

    /// Bind `value` under its own type, along with every interface it
    /// declares through [`Implements`].
    pub fn map_implementing<T: Implements>(&mut self, value: T) -> &mut Self {
        self.push(Binding::with_capabilities(Arc::new(value)))
    }

    /// Bind `value` as the interface `I`.
    ///
    /// ```ignore
    /// injector.map_to::<dyn Greeter>(Arc::new(English));
    /// ```
    pub fn map_to<I>(&mut self, value: Arc<I>) -> &mut Self
    where
        I: ?Sized + Interface + Send + Sync,
    {
        self.push(Binding::new(TypeKey::interface::<I>(), Value::new(value)))
    }

    /// Bind `value` under `ty` as given.
    ///
    /// Nothing checks that `value` actually holds a `ty`; typed lookups of a
    /// mismatched binding fail with [`InjectError::TypeMismatch`].
    pub fn set(&mut self, ty: TypeKey, value: Value) -> &mut Self {
        self.push(Binding::new(ty, value))
    }

    /// Call `factory` with arguments resolved from this injector and bind
    /// every value it returns under its own type.
    ///
    /// Nothing is bound when an argument cannot be resolved.
    pub fn provide<Args, F>(&mut self, factory: F) -> Result<&mut Self, InjectError>
    where
        F: Invocable<Args>,
        F::Output: IntoValues,
    {
        let values = factory.invoke(self)?.into_values();
        debug!(count = values.len(), "binding provided values");
        for value in values {
            self.push(Binding::new(value.ty(), value));
        }
        Ok(self)
    }

    fn lookup(&self, ty: &TypeKey) -> Option<Value> {
        if let Some(binding) = self.bindings.iter().find(|b| b.ty() == *ty) {
            trace!(%ty, "resolved by exact type");
            return Some(binding.value().clone());
        }

        // Only interface keys are ever recorded as capabilities.
        if let Some(value) = self.bindings.iter().find_map(|b| b.upcast(ty)) {
            trace!(%ty, "resolved by implementor");
            return Some(value);
        }

        self.parent.as_ref().and_then(|parent| {
            trace!(%ty, "looking up parent");
            parent.lookup(ty)
        })
    }

    /// Resolve the value bound for `ty`.
    ///
    /// Looks for a binding of exactly `ty` first, then for the first binding
    /// declaring `ty` as a capability, then asks the parent.
    pub fn get_value(&self, ty: &TypeKey) -> Result<Value, InjectError> {
        self.lookup(ty).ok_or_else(|| {
            debug!(%ty, "no value found");
            InjectError::NotFound(*ty)
        })
    }

    pub fn get<T>(&self) -> Result<Arc<T>, InjectError>
    where
        T: ?Sized + 'static,
    {
        let expected = TypeKey::of::<T>();
        let value = self.get_value(&expected)?;
        value.downcast::<T>().ok_or(InjectError::TypeMismatch {
            expected,
            found: value.ty(),
        })
    }

    /// Every value satisfying the interface `ty`: local bindings in
    /// insertion order, followed by the parent's.
    ///
    /// # Panics
    ///
    /// If `ty` describes a sized type not keyed with
    /// [`TypeKey::interface`] (see [`TypeKey::may_be_interface`]).
    pub fn get_all_values(&self, ty: &TypeKey) -> Vec<Value> {
        assert!(
            ty.may_be_interface(),
            "cannot get all implementors of non-interface type `{}`",
            ty
        );
        self.collect(ty)
    }

    fn collect(&self, ty: &TypeKey) -> Vec<Value> {
        let mut values: Vec<Value> = self.bindings.iter().filter_map(|b| b.value_as(ty)).collect();
        if let Some(parent) = &self.parent {
            values.extend(parent.collect(ty));
        }
        values
    }

    pub fn get_all<I>(&self) -> Vec<Arc<I>>
    where
        I: ?Sized + Interface,
    {
        self.get_all_values(&TypeKey::interface::<I>())
            .iter()
            .filter_map(|value| {
                let found = value.downcast::<I>();
                if found.is_none() {
                    debug!(ty = %value.ty(), "skipping mismatched binding");
                }
                found
            })
            .collect()
    }

    /// Fill the `#[inject]` fields of `target`.
    pub fn apply<T>(&self, target: &mut T) -> Result<(), InjectError>
    where
        T: ?Sized + Apply,
    {
        target.apply(self)
    }

    /// Call `f` with every argument resolved by type.
    ///
    /// Arguments are resolved left to right; `f` is not called when one of
    /// them cannot be resolved.
    pub fn invoke<Args, F>(&self, f: F) -> Result<F::Output, InjectError>
    where
        F: Invocable<Args>,
    {
        f.invoke(self)
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("bindings", &self.bindings)
            .field("parent", &self.parent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capabilities;
    use pretty_assertions::assert_eq;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }
    impl Interface for dyn Greeter {}

    trait Counter: Send + Sync {}
    impl Interface for dyn Counter {}

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_owned()
        }
    }

    impl Implements for English {
        fn capabilities(caps: &mut Capabilities<Self>) {
            caps.add::<dyn Greeter>(|this| this as Arc<dyn Greeter>);
        }
    }

    struct French;

    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_owned()
        }
    }

    impl Implements for French {
        fn capabilities(caps: &mut Capabilities<Self>) {
            caps.add::<dyn Greeter>(|this| this as Arc<dyn Greeter>);
        }
    }

    fn greetings(greeters: &[Arc<dyn Greeter>]) -> Vec<String> {
        greeters.iter().map(|g| g.greet()).collect()
    }

    #[test]
    fn map_then_get() {
        let mut injector = Injector::new();
        injector.map(42u32).map(String::from("text"));

        assert_eq!(*injector.get::<u32>().unwrap(), 42);
        assert_eq!(*injector.get::<String>().unwrap(), "text");
        assert_eq!(injector.len(), 2);
    }

    #[test]
    fn map_shared_keeps_the_handle() {
        let shared = Arc::new(vec![1, 2, 3]);
        let mut injector = Injector::new();
        injector.map_shared(Arc::clone(&shared));

        assert!(Arc::ptr_eq(&injector.get::<Vec<i32>>().unwrap(), &shared));
    }

    #[test]
    fn first_registered_wins() {
        let mut injector = Injector::new();
        injector.map(1u8).map(2u8);

        assert_eq!(*injector.get::<u8>().unwrap(), 1);
    }

    #[test]
    fn missing_type_is_reported() {
        let injector = Injector::new();

        let err = injector.get::<u64>().unwrap_err();
        assert_eq!(err, InjectError::NotFound(TypeKey::of::<u64>()));
        assert_eq!(err.to_string(), "value not found for type `u64`");
    }

    #[test]
    fn map_to_interface() {
        let mut injector = Injector::new();
        injector.map_to::<dyn Greeter>(Arc::new(French));

        assert_eq!(injector.get::<dyn Greeter>().unwrap().greet(), "bonjour");
        assert!(injector.get::<French>().is_err());
    }

    #[test]
    fn exact_binding_preferred_over_implementor() {
        let mut injector = Injector::new();
        injector
            .map_implementing(English)
            .map_to::<dyn Greeter>(Arc::new(French));

        assert_eq!(injector.get::<dyn Greeter>().unwrap().greet(), "bonjour");
    }

    #[test]
    fn first_implementor_wins() {
        let mut injector = Injector::new();
        injector.map_implementing(French).map_implementing(English);

        assert_eq!(injector.get::<dyn Greeter>().unwrap().greet(), "bonjour");
        assert!(injector.get::<English>().is_ok());
        assert!(injector.get::<dyn Counter>().is_err());
    }

    #[test]
    fn parent_fallback_and_shadowing() {
        let mut parent = Injector::new();
        parent.map(String::from("parent")).map(7i64);
        let parent = Arc::new(parent);

        let mut child = Injector::with_parent(Arc::clone(&parent));
        assert!(Arc::ptr_eq(
            &child.get::<i64>().unwrap(),
            &parent.get::<i64>().unwrap()
        ));

        child.map(String::from("child"));
        assert_eq!(*child.get::<String>().unwrap(), "child");
        assert_eq!(*parent.get::<String>().unwrap(), "parent");
    }

    #[test]
    fn parent_miss_is_reported() {
        let mut child = Injector::new();
        child.set_parent(Arc::new(Injector::new()));

        assert_eq!(
            child.get::<bool>().unwrap_err(),
            InjectError::NotFound(TypeKey::of::<bool>())
        );
    }

    #[test]
    fn local_implementor_before_parent_exact() {
        let mut parent = Injector::new();
        parent.map_to::<dyn Greeter>(Arc::new(French));

        let mut child = Injector::with_parent(Arc::new(parent));
        child.map_implementing(English);

        assert_eq!(child.get::<dyn Greeter>().unwrap().greet(), "hello");
    }

    #[test]
    fn get_all_collects_local_then_parent() {
        let mut grandparent = Injector::new();
        grandparent.map_implementing(English);

        let mut parent = Injector::with_parent(Arc::new(grandparent));
        parent.map_implementing(French);

        let mut child = Injector::with_parent(Arc::new(parent));
        child
            .map_to::<dyn Greeter>(Arc::new(English))
            .map(5u32)
            .map_implementing(French);

        assert_eq!(
            greetings(&child.get_all::<dyn Greeter>()),
            vec!["hello", "bonjour", "bonjour", "hello"]
        );
    }

    #[test]
    fn get_all_without_implementors_is_empty() {
        let mut child = Injector::with_parent(Arc::new(Injector::new()));
        child.map(1u32);

        assert!(child.get_all::<dyn Greeter>().is_empty());
        assert!(child
            .get_all_values(&TypeKey::interface::<dyn Counter>())
            .is_empty());
    }

    #[test]
    #[should_panic(expected = "non-interface type")]
    fn get_all_values_rejects_concrete_types() {
        let mut injector = Injector::new();
        injector.map(1u32);

        injector.get_all_values(&TypeKey::of::<u32>());
    }

    #[test]
    fn get_all_values_accepts_keys_of_bound_trait_objects() {
        let mut injector = Injector::new();
        injector
            .provide(|| Arc::new(English) as Arc<dyn Greeter>)
            .unwrap()
            .map_shared(Arc::new(French) as Arc<dyn Greeter>);

        let key = injector.bindings().next().map(Binding::ty).unwrap();
        assert!(!key.is_interface());

        let values = injector.get_all_values(&key);
        let greeters: Vec<Arc<dyn Greeter>> =
            values.iter().filter_map(|v| v.downcast::<dyn Greeter>()).collect();
        assert_eq!(greetings(&greeters), vec!["hello", "bonjour"]);
        assert_eq!(injector.get_all::<dyn Greeter>().len(), 2);
    }

    #[test]
    fn set_binds_raw_pairs() {
        let mut injector = Injector::new();
        injector.set(TypeKey::of::<u16>(), Value::of(9u16));

        assert_eq!(*injector.get::<u16>().unwrap(), 9);
    }

    #[test]
    fn set_with_mismatched_value() {
        let mut injector = Injector::new();
        injector.set(TypeKey::of::<u16>(), Value::of("nine"));

        assert_eq!(
            injector.get::<u16>().unwrap_err(),
            InjectError::TypeMismatch {
                expected: TypeKey::of::<u16>(),
                found: TypeKey::of::<&'static str>(),
            }
        );
        let raw = injector.get_value(&TypeKey::of::<u16>()).unwrap();
        assert_eq!(*raw.downcast::<&str>().unwrap(), "nine");
    }

    #[test]
    fn get_all_skips_mismatched_raw_bindings() {
        let mut injector = Injector::new();
        injector
            .set(TypeKey::interface::<dyn Greeter>(), Value::of(3u8))
            .map_implementing(English);

        assert_eq!(injector.get_all_values(&TypeKey::interface::<dyn Greeter>()).len(), 2);
        assert_eq!(greetings(&injector.get_all::<dyn Greeter>()), vec!["hello"]);
    }

    #[test]
    fn provide_binds_outputs() {
        let mut injector = Injector::new();
        injector.map(2u32);
        injector
            .provide(|n: Arc<u32>| (Arc::new(u64::from(*n) * 10), Arc::new(String::from("made"))))
            .unwrap()
            .provide(|_: Arc<u64>| Arc::new(French) as Arc<dyn Greeter>)
            .unwrap();

        assert_eq!(*injector.get::<u64>().unwrap(), 20);
        assert_eq!(*injector.get::<String>().unwrap(), "made");
        assert_eq!(injector.get::<dyn Greeter>().unwrap().greet(), "bonjour");
        assert_eq!(injector.len(), 4);
    }

    #[test]
    fn provide_with_missing_dependency_binds_nothing() {
        let mut injector = Injector::new();

        let err = injector
            .provide(|_: Arc<i8>| Arc::new(0u8))
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.ty(), TypeKey::of::<i8>());
        assert!(injector.is_empty());
    }

    #[test]
    fn injector_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Injector>();
    }

    #[test]
    fn debug_lists_bound_types() {
        let mut injector = Injector::new();
        injector.map(1u8);

        let debug = format!("{:?}", injector);
        assert!(debug.contains("u8"), "{}", debug);
    }
}
