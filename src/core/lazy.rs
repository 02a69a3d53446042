/// Generate accessors for a materialize-on-first-access field.
///
/// For a private `Option<T>` field this yields a read accessor that never
/// allocates, a `_mut` accessor that creates `T::default()` on first use, and
/// a setter that replaces the value outright (`None` resets it to untouched).
macro_rules! lazy_field {
    ($(#[$meta:meta])* $field:ident, $field_mut:ident, $setter:ident: $ty:ty) => {
        $(#[$meta])*
        pub fn $field(&self) -> Option<&$ty> {
            self.$field.as_ref()
        }

        /// Mutable access, created with its default value on first use.
        pub fn $field_mut(&mut self) -> &mut $ty {
            self.$field.get_or_insert_with(<$ty>::default)
        }

        /// Replace the value; `None` makes the field untouched again.
        pub fn $setter(&mut self, value: Option<$ty>) {
            self.$field = value;
        }
    };
}
