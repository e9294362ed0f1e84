//! Declarative macros to reduce boilerplate across the cpuflags codebase

/// Define a fieldless enum with `name()`, `from_name()` and `all()`
///
/// # Example
/// ```
/// use cpuflags::named_enum;
///
/// named_enum! {
///     pub enum Flavor {
///         Plain => "plain",
///         Fancy => "fancy",
///     }
/// }
///
/// assert_eq!(Flavor::Fancy.name(), "fancy");
/// assert_eq!(Flavor::from_name("plain"), Some(Flavor::Plain));
/// assert_eq!(Flavor::all().len(), 2);
/// ```
///
/// Expands to:
/// - An enum with Debug, Clone, Copy, PartialEq, Eq, Hash derives
/// - A `name(&self) -> &'static str` method
/// - A `from_name(&str) -> Option<Self>` lookup
/// - An `all() -> Vec<Self>` method, in declaration order
#[macro_export]
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $str:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)*
                }
            }

            pub fn from_name(name: &str) -> Option<$name> {
                match name {
                    $($str => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn all() -> Vec<$name> {
                vec![$($name::$variant,)*]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}
