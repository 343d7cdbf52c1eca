//! Macros for ergonomic matcher construction.

/// Build a [`Matcher`](crate::core::Matcher) from an enum pattern.
///
/// `variant!(Pattern)` matches values fitting the pattern and keeps the
/// full value. `variant!(Pattern => payload)` also narrows to the payload
/// bound by the pattern, which rules and listeners then receive.
///
/// # Example
///
/// ```
/// use statewise::variant;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Door {
///     Open,
///     Closed,
///     Locked { code: u32 },
/// }
///
/// let shut = variant!(Door::Closed | Door::Locked { .. });
/// assert!(shut.matches(&Door::Closed));
/// assert!(!shut.matches(&Door::Open));
///
/// let locked = variant!(Door::Locked { code } => code).when(|code| *code > 1000);
/// assert_eq!(locked.narrow(&Door::Locked { code: 4242 }), Some(&4242));
/// assert!(!locked.matches(&Door::Locked { code: 7 }));
/// ```
#[macro_export]
macro_rules! variant {
    ($pattern:pat => $payload:expr) => {
        $crate::core::Matcher::any(|value| match value {
            $pattern => ::core::option::Option::Some($payload),
            #[allow(unreachable_patterns)]
            _ => ::core::option::Option::None,
        })
        .described(stringify!($pattern))
    };
    ($pattern:pat) => {
        $crate::core::Matcher::any(|value| {
            if matches!(value, $pattern) {
                ::core::option::Option::Some(value)
            } else {
                ::core::option::Option::None
            }
        })
        .described(stringify!($pattern))
    };
}
