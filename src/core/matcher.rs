//! Matchers select state definitions and transition rules.
//!
//! A matcher is a type check followed by a conjunction of predicates. In
//! Rust the type check is a narrowing function from the full value to the
//! part a definition cares about: usually an enum variant tag comparison,
//! optionally projecting into the variant payload. Predicates only ever see
//! values that passed the narrowing step.

use std::borrow::Cow;
use std::fmt;
use std::mem;
use std::sync::Arc;

type Narrow<T, R> = Arc<dyn Fn(&T) -> Option<&R> + Send + Sync>;
type Predicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Pure predicate over `T` that narrows matching values to `R`.
///
/// `R` defaults to `T` for matchers that only filter. Matchers are cheap to
/// clone and immutable once registered in a graph.
///
/// # Example
///
/// ```rust
/// use statewise::core::Matcher;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Reading {
///     Celsius(i32),
///     Offline,
/// }
///
/// let freezing = Matcher::any(|r: &Reading| match r {
///     Reading::Celsius(degrees) => Some(degrees),
///     _ => None,
/// })
/// .when(|degrees: &i32| *degrees <= 0);
///
/// assert!(freezing.matches(&Reading::Celsius(-4)));
/// assert!(!freezing.matches(&Reading::Celsius(12)));
/// assert!(!freezing.matches(&Reading::Offline));
/// assert_eq!(freezing.narrow(&Reading::Celsius(-4)), Some(&-4));
/// ```
pub struct Matcher<T, R = T> {
    description: Cow<'static, str>,
    narrow: Narrow<T, R>,
    predicates: Vec<Predicate<R>>,
}

impl<T, R> Matcher<T, R> {
    /// Create a matcher from a narrowing function.
    ///
    /// The function plays the role of the runtime type check: it returns the
    /// narrowed view of values it accepts and `None` for everything else.
    pub fn any<F>(narrow: F) -> Self
    where
        F: Fn(&T) -> Option<&R> + Send + Sync + 'static,
    {
        Matcher {
            description: Cow::Borrowed("any"),
            narrow: Arc::new(narrow),
            predicates: Vec::new(),
        }
    }

    /// Add a predicate over the narrowed value.
    ///
    /// Predicates must be pure; all of them have to hold for a match.
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Replace the description shown when inspecting a graph.
    pub fn described(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Check whether `value` passes the type check and every predicate.
    pub fn matches(&self, value: &T) -> bool {
        self.narrow(value).is_some()
    }

    /// Narrow `value` to `R` if it matches.
    pub fn narrow<'a>(&self, value: &'a T) -> Option<&'a R> {
        let narrowed = (self.narrow)(value)?;
        self.predicates
            .iter()
            .all(|predicate| predicate(narrowed))
            .then_some(narrowed)
    }

    /// Human-readable description used in `Debug` output and graph inspection.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of predicates added with [`Matcher::when`].
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Forget the narrowed type, keeping the match behaviour.
    pub(crate) fn erase(self) -> Matcher<T>
    where
        T: 'static,
        R: 'static,
    {
        let description = self.description.clone();
        Matcher::any(move |value: &T| self.matches(value).then_some(value)).described(description)
    }
}

impl<T> Matcher<T> {
    /// Matcher accepting every value.
    pub fn all() -> Self
    where
        T: 'static,
    {
        Matcher::any(|value: &T| Some(value)).described("all")
    }

    /// Matcher accepting values of the same enum variant as `sample`.
    ///
    /// Variant payloads are ignored; only the discriminant is compared.
    /// `T` should be an enum: the discriminant of any other type is
    /// unspecified.
    pub fn variant_of(sample: &T) -> Self
    where
        T: fmt::Debug + 'static,
    {
        let discriminant = mem::discriminant(sample);
        Matcher::any(move |value: &T| (mem::discriminant(value) == discriminant).then_some(value))
            .described(format!("variant of {sample:?}"))
    }

    /// Matcher accepting exactly `value`.
    ///
    /// Compares with `PartialEq` alone, so it works for any `T`, enum or not.
    /// For enums this accepts the same values as
    /// `variant_of(&value).when(|candidate| candidate == &value)`.
    pub fn eq(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        let description = format!("{value:?}");
        Matcher::all()
            .when(move |candidate: &T| candidate == &value)
            .described(description)
    }
}

impl<T, R> Clone for Matcher<T, R> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            narrow: Arc::clone(&self.narrow),
            predicates: self.predicates.clone(),
        }
    }
}

impl<T, R> fmt::Debug for Matcher<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("description", &self.description)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Idle,
        Running { job: u32 },
        Failed(String),
    }

    fn running() -> Matcher<TestState, u32> {
        Matcher::any(|s: &TestState| match s {
            TestState::Running { job } => Some(job),
            _ => None,
        })
    }

    #[test]
    fn any_checks_the_variant() {
        let matcher = running();

        assert!(matcher.matches(&TestState::Running { job: 1 }));
        assert!(!matcher.matches(&TestState::Idle));
        assert!(!matcher.matches(&TestState::Failed("boom".to_string())));
    }

    #[test]
    fn predicates_are_a_conjunction() {
        let matcher = running().when(|job| *job > 10).when(|job| job % 2 == 0);

        assert!(matcher.matches(&TestState::Running { job: 12 }));
        assert!(!matcher.matches(&TestState::Running { job: 13 }));
        assert!(!matcher.matches(&TestState::Running { job: 4 }));
        assert_eq!(matcher.predicate_count(), 2);
    }

    #[test]
    fn predicates_never_see_values_failing_the_type_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let matcher = running().when(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(!matcher.matches(&TestState::Idle));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(matcher.matches(&TestState::Running { job: 3 }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn narrow_returns_the_payload() {
        let matcher = running();
        let state = TestState::Running { job: 7 };

        assert_eq!(matcher.narrow(&state), Some(&7));
        assert_eq!(matcher.narrow(&TestState::Idle), None);
    }

    #[test]
    fn eq_matches_a_single_value() {
        let matcher = Matcher::eq(TestState::Failed("disk".to_string()));

        assert!(matcher.matches(&TestState::Failed("disk".to_string())));
        assert!(!matcher.matches(&TestState::Failed("network".to_string())));
        assert!(!matcher.matches(&TestState::Idle));
        assert_eq!(matcher.description(), "Failed(\"disk\")");
    }

    #[test]
    fn eq_works_for_plain_values() {
        let number = Matcher::eq(42u32);
        let name = Matcher::eq("solid".to_string());

        assert!(number.matches(&42));
        assert!(!number.matches(&7));
        assert!(name.matches(&"solid".to_string()));
        assert!(!name.matches(&"liquid".to_string()));
        assert_eq!(number.description(), "42");
    }

    #[test]
    fn variant_of_ignores_payloads() {
        let matcher = Matcher::variant_of(&TestState::Running { job: 0 });

        assert!(matcher.matches(&TestState::Running { job: 99 }));
        assert!(!matcher.matches(&TestState::Idle));
    }

    #[test]
    fn all_matches_everything() {
        let matcher = Matcher::<TestState>::all();

        assert!(matcher.matches(&TestState::Idle));
        assert!(matcher.matches(&TestState::Running { job: 1 }));
        assert_eq!(matcher.description(), "all");
    }

    #[test]
    fn erase_keeps_match_behaviour_and_description() {
        let matcher = running().when(|job| *job == 5).described("job five");
        let erased = matcher.erase();

        assert!(erased.matches(&TestState::Running { job: 5 }));
        assert!(!erased.matches(&TestState::Running { job: 6 }));
        assert_eq!(erased.description(), "job five");
    }

    #[test]
    fn matcher_is_deterministic() {
        let matcher = running().when(|job| *job < 100);
        let state = TestState::Running { job: 42 };

        assert_eq!(matcher.matches(&state), matcher.matches(&state));
    }
}
