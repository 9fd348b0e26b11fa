//! Predicate dispatch: ordered (predicate, handler) pairs, first match wins.

use std::fmt;

use crate::ValidationError;

type Predicate<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;
type HandlerFn<A, R> = Box<dyn Fn(A) -> R + Send + Sync>;

/// Selects an implementation by testing the arguments against predicates in insertion order.
/// Falls back to the default handler, if any, when no predicate holds.
pub struct Dispatcher<A, R> {
    handlers: Vec<(Predicate<A>, HandlerFn<A, R>)>,
    default: Option<HandlerFn<A, R>>,
}

impl<A, R> Dispatcher<A, R> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            default: None,
        }
    }

    /// Append a (predicate, handler) pair. Pairs are tried in the order they were added.
    pub fn when(
        mut self,
        predicate: impl Fn(&A) -> bool + Send + Sync + 'static,
        handler: impl Fn(A) -> R + Send + Sync + 'static,
    ) -> Self {
        self.handlers.push((Box::new(predicate), Box::new(handler)));
        self
    }

    pub fn otherwise(mut self, handler: impl Fn(A) -> R + Send + Sync + 'static) -> Self {
        self.default = Some(Box::new(handler));
        self
    }

    pub fn dispatch(&self, args: A) -> Result<R, ValidationError>
    where
        A: fmt::Debug,
    {
        let handler = self
            .handlers
            .iter()
            .find(|(predicate, _)| predicate(&args))
            .map(|(_, handler)| handler)
            .or(self.default.as_ref());
        match handler {
            Some(handler) => Ok(handler(args)),
            None => Err(ValidationError::NoDispatchMatch {
                args: format!("{:?}", args),
            }),
        }
    }
}

impl<A, R> Default for Dispatcher<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_if_ints_multiply_if_floats() -> Dispatcher<(f64, f64), f64> {
        Dispatcher::<(f64, f64), f64>::new()
            .when(|(a, b)| a.fract() == 0.0 && b.fract() == 0.0, |(a, b)| a + b)
            .when(|(a, b)| a.fract() != 0.0 && b.fract() != 0.0, |(a, b)| a * b)
    }

    #[test]
    fn first_matching_predicate_wins() {
        let d = add_if_ints_multiply_if_floats();
        assert_eq!(d.dispatch((10.0, 10.0)).unwrap(), 20.0);
        assert_eq!(d.dispatch((0.5, 0.5)).unwrap(), 0.25);
    }

    #[test]
    fn order_is_part_of_the_contract() {
        let d = Dispatcher::<i32, &str>::new()
            .when(|n| *n > 0, |_| "positive")
            .when(|n| *n > 10, |_| "large");
        assert_eq!(d.dispatch(50).unwrap(), "positive");
    }

    #[test]
    fn default_used_when_nothing_matches() {
        let d = add_if_ints_multiply_if_floats().otherwise(|(a, _)| a);
        assert_eq!(d.dispatch((1.0, 0.5)).unwrap(), 1.0);
    }

    #[test]
    fn no_match_without_default_names_the_arguments() {
        let err = add_if_ints_multiply_if_floats()
            .dispatch((1.0, 0.5))
            .unwrap_err();
        match err {
            ValidationError::NoDispatchMatch { args } => assert_eq!(args, "(1.0, 0.5)"),
            other => panic!("expected NoDispatchMatch, got {:?}", other),
        }
    }
}
