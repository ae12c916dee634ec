use anyhow::Error;
use log::debug;

/// Result of an operation represented as exactly one of two mutually
/// exclusive states: a successful value or a failure value.
///
/// An `Outcome` is built once, either directly through [`Outcome::success`] /
/// [`Outcome::failure`] or through one of the guard functions in
/// [`crate::guard`], and is immutable afterwards. Transformations never
/// mutate an existing instance, they consume it and produce a new one, so
/// instances can be shared across threads whenever their payloads can.
///
/// Two outcomes are equal iff they are the same variant and their payloads
/// are equal; a `Success` is never equal to a `Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<S, F> {
    /// Holds the single immutable value of a completed operation.
    Success(S),

    /// Holds the single immutable error of a failed operation.
    Failure(F),
}

impl<S, F> Outcome<S, F> {
    /// Wraps a value in the success variant.
    pub fn success(value: S) -> Self {
        Self::Success(value)
    }

    /// Wraps an error in the failure variant.
    pub fn failure(error: F) -> Self {
        Self::Failure(error)
    }

    /// Returns true for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for the failure variant.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the held value, or None for a failure.
    pub fn value(&self) -> Option<&S> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns the held error, or None for a success.
    pub fn error(&self) -> Option<&F> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Consumes the outcome and returns the held value, or None for a failure.
    pub fn into_value(self) -> Option<S> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Consumes the outcome and returns the held error, or None for a success.
    pub fn into_error(self) -> Option<F> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Returns the held value, or the eagerly supplied default for a failure.
    pub fn value_or(self, default: S) -> S {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    /// Returns the held value, or the result of `or_else` applied to the held
    /// error.
    ///
    /// `or_else` runs outside any failure boundary: a panic inside it
    /// propagates to the caller. Use [`Outcome::guard_recover`] for a
    /// contained version.
    pub fn value_or_else<O>(self, or_else: O) -> S
    where
        O: FnOnce(F) -> S,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => or_else(error),
        }
    }

    /// Converts into the standard library result, success becoming Ok.
    pub fn into_result(self) -> Result<S, F> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }

    /// Collapses both variants into a single value.
    pub fn fold<T, OS, OF>(self, on_success: OS, on_failure: OF) -> T
    where
        OS: FnOnce(S) -> T,
        OF: FnOnce(F) -> T,
    {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(error) => on_failure(error),
        }
    }

    /// Runs `f` against the held value for its side effect and returns the
    /// outcome unchanged. A failure is passed through without calling `f`.
    pub fn inspect_success<O>(self, f: O) -> Self
    where
        O: FnOnce(&S),
    {
        if let Self::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Runs `f` against the held error for its side effect and returns the
    /// outcome unchanged. A success is passed through without calling `f`.
    pub fn inspect_failure<O>(self, f: O) -> Self
    where
        O: FnOnce(&F),
    {
        if let Self::Failure(error) = &self {
            f(error);
        }
        self
    }

    /// Transforms the held value, leaving a failure untouched.
    ///
    /// `transform` is assumed total; see [`Outcome::guard_map`] for
    /// transformers that may themselves fail.
    pub fn map<T, O>(self, transform: O) -> Outcome<T, F>
    where
        O: FnOnce(S) -> T,
    {
        match self {
            Self::Success(value) => Outcome::Success(transform(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transforms the held error, leaving a success untouched.
    pub fn map_failure<G, O>(self, transform: O) -> Outcome<S, G>
    where
        O: FnOnce(F) -> G,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(transform(error)),
        }
    }

    /// Converts a failure into a success by transforming the held error into
    /// a replacement value. A success is passed through untouched.
    pub fn recover<O>(self, transform: O) -> Outcome<S, F>
    where
        O: FnOnce(F) -> S,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Success(transform(error)),
        }
    }

    /// Chains a computation that itself produces an outcome, short-circuiting
    /// on failure.
    pub fn and_then<T, O>(self, transform: O) -> Outcome<T, F>
    where
        O: FnOnce(S) -> Outcome<T, F>,
    {
        match self {
            Self::Success(value) => transform(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }
}

impl<S, F> Outcome<S, F>
where
    F: Into<Error>,
{
    /// Returns the held value, or re-raises the held error as the active
    /// fault for the caller to propagate with `?`.
    ///
    /// The error payload has to be a real fault type; an outcome carrying an
    /// arbitrary payload (a bare status code for example) does not get to
    /// pose as one, the bound rejects it at compile time.
    pub fn value_or_raise(self) -> anyhow::Result<S> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error.into()),
        }
    }
}

/// Combinators whose transformers may themselves fail. They run the
/// transformer under the same failure boundary as [`crate::guard`], which
/// pins the error side to the universal fault type.
impl<T> Outcome<T, Error> {
    /// Transforms the held value under the synchronous guard: a fault raised
    /// by the transformer becomes a failure instead of escaping. A failure is
    /// passed through without calling `transform`.
    pub fn guard_map<U, E, O>(self, transform: O) -> Outcome<U, Error>
    where
        O: FnOnce(T) -> Result<U, E>,
        E: Into<Error>,
    {
        match self {
            Self::Success(value) => crate::guard(|| transform(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transforms the held error under the synchronous guard. A fault raised
    /// by the transformer itself becomes a failure wrapping that new fault.
    /// A success is passed through without calling `transform`.
    pub fn guard_map_failure<E, O>(self, transform: O) -> Outcome<T, Error>
    where
        O: FnOnce(Error) -> Result<Error, E>,
        E: Into<Error>,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => match transform(error) {
                Ok(mapped) => Outcome::Failure(mapped),
                Err(fault) => {
                    // the new fault wins over the error being mapped
                    let fault = fault.into();
                    debug!("failure mapping raised its own fault: {:#}", fault);
                    Outcome::Failure(fault)
                }
            },
        }
    }

    /// Converts a failure into a success under the synchronous guard: if the
    /// recovery itself faults, the result is a failure wrapping the new fault
    /// instead of a recovered success.
    pub fn guard_recover<E, O>(self, transform: O) -> Outcome<T, Error>
    where
        O: FnOnce(Error) -> Result<T, E>,
        E: Into<Error>,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => crate::guard(|| transform(error)),
        }
    }
}

impl<S, F> From<Result<S, F>> for Outcome<S, F> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<S, F> From<Outcome<S, F>> for Result<S, F> {
    fn from(outcome: Outcome<S, F>) -> Self {
        outcome.into_result()
    }
}
