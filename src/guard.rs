use crate::outcome::Outcome;
use anyhow::Error;
use log::debug;
use std::future::Future;

/// Runs `op` inside a failure boundary on the calling thread.
///
/// A completed operation is wrapped in success; a fault raised by it is
/// captured together with its context and held as the failure payload
/// instead of propagating past the call.
pub fn guard<T, E, O>(op: O) -> Outcome<T, Error>
where
    O: FnOnce() -> Result<T, E>,
    E: Into<Error>,
{
    match op() {
        Ok(value) => Outcome::Success(value),
        Err(fault) => {
            let fault = fault.into();
            debug!("guard captured fault: {:#}", fault);
            Outcome::Failure(fault)
        }
    }
}

/// Same boundary as [`guard`], with the captured fault passed through
/// `on_failure` to produce the failure payload.
pub fn guard_with<T, E, F, O, M>(op: O, on_failure: M) -> Outcome<T, F>
where
    O: FnOnce() -> Result<T, E>,
    E: Into<Error>,
    M: FnOnce(Error) -> F,
{
    match op() {
        Ok(value) => Outcome::Success(value),
        Err(fault) => {
            let fault = fault.into();
            debug!("guard captured fault: {:#}", fault);
            Outcome::Failure(on_failure(fault))
        }
    }
}

/// Asynchronous twin of [`guard`].
///
/// Suspends the caller until the wrapped future settles, then applies the
/// same success/failure mapping. The operation is evaluated exactly once;
/// there is no timeout and no cancellation of its own, cancelling is the
/// wrapped future's concern.
pub async fn guard_async<T, E, O, Fut>(op: O) -> Outcome<T, Error>
where
    O: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Error>,
{
    match op().await {
        Ok(value) => Outcome::Success(value),
        Err(fault) => {
            let fault = fault.into();
            debug!("async guard captured fault: {:#}", fault);
            Outcome::Failure(fault)
        }
    }
}

/// Asynchronous twin of [`guard_with`].
pub async fn guard_async_with<T, E, F, O, Fut, M>(op: O, on_failure: M) -> Outcome<T, F>
where
    O: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Error>,
    M: FnOnce(Error) -> F,
{
    match op().await {
        Ok(value) => Outcome::Success(value),
        Err(fault) => {
            let fault = fault.into();
            debug!("async guard captured fault: {:#}", fault);
            Outcome::Failure(on_failure(fault))
        }
    }
}
