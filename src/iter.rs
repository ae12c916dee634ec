use crate::outcome::Outcome;
use anyhow::Error;
use log::debug;

enum State<Op, It> {
    Idle(Op),
    Iterating(It),
    Done,
}

/// Lazy synchronous sequence of outcomes built by [`guard_iter`] /
/// [`guard_iter_with`]; the blocking twin of [`crate::stream::GuardedStream`].
///
/// Successfully produced elements come out as successes; the first fault
/// comes out as a single failure and closes the sequence, the producer is
/// never advanced again.
pub struct GuardedIter<Op, It, M> {
    state: State<Op, It>,
    on_failure: Option<M>,
}

/// Wraps an iterator-producing operation in a failure boundary.
///
/// `op` itself runs lazily, on the first advance of the returned iterator.
pub fn guard_iter<T, E, Op, It>(op: Op) -> GuardedIter<Op, It, fn(Error) -> Error>
where
    Op: FnOnce() -> It,
    It: Iterator<Item = Result<T, E>>,
    E: Into<Error>,
{
    GuardedIter {
        state: State::Idle(op),
        on_failure: Some(std::convert::identity),
    }
}

/// Same boundary as [`guard_iter`], with the captured fault passed through
/// `on_failure` to produce the failure payload.
pub fn guard_iter_with<T, E, F, Op, It, M>(op: Op, on_failure: M) -> GuardedIter<Op, It, M>
where
    Op: FnOnce() -> It,
    It: Iterator<Item = Result<T, E>>,
    E: Into<Error>,
    M: FnOnce(Error) -> F,
{
    GuardedIter {
        state: State::Idle(op),
        on_failure: Some(on_failure),
    }
}

impl<T, E, F, Op, It, M> Iterator for GuardedIter<Op, It, M>
where
    Op: FnOnce() -> It,
    It: Iterator<Item = Result<T, E>>,
    E: Into<Error>,
    M: FnOnce(Error) -> F,
{
    type Item = Outcome<T, F>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                State::Idle(_) => {
                    if let State::Idle(op) = std::mem::replace(&mut self.state, State::Done) {
                        self.state = State::Iterating(op());
                    }
                }
                State::Iterating(inner) => {
                    return match inner.next() {
                        None => {
                            self.state = State::Done;
                            None
                        }
                        Some(Ok(value)) => Some(Outcome::Success(value)),
                        Some(Err(fault)) => {
                            self.state = State::Done;
                            let fault = fault.into();
                            debug!("iterator guard captured fault: {:#}", fault);
                            let on_failure = self
                                .on_failure
                                .take()
                                .expect("failure mapper can only be used once");
                            Some(Outcome::Failure(on_failure(fault)))
                        }
                    };
                }
                State::Done => return None,
            }
        }
    }
}
