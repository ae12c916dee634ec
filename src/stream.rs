use crate::outcome::Outcome;
use anyhow::Error;
use futures_core::Stream;
use log::debug;
use std::pin::Pin;
use std::task::{Context, Poll};

enum State<Op, St> {
    /// Producer not started yet; nothing ran, nothing was pulled.
    Idle(Op),
    Streaming(St),
    Done,
}

/// Lazy sequence of outcomes built by [`guard_stream`] / [`guard_stream_with`].
///
/// Every element produced by the wrapped stream is emitted as a success.
/// The first fault is emitted as a single failure, after which the sequence
/// terminates for good: the underlying producer is never polled again. The
/// sequence is pull-driven and not restartable, each consumption runs the
/// producer exactly once.
pub struct GuardedStream<Op, St, M> {
    state: State<Op, St>,
    on_failure: Option<M>,
}

/// Wraps a stream-producing operation in a failure boundary.
///
/// `op` itself runs lazily, on the first poll. Faults keep the universal
/// fault type as payload; see [`guard_stream_with`] to map them.
pub fn guard_stream<T, E, Op, St>(op: Op) -> GuardedStream<Op, St, fn(Error) -> Error>
where
    Op: FnOnce() -> St,
    St: Stream<Item = Result<T, E>> + Unpin,
    E: Into<Error>,
{
    GuardedStream {
        state: State::Idle(op),
        on_failure: Some(std::convert::identity),
    }
}

/// Same boundary as [`guard_stream`], with the captured fault passed through
/// `on_failure` to produce the failure payload. The mapper is invoked at most
/// once, for the fault that terminates the sequence.
pub fn guard_stream_with<T, E, F, Op, St, M>(op: Op, on_failure: M) -> GuardedStream<Op, St, M>
where
    Op: FnOnce() -> St,
    St: Stream<Item = Result<T, E>> + Unpin,
    E: Into<Error>,
    M: FnOnce(Error) -> F,
{
    GuardedStream {
        state: State::Idle(op),
        on_failure: Some(on_failure),
    }
}

impl<T, E, F, Op, St, M> Stream for GuardedStream<Op, St, M>
where
    Op: FnOnce() -> St + Unpin,
    St: Stream<Item = Result<T, E>> + Unpin,
    E: Into<Error>,
    M: FnOnce(Error) -> F + Unpin,
{
    type Item = Outcome<T, F>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                State::Idle(_) => {
                    if let State::Idle(op) = std::mem::replace(&mut this.state, State::Done) {
                        this.state = State::Streaming(op());
                    }
                }
                State::Streaming(inner) => {
                    return match Pin::new(inner).poll_next(cx) {
                        Poll::Pending => Poll::Pending,
                        Poll::Ready(None) => {
                            this.state = State::Done;
                            Poll::Ready(None)
                        }
                        Poll::Ready(Some(Ok(value))) => {
                            Poll::Ready(Some(Outcome::Success(value)))
                        }
                        Poll::Ready(Some(Err(fault))) => {
                            this.state = State::Done;
                            let fault = fault.into();
                            debug!("stream guard captured fault: {:#}", fault);
                            let on_failure = this
                                .on_failure
                                .take()
                                .expect("failure mapper can only be used once");
                            Poll::Ready(Some(Outcome::Failure(on_failure(fault))))
                        }
                    };
                }
                State::Done => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{guard_stream, guard_stream_with};
    use crate::outcome::Outcome;
    use anyhow::anyhow;
    use futures_executor::block_on;
    use futures_util::{stream, StreamExt};

    #[test]
    fn test_all_elements_become_successes() {
        let guarded = guard_stream(|| stream::iter(vec![anyhow::Ok(1), anyhow::Ok(2)]));

        let collected: Vec<_> = block_on(guarded.collect());
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].value(), Some(&1));
        assert_eq!(collected[1].value(), Some(&2));
    }

    #[test]
    fn test_sequence_terminates_after_first_fault() {
        let guarded = guard_stream(|| {
            stream::iter(vec![
                anyhow::Ok(1),
                Err(anyhow!("producer fault")),
                anyhow::Ok(3),
            ])
        });

        let collected: Vec<_> = block_on(guarded.collect());
        // Ok(3) is never produced, the fault closes the sequence
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].value(), Some(&1));
        let error = collected[1].error().expect("second element is the fault");
        assert_eq!(error.to_string(), "producer fault");
    }

    #[test]
    fn test_producer_runs_lazily_and_once() {
        let mut runs = 0;
        {
            let mut guarded = guard_stream(|| {
                runs += 1;
                stream::iter(vec![anyhow::Ok(1), anyhow::Ok(2)])
            });

            block_on(async {
                assert_eq!(guarded.next().await.and_then(Outcome::into_value), Some(1));
                assert_eq!(guarded.next().await.and_then(Outcome::into_value), Some(2));
                assert!(guarded.next().await.is_none());
                // the sequence stays closed once exhausted
                assert!(guarded.next().await.is_none());
            });
        }
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_fault_is_mapped_once() {
        let guarded = guard_stream_with(
            || stream::iter(vec![anyhow::Ok("a"), Err(anyhow!("stop"))]),
            |fault| format!("mapped: {}", fault),
        );

        let collected: Vec<_> = block_on(guarded.collect());
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].value(), Some(&"a"));
        assert_eq!(
            collected[1].error().map(String::as_str),
            Some("mapped: stop")
        );
    }

    #[test]
    fn test_unconsumed_guard_runs_nothing() {
        let mut runs = 0;
        let guarded = guard_stream(|| {
            runs += 1;
            stream::iter(vec![anyhow::Ok(1)])
        });
        drop(guarded);
        assert_eq!(runs, 0);
    }
}
