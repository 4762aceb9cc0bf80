use crate::channel::Receiver;
use crate::error::Result;
use crate::pipeline::{stage, Pipeline};
use futures::stream::{FuturesUnordered, StreamExt as _};

/// Arrival slots of one lock-step round.
struct Round<T> {
    slots: Vec<Option<T>>,
    arrived: usize,
}

impl<T> Round<T> {
    fn new(width: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(width).collect(),
            arrived: 0,
        }
    }

    fn is_filled(&self, index: usize) -> bool {
        self.slots[index].is_some()
    }

    fn fill(&mut self, index: usize, item: T) {
        self.slots[index] = Some(item);
        self.arrived += 1;
    }
}

/// Next signal of input `index`, handing the receiver back for the next pull.
async fn pull<T>(
    index: usize,
    input: &mut Receiver<T>,
) -> (usize, &mut Receiver<T>, Option<Result<T>>) {
    let signal = input.recv().await;
    (index, input, signal)
}

impl<T: Send + 'static> Pipeline<T> {
    /// Merges several pipelines in lock-step, one tuple per round.
    ///
    /// Each round takes one item from every input that is still open and
    /// yields them as a `Vec` aligned with the input order; slot `i` holds
    /// input `i`'s item, or `None` once that input has ended. An input that
    /// delivered its item holds at most one more item back until the round
    /// completes, so the slowest open input paces all of them.
    ///
    /// The merged pipeline ends once every input has ended. The first input
    /// error closes it immediately with that error, even while the round is
    /// still waiting on another input.
    pub fn lockstep<I>(pipelines: I) -> Pipeline<Vec<Option<T>>>
    where
        I: IntoIterator<Item = Pipeline<T>>,
    {
        let inputs: Vec<Pipeline<T>> = pipelines.into_iter().collect();
        let (tx, merged) = match inputs.first() {
            Some(first) => first.downstream(),
            None => Pipeline::channel(),
        };
        let mut inputs: Vec<_> = inputs.into_iter().map(|input| input.receiver).collect();
        stage::drive("lockstep", tx, |tx| async move {
            let width = inputs.len();
            let mut open = vec![true; width];
            let mut open_count = width;
            // One item per input pulled ahead of its round.
            let mut ahead: Vec<Option<T>> = std::iter::repeat_with(|| None).take(width).collect();
            let mut rounds = 0_usize;

            while open_count > 0 {
                let mut round = Round::new(width);
                for (index, held) in ahead.iter_mut().enumerate() {
                    if let Some(item) = held.take() {
                        round.fill(index, item);
                    }
                }
                let mut waiting = (0..width)
                    .filter(|index| open[*index] && !round.is_filled(*index))
                    .count();

                let mut pending: FuturesUnordered<_> = inputs
                    .iter_mut()
                    .enumerate()
                    .filter(|(index, _)| open[*index])
                    .map(|(index, input)| pull(index, input))
                    .collect();

                while waiting > 0 {
                    let Some((index, input, signal)) = pending.next().await else {
                        break;
                    };
                    match signal {
                        Some(item) => {
                            let item = item?;
                            if round.is_filled(index) {
                                // Held back until the next round; an error queued
                                // behind it surfaces when the next round pulls.
                                ahead[index] = Some(item);
                            } else {
                                round.fill(index, item);
                                waiting -= 1;
                                pending.push(pull(index, input));
                            }
                        }
                        None => {
                            open[index] = false;
                            open_count -= 1;
                            if !round.is_filled(index) {
                                waiting -= 1;
                            }
                            log::trace!("lockstep input {index} ended, {open_count} still open");
                        }
                    }
                }
                drop(pending);

                // A round in which every participant ended carries nothing.
                if round.arrived == 0 {
                    continue;
                }
                rounds += 1;
                if tx.push(round.slots).await.is_err() {
                    break;
                }
            }
            log::trace!("lockstep finished after {rounds} rounds");
            Ok(())
        });
        merged
    }
}
