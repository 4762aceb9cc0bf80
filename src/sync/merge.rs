use crate::pipeline::{stage, Pipeline};
use futures::stream::{self, StreamExt as _};

impl<T: Send + 'static> Pipeline<T> {
    /// Merges several pipelines into one, in arrival order.
    ///
    /// An item is forwarded as soon as any input yields it; items from
    /// different inputs are ordered only by when they arrive. The merged
    /// pipeline ends once every input has ended. The first input error closes
    /// it immediately with that error and the remaining inputs are dropped,
    /// which cancels them.
    ///
    /// Merging zero pipelines gives a pipeline that ends immediately.
    pub fn merge<I>(pipelines: I) -> Pipeline<T>
    where
        I: IntoIterator<Item = Pipeline<T>>,
    {
        let inputs: Vec<Pipeline<T>> = pipelines.into_iter().collect();
        let (tx, merged) = match inputs.first() {
            Some(first) => first.downstream(),
            None => Pipeline::channel(),
        };
        let mut live = stream::select_all(inputs.into_iter().map(|input| input.receiver));
        stage::drive("merge", tx, |tx| async move {
            log::trace!("merge started with {} live inputs", live.len());
            while let Some(item) = live.next().await {
                let item = match item {
                    Ok(item) => item,
                    Err(error) => {
                        log::debug!("merge input failed with {} inputs open: {error}", live.len());
                        return Err(error);
                    }
                };
                if tx.push(item).await.is_err() {
                    break;
                }
            }
            Ok(())
        });
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_merge_of_nothing_ends() {
        let merged = Pipeline::<u8>::merge(Vec::new()).collect().await;
        assert_eq!(merged.unwrap(), Vec::<u8>::new());
    }
}
