//! Tests for sources and terminal consumers

mod common;

use common::{default_items, default_object_pipeline, init_logging, DefaultStreamItem};
use cyrup_pipelines::{Pipeline, PipelineError};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

mod source_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_from_iter_round_trips_items() {
        init_logging();
        let items = assert_ok!(Pipeline::from_iter(default_items(0, 100)).collect().await);
        assert_eq!(items, default_items(0, 100));
    }

    #[tokio::test]
    async fn test_from_iter_of_nothing_ends_immediately() {
        let items = assert_ok!(Pipeline::from_iter(Vec::<u8>::new()).collect().await);
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_from_future_yields_single_value() {
        let stream = Pipeline::from_future(async { Ok::<_, Infallible>(DefaultStreamItem::new(7)) });
        let items = assert_ok!(stream.collect().await);
        assert_eq!(items, vec![DefaultStreamItem::new(7)]);
    }

    #[tokio::test]
    async fn test_from_future_rejection_closes_with_error() {
        let stream = Pipeline::from_future(async { Err::<u32, _>("This is an error") });
        let err = assert_err!(stream.collect().await);
        assert!(matches!(err, PipelineError::Source(_)));
        assert_eq!(err.to_string(), "This is an error");
    }

    #[tokio::test]
    async fn test_hand_fed_channel() {
        let (tx, pipeline) = Pipeline::channel();
        let outcome = pipeline.map(|n: u32| n + 1).collect();

        tokio::spawn(async move {
            for n in 0..3 {
                tx.push(n).await.unwrap();
            }
            tx.end().await;
        });

        assert_eq!(assert_ok!(outcome.await), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_hand_fed_channel_dropped_without_closing() {
        let (tx, pipeline) = Pipeline::<u32>::channel();
        tx.push(1).await.unwrap();
        drop(tx);

        let err = assert_err!(pipeline.collect().await);
        assert!(matches!(err, PipelineError::Disconnected));
    }

    #[tokio::test]
    async fn test_pipeline_is_a_stream() {
        use futures::StreamExt;

        let mut pipeline = Pipeline::from_iter(vec![1, 2]);
        assert_eq!(pipeline.next().await.unwrap().unwrap(), 1);
        assert_eq!(pipeline.next().await.unwrap().unwrap(), 2);
        assert!(pipeline.next().await.is_none());
    }
}

mod attach_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_attach_resolves_true() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let done = default_object_pipeline(0, 5)
            .attach(move |item, ack| {
                sink.lock().unwrap().push(item.id);
                ack.next();
                Ok::<_, Infallible>(())
            })
            .await;

        assert!(assert_ok!(done));
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_ack_from_another_task() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let done = Pipeline::from_iter(0..3_u64)
            .attach(move |n, ack| {
                let sink = Arc::clone(&sink);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(30 - n * 10)).await;
                    sink.lock().unwrap().push(n);
                    ack.next();
                });
                Ok::<_, Infallible>(())
            })
            .await;

        assert!(assert_ok!(done));
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_attach_handles_errors_in_previous_stage() {
        let result = default_object_pipeline(0, 100)
            .try_map(|_| Err::<u32, _>("This is an error"))
            .attach(|_, ack| {
                ack.next();
                Ok::<_, Infallible>(())
            })
            .await;

        assert_eq!(assert_err!(result).to_string(), "This is an error");
    }

    #[tokio::test]
    async fn test_attach_handles_error_passed_to_ack() {
        let result = Pipeline::from_iter(default_items(0, 100))
            .attach(|_, ack| {
                ack.fail("this is an error");
                Ok::<_, Infallible>(())
            })
            .await;

        let err = assert_err!(result);
        assert!(matches!(err, PipelineError::Rejected(_)));
        assert_eq!(err.to_string(), "this is an error");
    }

    #[tokio::test]
    async fn test_attach_handles_error_returned_by_consumer() {
        let result = Pipeline::from_iter(default_items(0, 100))
            .attach(|_, _ack| Err("this is an error"))
            .await;

        let err = assert_err!(result);
        assert!(matches!(err, PipelineError::Callback(_)));
        assert_eq!(err.to_string(), "this is an error");
    }

    #[tokio::test]
    async fn test_attach_handles_consumer_panic() {
        let result = Pipeline::from_iter(0..3_u8)
            .attach(|_, _ack| -> Result<(), Infallible> { panic!("this is an error") })
            .await;

        assert!(matches!(assert_err!(result), PipelineError::Panicked(_)));
    }

    #[tokio::test]
    async fn test_attach_dropped_ack_fails() {
        let result = Pipeline::from_iter(0..3_u8)
            .attach(|_, ack| {
                drop(ack);
                Ok::<_, Infallible>(())
            })
            .await;

        assert!(matches!(assert_err!(result), PipelineError::AckDropped));
    }
}

mod for_each_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_for_each_iterates_with_index() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let done = default_object_pipeline(0, 3)
            .for_each(move |item, i| {
                sink.lock().unwrap().push((item, i));
                async { Ok::<_, Infallible>(()) }
            })
            .await;

        assert!(assert_ok!(done));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        for (item, i) in seen.iter() {
            assert_eq!(*item, DefaultStreamItem::new(*i as u32));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_for_each_awaits_each_item() {
        let counter = Arc::new(Mutex::new(0_u32));
        let shared = Arc::clone(&counter);

        let done = default_object_pipeline(0, 3)
            .for_each(move |item, _| {
                let shared = Arc::clone(&shared);
                async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    let mut count = shared.lock().unwrap();
                    assert_eq!(item, DefaultStreamItem::new(*count));
                    *count += 1;
                    Ok::<_, Infallible>(())
                }
            })
            .await;

        assert!(assert_ok!(done));
        assert_eq!(*counter.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_for_each_handles_errors() {
        let result = default_object_pipeline(0, 3)
            .for_each(|_, _| async { Err::<(), _>("This is an error") })
            .await;

        assert_eq!(assert_err!(result).to_string(), "This is an error");
    }

    #[tokio::test]
    async fn test_for_each_handles_panics() {
        let result = default_object_pipeline(0, 3)
            .for_each(|_, _| async {
                if true {
                    panic!("This is an error");
                }
                Ok::<_, Infallible>(())
            })
            .await;

        assert_eq!(
            assert_err!(result).to_string(),
            "stage panicked: This is an error"
        );
    }
}

mod collect_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_collect_discards_partial_results_on_error() {
        let result = Pipeline::from_iter(0..10_u32)
            .try_map(|n| if n < 5 { Ok(n) } else { Err("This is an error") })
            .collect()
            .await;

        assert_eq!(assert_err!(result).to_string(), "This is an error");
    }
}
