//! Small helpers for building and draining `ItemStream`s.

use std::future::Future;

use futures_util::StreamExt;

use moviesync_core::datasource::{ItemStream, Result};

/// Wraps a single asynchronous result as a one-emission stream.
pub fn single<'a, T, F>(future: F) -> ItemStream<'a, T>
where
    T: Send + 'a,
    F: Future<Output = Result<T>> + Send + 'a,
{
    Box::pin(futures_util::stream::once(future))
}

/// Awaits the first emission of a stream, dropping the rest.
///
/// A stream that completes without emitting yields `Ok(None)`.
pub async fn first_emission<T>(mut stream: ItemStream<'_, T>) -> Result<Option<T>> {
    stream.next().await.transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviesync_core::datasource::DataSourceError;

    #[tokio::test]
    async fn test_single_emits_once() {
        let stream = single(async { Ok(vec![1, 2, 3]) });
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items, vec![Ok(vec![1, 2, 3])]);
    }

    #[tokio::test]
    async fn test_first_emission_of_empty_stream() {
        let stream: ItemStream<'_, u32> = Box::pin(futures_util::stream::empty());
        assert_eq!(first_emission(stream).await, Ok(None));
    }

    #[tokio::test]
    async fn test_first_emission_propagates_error() {
        let stream: ItemStream<'_, u32> =
            single(async { Err(DataSourceError::Transport("offline".to_string())) });
        assert!(first_emission(stream).await.is_err());
    }
}
