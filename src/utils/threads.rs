//! 并发控制工具

use std::future::Future;

use futures::stream::{self, StreamExt};

/// 以给定并发上限执行一组future，按提交顺序返回结果
pub async fn do_parallel_with_limit<F, T>(futures_list: Vec<F>, max_parallels: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    stream::iter(futures_list)
        .buffered(max_parallels.max(1))
        .collect()
        .await
}
