use std::{
    collections::HashMap,
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// A named set of long-running tasks, such as one event watcher per fork.
///
/// Awaiting the set resolves as soon as *any* task exits. Since the tasks are meant to run
/// forever, an exit is a signal for the caller to shut down or restart.
/// Resolves to `None` when the set is empty.
#[derive(Debug)]
pub struct CriticalTasks<T = ()> {
    tasks: HashMap<String, JoinHandle<T>>,
}

impl<T> Default for CriticalTasks<T> {
    fn default() -> Self {
        Self { tasks: HashMap::new() }
    }
}

impl<T: Send + 'static> CriticalTasks<T> {
    /// Creates an empty task set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the future on the current runtime and tracks it under `name`.
    /// A task already tracked under the same name is aborted.
    pub fn spawn<F>(&mut self, name: impl fmt::Display, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.track(name, tokio::spawn(task));
    }

    /// Tracks an already spawned task under `name`.
    pub fn track(&mut self, name: impl fmt::Display, handle: JoinHandle<T>) {
        if let Some(previous) = self.tasks.insert(name.to_string(), handle) {
            previous.abort();
        }
    }

    /// Returns the number of tracked tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no task is tracked.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Aborts every tracked task.
    pub fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

/// A task of a [`CriticalTasks`] set that exited.
#[derive(Debug)]
pub struct TaskExit<T> {
    /// The name the task was tracked under.
    pub name: String,
    /// The value the task returned, or why it could not return one.
    pub outcome: Result<T, JoinError>,
}

impl<T> TaskExit<T> {
    /// Returns the panic message if the task panicked, or `None` otherwise.
    pub fn panic_message(self) -> Option<String> {
        let err = self.outcome.err()?;
        if !err.is_panic() {
            return None;
        }

        let payload = err.into_panic();
        if let Some(s) = payload.downcast_ref::<&str>() {
            Some((*s).to_owned())
        } else if let Some(s) = payload.downcast_ref::<String>() {
            Some(s.clone())
        } else {
            Some("task panicked with unknown payload".to_owned())
        }
    }
}

impl<T> Future for CriticalTasks<T> {
    type Output = Option<TaskExit<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.tasks.is_empty() {
            return Poll::Ready(None);
        }

        let mut exited = None;
        for (name, task) in &mut this.tasks {
            if let Poll::Ready(outcome) = task.poll_unpin(cx) {
                exited = Some((name.clone(), outcome));
                break;
            }
        }

        match exited {
            Some((name, outcome)) => {
                this.tasks.remove(&name);
                Poll::Ready(Some(TaskExit { name, outcome }))
            }
            None => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn empty_set_resolves_immediately() {
        let tasks = CriticalTasks::<()>::new();
        assert!(tasks.await.is_none());
    }

    #[tokio::test]
    async fn first_exit_is_reported_and_removed() {
        let mut tasks = CriticalTasks::new();
        tasks.spawn("forever", async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            0u8
        });
        tasks.spawn("short", async { 7u8 });

        let exit = (&mut tasks).await.unwrap();
        assert_eq!(exit.name, "short");
        assert_eq!(exit.outcome.unwrap(), 7);
        assert_eq!(tasks.len(), 1);

        tasks.abort_all();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn panic_message_is_extracted() {
        let mut tasks = CriticalTasks::<()>::new();
        tasks.spawn("str", async { panic!("boom") });
        let exit = (&mut tasks).await.unwrap();
        assert_eq!(exit.panic_message().as_deref(), Some("boom"));

        tasks.spawn("string", async { std::panic::panic_any(format!("boom {}", 2)) });
        let exit = (&mut tasks).await.unwrap();
        assert_eq!(exit.panic_message().as_deref(), Some("boom 2"));

        tasks.spawn("unknown", async { std::panic::panic_any(42u32) });
        let exit = tasks.await.unwrap();
        assert_eq!(exit.panic_message().as_deref(), Some("task panicked with unknown payload"));
    }

    #[tokio::test]
    async fn clean_exit_has_no_panic_message() {
        let mut tasks = CriticalTasks::new();
        tasks.spawn("noop", async {});
        let exit = tasks.await.unwrap();
        assert!(exit.panic_message().is_none());
    }

    #[tokio::test]
    async fn same_name_replaces_previous_task() {
        let mut tasks = CriticalTasks::new();
        tasks.spawn("w", async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            1u8
        });
        tasks.spawn("w", async { 2u8 });
        assert_eq!(tasks.len(), 1);

        let exit = tasks.await.unwrap();
        assert_eq!(exit.outcome.unwrap(), 2);
    }
}
