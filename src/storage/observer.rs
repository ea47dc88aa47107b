//! Subscriber registry behind the live task queries.
//!
//! Each subscriber owns an unbounded channel. After every committed write the
//! storage re-reads the table once and hands the snapshot to [`TaskObservers::publish`],
//! which fans it out to table subscribers and derives each row subscriber's
//! value from it. Closed channels are pruned on the next publish.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::entities::task;

/// One delivery on a live query: the fresh value, or the error the re-read hit.
pub type Emission<T> = Result<T, Arc<anyhow::Error>>;

/// Receiving end of a live query.
///
/// The first emission reflects the state at subscription time; every later
/// emission follows a write, in write order.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<Emission<T>>,
}

impl<T> Subscription<T> {
    /// Wait for the next emission. `None` once the storage is gone.
    pub async fn recv(&mut self) -> Option<Emission<T>> {
        self.rx.recv().await
    }

    /// Take an emission that is already queued, if any.
    pub fn try_recv(&mut self) -> Option<Emission<T>> {
        self.rx.try_recv().ok()
    }
}

struct RowObserver {
    id: String,
    last: Option<task::Model>,
    tx: mpsc::UnboundedSender<Emission<Option<task::Model>>>,
}

#[derive(Default)]
pub(crate) struct TaskObservers {
    all: Mutex<Vec<mpsc::UnboundedSender<Emission<Vec<task::Model>>>>>,
    rows: Mutex<Vec<RowObserver>>,
}

impl TaskObservers {
    pub fn is_empty(&self) -> bool {
        let no_table = self.all.lock().map(|all| all.is_empty()).unwrap_or(true);
        let no_rows = self.rows.lock().map(|rows| rows.is_empty()).unwrap_or(true);
        no_table && no_rows
    }

    pub fn subscribe_all(&self, initial: Emission<Vec<task::Model>>) -> Subscription<Vec<task::Model>> {
        let (tx, rx) = mpsc::unbounded_channel();
        // Receiver is alive, send cannot fail
        let _ = tx.send(initial);
        if let Ok(mut all) = self.all.lock() {
            all.push(tx);
        }
        Subscription { rx }
    }

    pub fn subscribe_row(&self, id: &str, initial: Emission<Option<task::Model>>) -> Subscription<Option<task::Model>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let last = initial.as_ref().ok().cloned().flatten();
        let _ = tx.send(initial);
        if let Ok(mut rows) = self.rows.lock() {
            rows.push(RowObserver {
                id: id.to_string(),
                last,
                tx,
            });
        }
        Subscription { rx }
    }

    /// Deliver a post-write snapshot to every live subscriber.
    pub fn publish(&self, snapshot: Emission<Vec<task::Model>>) {
        if let Ok(mut all) = self.all.lock() {
            all.retain(|tx| tx.send(snapshot.clone()).is_ok());
        }

        if let Ok(mut rows) = self.rows.lock() {
            rows.retain_mut(|observer| match &snapshot {
                Ok(tasks) => {
                    let current = tasks.iter().find(|t| t.id == observer.id).cloned();
                    if current == observer.last {
                        return !observer.tx.is_closed();
                    }
                    observer.last = current.clone();
                    observer.tx.send(Ok(current)).is_ok()
                }
                Err(err) => observer.tx.send(Err(err.clone())).is_ok(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, completed: bool) -> task::Model {
        task::Model {
            id: id.to_string(),
            title: format!("title {id}"),
            description: String::new(),
            is_completed: completed,
        }
    }

    #[test]
    fn test_table_subscriber_sees_initial_then_updates() {
        let observers = TaskObservers::default();
        let mut sub = observers.subscribe_all(Ok(vec![]));

        observers.publish(Ok(vec![row("a", false)]));

        assert_eq!(sub.try_recv().unwrap().unwrap(), vec![]);
        assert_eq!(sub.try_recv().unwrap().unwrap(), vec![row("a", false)]);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_row_subscriber_only_sees_its_row_changes() {
        let observers = TaskObservers::default();
        let mut sub = observers.subscribe_row("a", Ok(Some(row("a", false))));

        observers.publish(Ok(vec![row("a", false), row("b", false)]));
        observers.publish(Ok(vec![row("a", true), row("b", false)]));
        observers.publish(Ok(vec![row("b", true)]));

        assert_eq!(sub.try_recv().unwrap().unwrap(), Some(row("a", false)));
        assert_eq!(sub.try_recv().unwrap().unwrap(), Some(row("a", true)));
        assert_eq!(sub.try_recv().unwrap().unwrap(), None);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let observers = TaskObservers::default();
        let sub = observers.subscribe_all(Ok(vec![]));
        let row_sub = observers.subscribe_row("a", Ok(None));
        drop(sub);
        drop(row_sub);

        observers.publish(Ok(vec![row("a", false)]));
        assert!(observers.is_empty());
    }

    #[test]
    fn test_errors_reach_every_subscriber() {
        let observers = TaskObservers::default();
        let mut all = observers.subscribe_all(Ok(vec![]));
        let mut one = observers.subscribe_row("a", Ok(None));
        let _ = all.try_recv();
        let _ = one.try_recv();

        observers.publish(Err(Arc::new(anyhow::anyhow!("disk on fire"))));

        assert!(all.try_recv().unwrap().is_err());
        assert!(one.try_recv().unwrap().is_err());
    }
}
