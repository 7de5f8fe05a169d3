// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::observable::{Observable, Subscriber};
use super::subscription::Subscription;

struct SubjectState<T> {
    observers: Vec<(u64, Subscriber<T>)>,
    next_id: u64,
    replay: VecDeque<T>,
    replay_size: usize,
    completed: bool,
}

/// Hot multicast stream. Values pushed with `next` reach every current
/// subscriber synchronously, in subscription order. With a replay size, late
/// subscribers first receive the most recent values.
///
/// Observers are called without any internal lock held, so an observer may
/// push into the same subject.
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subject")
    }
}

fn lock<T>(state: &Mutex<SubjectState<T>>) -> MutexGuard<'_, SubjectState<T>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone + Send + Sync + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Subject<T> {
    pub fn new() -> Self {
        Self::replay(0)
    }

    pub fn replay(replay_size: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                observers: Vec::new(),
                next_id: 0,
                replay: VecDeque::with_capacity(replay_size),
                replay_size,
                completed: false,
            })),
        }
    }

    pub fn next(&self, value: T) {
        let observers: Vec<Subscriber<T>> = {
            let mut state = lock(&self.state);
            if state.completed {
                return;
            }
            if state.replay_size > 0 {
                if state.replay.len() == state.replay_size {
                    state.replay.pop_front();
                }
                state.replay.push_back(value.clone());
            }
            state.observers.iter().map(|(_, s)| s.clone()).collect()
        };
        for observer in observers {
            observer.next(&value);
        }
    }

    pub fn complete(&self) {
        let observers: Vec<Subscriber<T>> = {
            let mut state = lock(&self.state);
            if state.completed {
                return;
            }
            state.completed = true;
            state.observers.drain(..).map(|(_, s)| s).collect()
        };
        for observer in observers {
            observer.complete();
        }
    }

    pub fn is_completed(&self) -> bool {
        lock(&self.state).completed
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.state).observers.len()
    }

    pub fn subscribe_subscriber(&self, subscriber: Subscriber<T>) -> Subscription {
        let (replayed, completed, id) = {
            let mut state = lock(&self.state);
            let replayed: Vec<T> = state.replay.iter().cloned().collect();
            if state.completed {
                (replayed, true, None)
            } else {
                let id = state.next_id;
                state.next_id += 1;
                state.observers.push((id, subscriber.clone()));
                (replayed, false, Some(id))
            }
        };

        for value in &replayed {
            subscriber.next(value);
        }
        match id {
            Some(id) if !completed => {
                let weak: Weak<Mutex<SubjectState<T>>> = Arc::downgrade(&self.state);
                Subscription::from_teardown(move || {
                    if let Some(state) = weak.upgrade() {
                        lock(&state).observers.retain(|(observer_id, _)| *observer_id != id);
                    }
                })
            }
            _ => {
                subscriber.complete();
                Subscription::closed()
            }
        }
    }

    pub fn subscribe(&self, next: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.subscribe_subscriber(Subscriber::new(next, || {}))
    }

    /// Read-only view. Subscribing to it subscribes to this subject.
    pub fn as_observable(&self) -> Observable<T> {
        let subject = self.clone();
        Observable::new(move |subscriber| subject.subscribe_subscriber(subscriber))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<i32>>>, impl Fn(&i32) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |v: &i32| sink.lock().unwrap().push(*v))
    }

    #[test]
    fn multicasts_to_every_subscriber() {
        let subject = Subject::new();
        let (a, record_a) = recorder();
        let (b, record_b) = recorder();
        let _sa = subject.subscribe(record_a);
        subject.next(1);
        let _sb = subject.subscribe(record_b);
        subject.next(2);

        assert_eq!(*a.lock().unwrap(), vec![1, 2]);
        assert_eq!(*b.lock().unwrap(), vec![2]);
    }

    #[test]
    fn replay_serves_late_subscribers() {
        let subject = Subject::replay(1);
        subject.next(1);
        subject.next(2);
        let (seen, record) = recorder();
        let _subscription = subject.subscribe(record);
        subject.next(3);

        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let subject = Subject::new();
        let (seen, record) = recorder();
        let subscription = subject.subscribe(record);
        subject.next(1);
        subscription.unsubscribe();
        subject.next(2);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn completion_ends_the_stream() {
        let subject = Subject::new();
        let (seen, record) = recorder();
        let _subscription = subject.subscribe(record);
        subject.complete();
        subject.next(1);

        assert!(seen.lock().unwrap().is_empty());
        assert!(subject.is_completed());
        assert!(subject.subscribe(|_| {}).is_closed());
    }

    #[test]
    fn observers_may_push_reentrantly() {
        let subject: Subject<i32> = Subject::new();
        let (seen, record) = recorder();
        let feedback = subject.clone();
        let _echo = subject.subscribe(move |v| {
            if *v < 3 {
                feedback.next(v + 1);
            }
        });
        let _subscription = subject.subscribe(record);
        subject.next(1);

        assert_eq!(*seen.lock().unwrap(), vec![3, 2, 1]);
    }
}
