// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::subscription::Subscription;

type NextFn<T> = Arc<dyn Fn(&T) + Send + Sync>;
type CompleteFn = Arc<dyn Fn() + Send + Sync>;

/// Receiving end of a stream: a `next` callback and a `complete` callback.
pub struct Subscriber<T> {
    next: NextFn<T>,
    complete: CompleteFn,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next.clone(),
            complete: self.complete.clone(),
        }
    }
}

impl<T> Subscriber<T> {
    pub fn new<N, C>(next: N, complete: C) -> Self
    where
        N: Fn(&T) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        Self {
            next: Arc::new(next),
            complete: Arc::new(complete),
        }
    }

    pub fn next(&self, value: &T) {
        (self.next)(value)
    }

    pub fn complete(&self) {
        (self.complete)()
    }
}

type SubscribeFn<T> = Arc<dyn Fn(Subscriber<T>) -> Subscription + Send + Sync>;

/// A cold, composable push stream.
///
/// Nothing happens until `subscribe`; every subscription runs the whole
/// chain again. Share work between subscribers by feeding a
/// [`Subject`](super::Subject) instead.
pub struct Observable<T> {
    on_subscribe: SubscribeFn<T>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            on_subscribe: self.on_subscribe.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Observable")
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new<F>(on_subscribe: F) -> Self
    where
        F: Fn(Subscriber<T>) -> Subscription + Send + Sync + 'static,
    {
        Self {
            on_subscribe: Arc::new(on_subscribe),
        }
    }

    /// Completes immediately without emitting.
    pub fn empty() -> Self {
        Self::new(|subscriber| {
            subscriber.complete();
            Subscription::closed()
        })
    }

    /// Emits every item synchronously, then completes.
    pub fn from_iter(items: impl IntoIterator<Item = T>) -> Self {
        let items: Arc<Vec<T>> = Arc::new(items.into_iter().collect());
        Self::new(move |subscriber| {
            for item in items.iter() {
                subscriber.next(item);
            }
            subscriber.complete();
            Subscription::closed()
        })
    }

    pub fn subscribe_subscriber(&self, subscriber: Subscriber<T>) -> Subscription {
        (self.on_subscribe)(subscriber)
    }

    pub fn subscribe(&self, next: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.subscribe_subscriber(Subscriber::new(next, || {}))
    }

    pub fn subscribe_with(
        &self,
        next: impl Fn(&T) + Send + Sync + 'static,
        complete: impl Fn() + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribe_subscriber(Subscriber::new(next, complete))
    }

    pub fn map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.filter_map(move |value| Some(f(value)))
    }

    pub fn filter<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_map(move |value| predicate(value).then(|| value.clone()))
    }

    pub fn filter_map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Option<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move |subscriber: Subscriber<U>| {
            let f = f.clone();
            let downstream = subscriber.clone();
            source.subscribe_with(
                move |value| {
                    if let Some(mapped) = f(value) {
                        downstream.next(&mapped);
                    }
                },
                move || subscriber.complete(),
            )
        })
    }

    /// Side effect on every value; the value passes through unchanged.
    pub fn tap<F>(&self, f: F) -> Observable<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move |subscriber: Subscriber<T>| {
            let f = f.clone();
            let downstream = subscriber.clone();
            source.subscribe_with(
                move |value| {
                    f(value);
                    downstream.next(value);
                },
                move || subscriber.complete(),
            )
        })
    }

    /// Interleave both streams in arrival order. Completes once both have.
    pub fn merge(&self, other: &Observable<T>) -> Observable<T> {
        let sources = [self.clone(), other.clone()];
        Observable::new(move |subscriber: Subscriber<T>| {
            let remaining = Arc::new(AtomicUsize::new(sources.len()));
            let subscription = Subscription::new();
            for source in sources.iter() {
                let downstream = subscriber.clone();
                let on_complete = subscriber.clone();
                let remaining = remaining.clone();
                let inner = source.subscribe_with(
                    move |value| downstream.next(value),
                    move || {
                        if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                            on_complete.complete();
                        }
                    },
                );
                subscription.add_subscription(inner);
            }
            subscription
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// The first `count` values, then completes and drops the source.
    pub fn take(&self, count: usize) -> Observable<T> {
        let source = self.clone();
        Observable::new(move |subscriber: Subscriber<T>| {
            if count == 0 {
                subscriber.complete();
                return Subscription::closed();
            }
            let upstream = Subscription::new();
            let taken = Arc::new(AtomicUsize::new(0));
            let done = Arc::new(AtomicBool::new(false));
            let (downstream, on_complete) = (subscriber.clone(), subscriber.clone());
            let (done_on_next, stop) = (done.clone(), upstream.clone());

            let inner = source.subscribe_with(
                move |value| {
                    let n = taken.fetch_add(1, Ordering::SeqCst) + 1;
                    if n > count {
                        return;
                    }
                    downstream.next(value);
                    if n == count && !done_on_next.swap(true, Ordering::SeqCst) {
                        downstream.complete();
                        stop.unsubscribe();
                    }
                },
                move || {
                    if !done.swap(true, Ordering::SeqCst) {
                        on_complete.complete();
                    }
                },
            );
            upstream.add_subscription(inner);
            upstream
        })
    }

    /// Pairs of the latest value of each stream, emitted on every value once
    /// both streams have emitted. Completes once both have.
    pub fn combine_latest<U>(&self, other: &Observable<U>) -> Observable<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let (left, right) = (self.clone(), other.clone());
        Observable::new(move |subscriber: Subscriber<(T, U)>| {
            let latest: Arc<Mutex<(Option<T>, Option<U>)>> = Arc::new(Mutex::new((None, None)));
            let remaining = Arc::new(AtomicUsize::new(2));
            let on_complete = {
                let subscriber = subscriber.clone();
                move || {
                    if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                        subscriber.complete();
                    }
                }
            };
            let subscription = Subscription::new();

            let (state, downstream) = (latest.clone(), subscriber.clone());
            subscription.add_subscription(left.subscribe_with(
                move |value: &T| {
                    let pair = {
                        let mut latest = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                        latest.0 = Some(value.clone());
                        latest.0.clone().zip(latest.1.clone())
                    };
                    if let Some(pair) = pair {
                        downstream.next(&pair);
                    }
                },
                on_complete.clone(),
            ));

            let (state, downstream) = (latest, subscriber);
            subscription.add_subscription(right.subscribe_with(
                move |value: &U| {
                    let pair = {
                        let mut latest = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                        latest.1 = Some(value.clone());
                        latest.0.clone().zip(latest.1.clone())
                    };
                    if let Some(pair) = pair {
                        downstream.next(&pair);
                    }
                },
                on_complete,
            ));
            subscription
        })
    }
}

impl Observable<u64> {
    /// Emits `0, 1, 2, ...` from a tokio task, one value per `period`, then
    /// completes after `count` values (never when `None`).
    ///
    /// Every subscription spawns its own task and unsubscribing aborts it.
    /// Outside a tokio runtime the stream completes without emitting.
    pub fn timer(period: Duration, count: Option<u64>) -> Observable<u64> {
        Observable::new(move |subscriber: Subscriber<u64>| {
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                subscriber.complete();
                return Subscription::closed();
            };
            let task = runtime.spawn(async move {
                let mut tick = 0;
                while count.map_or(true, |count| tick < count) {
                    tokio::time::sleep(period).await;
                    subscriber.next(&tick);
                    tick += 1;
                }
                subscriber.complete();
            });
            Subscription::from_teardown(move || task.abort())
        })
    }
}
