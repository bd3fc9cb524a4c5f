/* This file is part of FundForward (https://fundforward.app)
 *
 * Copyright (C) 2023-2026 FundForward contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::{collections::HashMap, sync::Arc};

use log::warn;
use rand::{rngs::OsRng, Rng};
use smol::lock::Mutex;

use crate::{Error, Result};

pub type PublisherPtr<T> = Arc<Publisher<T>>;
pub type SubscriptionId = u64;

/// Receiving end of a [`Publisher`]
pub struct Subscription<T> {
    id: SubscriptionId,
    recv_queue: smol::channel::Receiver<T>,
    parent: PublisherPtr<T>,
}

impl<T: Clone> Subscription<T> {
    pub fn get_id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next published message.
    pub async fn receive(&self) -> Result<T> {
        match self.recv_queue.recv().await {
            Ok(message) => Ok(message),
            Err(e) => Err(Error::Custom(format!("Subscription {} closed: {e}", self.id))),
        }
    }

    /// Take the next message if one is already queued.
    pub fn try_receive(&self) -> Option<T> {
        self.recv_queue.try_recv().ok()
    }

    // Must be called manually since async Drop is not possible in Rust
    pub async fn unsubscribe(&self) {
        self.parent.unsubscribe(self.id).await
    }
}

/// Simple broadcast (publish-subscribe) class
pub struct Publisher<T> {
    subs: Mutex<HashMap<SubscriptionId, smol::channel::Sender<T>>>,
}

impl<T: Clone> Publisher<T> {
    pub fn new() -> PublisherPtr<T> {
        Arc::new(Self { subs: Mutex::new(HashMap::new()) })
    }

    pub async fn subscribe(self: Arc<Self>) -> Subscription<T> {
        let (sender, recvr) = smol::channel::unbounded();

        let mut subs = self.subs.lock().await;
        let mut sub_id = OsRng.gen();
        while subs.contains_key(&sub_id) {
            sub_id = OsRng.gen();
        }
        subs.insert(sub_id, sender);
        drop(subs);

        Subscription { id: sub_id, recv_queue: recvr, parent: self.clone() }
    }

    async fn unsubscribe(&self, sub_id: SubscriptionId) {
        self.subs.lock().await.remove(&sub_id);
    }

    pub async fn notify(&self, message: T) {
        for sub in self.subs.lock().await.values() {
            if let Err(e) = sub.send(message.clone()).await {
                warn!(target: "system::publisher", "Error returned sending message in notify() call! {}", e);
            }
        }
    }
}
